pub mod create;
pub mod scans;
pub mod store;
pub mod users;
pub mod utils;

pub use create::create_tables;
pub use scans::NewScan;
pub use store::{CredentialStore, SqliteStore, StoreError};
pub use users::{NewUser, UserAuth};
