pub mod analysis;
pub mod json_error;
pub mod jwt;
pub mod login;
pub mod register;
pub mod server_config;

pub use self::analysis::{AnalysisRequest, AnalysisResponse, ScanRecord, TrustStats};
pub use self::json_error::ErrorResponse;
pub use self::jwt::SessionClaims;
pub use self::login::{LoginData, LoginResponse};
pub use self::register::{RegistrationData, RegistrationResponse};
