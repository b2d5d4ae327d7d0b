pub mod login;
pub mod register;

pub use login::handle_login;
pub use register::handle_register;
