pub mod token;

pub use token::{AuthenticatedUser, DEFAULT_TOKEN_LIFETIME, SessionTokenCodec, TokenError};
