pub mod config;

pub use self::config::{MAX_TOKEN_EXPIRY_HOURS, MIN_JWT_SECRET_LEN, load_config, parse_config};
