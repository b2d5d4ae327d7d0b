/// Tower middleware wrapped around the router.
///
/// CORS comes from `tower-http`; the request deadline lives here.
pub mod tower_timeout_handler;

pub use tower_timeout_handler::{TimeoutLayer, TimeoutService};
