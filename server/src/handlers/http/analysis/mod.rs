pub mod analyze;
pub mod logs;
pub mod stats;

pub use analyze::handle_analyze;
pub use logs::handle_logs;
pub use stats::handle_stats;
