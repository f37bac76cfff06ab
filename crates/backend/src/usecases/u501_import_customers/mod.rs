pub mod encoding;
pub mod executor;
pub mod progress_tracker;
pub mod row_parser;

pub use executor::{ImportError, ImportExecutor};
pub use progress_tracker::ProgressTracker;
