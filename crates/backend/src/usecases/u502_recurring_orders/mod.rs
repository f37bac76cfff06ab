pub mod executor;
pub mod schedule;

pub use executor::GenerateExecutor;
