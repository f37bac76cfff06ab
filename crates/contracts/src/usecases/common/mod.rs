pub mod usecase_metadata;

pub use usecase_metadata::UseCaseMetadata;

/// Сколько ошибок bulk-операция показывает пользователю;
/// остальные только считаются
pub const MAX_REPORTED_ERRORS: usize = 20;
