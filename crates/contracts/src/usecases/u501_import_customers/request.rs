use serde::{Deserialize, Serialize};

/// Запрос на импорт клиентов из CSV.
/// Содержимое файла передается отдельно (multipart), здесь только метаданные.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRequest {
    /// Имя загруженного файла; принимается только расширение .csv
    pub file_name: String,
}
