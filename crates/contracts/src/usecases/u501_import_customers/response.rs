use serde::{Deserialize, Serialize};

pub use crate::usecases::common::MAX_REPORTED_ERRORS;

/// Ответ на запрос старта импорта
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportResponse {
    /// Уникальный ID сессии импорта; отсутствует, если старт провалился
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Статус запуска
    pub status: ImportStartStatus,

    /// Сообщение
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStartStatus {
    /// Импорт успешно запущен
    Started,

    /// Ошибка при запуске
    Failed,
}

/// Итоговый отчет импорта: success + failed всегда равно числу
/// обработанных непустых строк данных
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    pub success_count: u32,
    pub failed_count: u32,

    /// Ошибки в порядке строк файла, не более MAX_REPORTED_ERRORS
    pub errors: Vec<String>,
}

impl ImportReport {
    /// Записать ошибку строки: счетчик растет всегда,
    /// текст сохраняется только для первых MAX_REPORTED_ERRORS
    pub fn record_failure(&mut self, message: String) {
        self.failed_count += 1;
        if self.errors.len() < MAX_REPORTED_ERRORS {
            self.errors.push(message);
        }
    }

    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn processed(&self) -> u32 {
        self.success_count + self.failed_count
    }
}
