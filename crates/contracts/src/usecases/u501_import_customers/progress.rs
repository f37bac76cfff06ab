use super::response::{ImportReport, MAX_REPORTED_ERRORS};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Текущий прогресс импорта (для real-time мониторинга из UI)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportProgress {
    pub session_id: String,
    pub status: ImportStatus,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    /// Последнее обновление прогресса
    pub updated_at: DateTime<Utc>,

    /// Процент обработанных строк: round((processed / total) * 100)
    pub percent: u8,
    pub processed: u32,
    pub total: u32,

    /// Клиент, отправляемый в данный момент
    pub current_item: Option<String>,

    pub success_count: u32,
    pub failed_count: u32,

    /// Ошибки строк, не более MAX_REPORTED_ERRORS
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    /// Импорт выполняется
    Running,

    /// Импорт завершен без ошибок
    Completed,

    /// Импорт завершен, часть строк провалилась
    CompletedWithErrors,

    /// Импорт прерван целиком (прекондиция или фатальная ошибка)
    Failed,
}

impl ImportProgress {
    pub fn new(session_id: String, total: u32) -> Self {
        let now = Utc::now();
        Self {
            session_id,
            status: ImportStatus::Running,
            started_at: now,
            completed_at: None,
            updated_at: now,
            percent: 0,
            processed: 0,
            total,
            current_item: None,
            success_count: 0,
            failed_count: 0,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: String) {
        if self.errors.len() < MAX_REPORTED_ERRORS {
            self.errors.push(message);
        }
    }

    /// Итоговый отчет для пользователя
    pub fn report(&self) -> ImportReport {
        ImportReport {
            success_count: self.success_count,
            failed_count: self.failed_count,
            errors: self.errors.clone(),
        }
    }
}
