use contracts::usecases::u501_import_customers::progress::{ImportProgress, ImportStatus};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Трекер прогресса импорта (in-memory, для real-time мониторинга).
/// Каждый прогон импорта владеет своей сессией; между сессиями
/// состояние не разделяется.
#[derive(Clone, Default)]
pub struct ProgressTracker {
    sessions: Arc<RwLock<HashMap<String, ImportProgress>>>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Создать новую сессию импорта на total строк данных
    pub fn create_session(&self, session_id: String, total: u32) {
        let mut sessions = self.sessions.write().unwrap();
        sessions.insert(session_id.clone(), ImportProgress::new(session_id, total));
    }

    /// Текущий прогресс сессии
    pub fn get_progress(&self, session_id: &str) -> Option<ImportProgress> {
        let sessions = self.sessions.read().unwrap();
        sessions.get(session_id).cloned()
    }

    /// Обновить счетчики после обработки очередной строки
    pub fn update(
        &self,
        session_id: &str,
        processed: u32,
        percent: u8,
        success_count: u32,
        failed_count: u32,
    ) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.processed = processed;
            progress.percent = percent;
            progress.success_count = success_count;
            progress.failed_count = failed_count;
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Отметить клиента, отправляемого в данный момент
    pub fn set_current_item(&self, session_id: &str, label: Option<String>) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.current_item = label;
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Добавить ошибку строки (текст хранится для первых 20)
    pub fn add_error(&self, session_id: &str, message: String) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.add_error(message);
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Завершить сессию импорта
    pub fn complete_session(&self, session_id: &str, status: ImportStatus) {
        let mut sessions = self.sessions.write().unwrap();
        if let Some(progress) = sessions.get_mut(session_id) {
            progress.status = status;
            progress.current_item = None;
            progress.completed_at = Some(chrono::Utc::now());
            progress.updated_at = chrono::Utc::now();
        }
    }

    /// Удалить давно завершенные сессии (очистка памяти)
    pub fn cleanup_old_sessions(&self, max_age_hours: i64) {
        let mut sessions = self.sessions.write().unwrap();
        let now = chrono::Utc::now();
        sessions.retain(|_, progress| {
            if let Some(completed_at) = progress.completed_at {
                (now - completed_at).num_hours() < max_age_hours
            } else {
                true // Активные сессии не трогаем
            }
        });
    }
}
