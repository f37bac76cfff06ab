use super::progress_tracker::ProgressTracker;
use super::row_parser::ImportRow;
use super::{encoding, row_parser};
use crate::shared::config::ImportConfig;
use crate::shared::crm_client::CrmApi;
use crate::shared::rate_limiter::RateLimiter;
use contracts::domain::common::AggregateId;
use contracts::usecases::u501_import_customers::progress::ImportStatus;
use contracts::usecases::u501_import_customers::request::ImportRequest;
use contracts::usecases::u501_import_customers::response::{
    ImportReport, ImportResponse, ImportStartStatus,
};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

/// Прекондиции импорта: любая из них прерывает операцию целиком,
/// ни одна строка не обрабатывается
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("only .csv files are accepted")]
    UnsupportedFileType,

    #[error("file empty or invalid")]
    EmptyFile,

    #[error("session expired, please sign in again")]
    SessionExpired(#[source] anyhow::Error),
}

/// Executor импорта клиентов из CSV.
///
/// Прекондиции проверяются синхронно, затем отправка строк уходит в
/// фоновую задачу; прогресс опрашивается по session_id.
pub struct ImportExecutor {
    crm: Arc<dyn CrmApi>,
    progress_tracker: Arc<ProgressTracker>,
    import_config: ImportConfig,
}

impl ImportExecutor {
    pub fn new(
        crm: Arc<dyn CrmApi>,
        progress_tracker: Arc<ProgressTracker>,
        import_config: ImportConfig,
    ) -> Self {
        Self {
            crm,
            progress_tracker,
            import_config,
        }
    }

    /// Запустить импорт (создает фоновую задачу и возвращает session_id)
    pub async fn start_import(
        &self,
        request: ImportRequest,
        data: Vec<u8>,
    ) -> Result<ImportResponse, ImportError> {
        // Прекондиция: принимаем только .csv
        if !request.file_name.to_lowercase().ends_with(".csv") {
            return Err(ImportError::UnsupportedFileType);
        }

        // Прекондиция: сессия проверяется один раз до обработки строк
        self.crm
            .check_session()
            .await
            .map_err(ImportError::SessionExpired)?;

        let text = encoding::decode(&data);
        let rows = row_parser::parse_rows(&text).ok_or(ImportError::EmptyFile)?;

        // Попутная уборка: завершенные сессии старше TTL уже не опрашиваются
        self.progress_tracker
            .cleanup_old_sessions(self.import_config.session_ttl_hours);

        let session_id = Uuid::new_v4().to_string();
        self.progress_tracker
            .create_session(session_id.clone(), rows.len() as u32);

        tracing::info!(
            "Starting customer import: session={}, file={}, rows={}",
            session_id,
            request.file_name,
            rows.len()
        );

        let self_clone = self.clone();
        let session_id_clone = session_id.clone();
        tokio::spawn(async move {
            self_clone.run_import(&session_id_clone, rows).await;
        });

        Ok(ImportResponse {
            session_id: Some(session_id),
            status: ImportStartStatus::Started,
            message: "İçe aktarma başlatıldı".to_string(),
        })
    }

    /// Текущий прогресс импорта
    pub fn get_progress(
        &self,
        session_id: &str,
    ) -> Option<contracts::usecases::u501_import_customers::progress::ImportProgress> {
        self.progress_tracker.get_progress(session_id)
    }

    /// Выполнить отправку строк. Строки идут строго в порядке файла,
    /// по одному awaited-вызову за раз; провал строки не прерывает
    /// остальные. Возвращает итоговый отчет.
    async fn run_import(&self, session_id: &str, rows: Vec<ImportRow>) -> ImportReport {
        let mut limiter = RateLimiter::new(
            self.import_config.rate_limit_requests,
            Duration::from_millis(self.import_config.rate_limit_window_ms),
        );

        let import_date = chrono::Utc::now().date_naive();
        let total = rows.len();
        let mut report = ImportReport::default();

        for (index, row) in rows.iter().enumerate() {
            // Номер строки для пользователя: 1-based, с учетом заголовка
            let display_row = index + 2;

            match row_parser::build_customer_draft(row, display_row, import_date) {
                Err(message) => {
                    // Строка без имени: API не вызывается
                    self.progress_tracker.add_error(session_id, message.clone());
                    report.record_failure(message);
                }
                Ok(draft) => {
                    limiter.acquire().await;
                    self.progress_tracker
                        .set_current_item(session_id, Some(draft.name.clone()));

                    match self.crm.create_customer(&draft).await {
                        Ok(record) => {
                            tracing::debug!(
                                "Customer created: {} ({})",
                                record.base.code,
                                record.base.id.as_string()
                            );
                            report.record_success();
                        }
                        Err(e) => {
                            let message = format!("row {}: {}", display_row, e);
                            tracing::warn!("Customer row failed: {}", message);
                            self.progress_tracker.add_error(session_id, message.clone());
                            report.record_failure(message);
                        }
                    }
                }
            }

            let percent = ((index + 1) as f64 / total as f64 * 100.0).round() as u8;
            self.progress_tracker.update(
                session_id,
                (index + 1) as u32,
                percent,
                report.success_count,
                report.failed_count,
            );
        }

        let final_status = if report.failed_count > 0 {
            ImportStatus::CompletedWithErrors
        } else {
            ImportStatus::Completed
        };
        self.progress_tracker
            .complete_session(session_id, final_status);

        // Итог берется из трекера: он источник истины для UI
        let report = self
            .progress_tracker
            .get_progress(session_id)
            .map(|progress| progress.report())
            .unwrap_or(report);

        tracing::info!(
            "Customer import completed: session={}, success={}, failed={}",
            session_id,
            report.success_count,
            report.failed_count
        );

        report
    }
}

impl Clone for ImportExecutor {
    fn clone(&self) -> Self {
        Self {
            crm: Arc::clone(&self.crm),
            progress_tracker: Arc::clone(&self.progress_tracker),
            import_config: self.import_config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;
    use contracts::domain::a001_customer::{Customer, CustomerDraft, CustomerId};
    use contracts::domain::a002_work_order::{WorkOrder, WorkOrderDraft};
    use contracts::domain::common::BaseAggregate;
    use contracts::usecases::u501_import_customers::response::MAX_REPORTED_ERRORS;
    use std::collections::HashSet;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockCrm {
        session_expired: bool,
        fail_names: HashSet<String>,
        created: Mutex<Vec<CustomerDraft>>,
    }

    /// Запись, которую внешний CRM вернул бы на create-customer
    fn created_record(draft: &CustomerDraft) -> Customer {
        Customer {
            base: BaseAggregate::new(
                CustomerId::new_v4(),
                format!("CLT-{}", draft.phone),
                draft.name.clone(),
            ),
            phone: draft.phone.clone(),
            address: draft.address.clone(),
            customer_type: draft.customer_type,
            balance: draft.balance,
            notes: draft.notes.clone(),
        }
    }

    #[async_trait]
    impl CrmApi for MockCrm {
        async fn check_session(&self) -> Result<()> {
            if self.session_expired {
                anyhow::bail!("401 Unauthorized");
            }
            Ok(())
        }

        async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer> {
            if self.fail_names.contains(&draft.name) {
                anyhow::bail!("CRM rejected record");
            }
            self.created.lock().unwrap().push(draft.clone());
            Ok(created_record(draft))
        }

        async fn create_work_order(&self, _draft: &WorkOrderDraft) -> Result<WorkOrder> {
            unreachable!("importer never creates work orders")
        }
    }

    fn test_config() -> ImportConfig {
        // Широкое окно, чтобы тесты не спали
        ImportConfig {
            rate_limit_requests: 10_000,
            rate_limit_window_ms: 1000,
            session_ttl_hours: 24,
        }
    }

    fn executor_with(crm: Arc<MockCrm>) -> (ImportExecutor, Arc<ProgressTracker>) {
        let tracker = Arc::new(ProgressTracker::new());
        (
            ImportExecutor::new(crm, Arc::clone(&tracker), test_config()),
            tracker,
        )
    }

    fn rows_of(csv: &str) -> Vec<ImportRow> {
        row_parser::parse_rows(csv).unwrap()
    }

    #[tokio::test]
    async fn imports_rows_in_file_order() {
        let crm = Arc::new(MockCrm::default());
        let (executor, tracker) = executor_with(Arc::clone(&crm));
        tracker.create_session("s".to_string(), 2);

        let report = executor
            .run_import("s", rows_of("Müşteri Adı,Telefon,Adres\nAhmet,555,Istanbul\nAyşe,556,Ankara\n"))
            .await;

        assert_eq!(report.success_count, 2);
        assert_eq!(report.failed_count, 0);

        let created = crm.created.lock().unwrap();
        assert_eq!(created[0].name, "Ahmet");
        assert_eq!(created[1].name, "Ayşe");

        let progress = tracker.get_progress("s").unwrap();
        assert_eq!(progress.status, ImportStatus::Completed);
        assert_eq!(progress.percent, 100);
        // Возвращаемый отчет и отчет трекера совпадают
        assert_eq!(report.success_count, progress.report().success_count);
        assert_eq!(report.errors, progress.report().errors);
    }

    #[tokio::test]
    async fn missing_name_fails_row_without_api_call() {
        let crm = Arc::new(MockCrm::default());
        let (executor, tracker) = executor_with(Arc::clone(&crm));
        tracker.create_session("s".to_string(), 2);

        let report = executor
            .run_import("s", rows_of("Ad,Telefon\nAhmet,555\n,556\n"))
            .await;

        assert_eq!(report.success_count, 1);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.errors, vec!["row 3: missing customer name"]);
        // Только Ahmet дошел до API
        assert_eq!(crm.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn api_failure_does_not_abort_remaining_rows() {
        let mut crm = MockCrm::default();
        crm.fail_names.insert("Ayşe".to_string());
        let crm = Arc::new(crm);
        let (executor, tracker) = executor_with(Arc::clone(&crm));
        tracker.create_session("s".to_string(), 3);

        let report = executor
            .run_import("s", rows_of("Ad,Telefon\nAhmet,1\nAyşe,2\nMehmet,3\n"))
            .await;

        assert_eq!(report.success_count, 2);
        assert_eq!(report.failed_count, 1);
        assert_eq!(report.processed(), 3);
        assert!(report.errors[0].starts_with("row 3:"));
        assert_eq!(crm.created.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn error_list_is_capped_at_twenty() {
        let crm = Arc::new(MockCrm::default());
        let (executor, tracker) = executor_with(Arc::clone(&crm));
        tracker.create_session("s".to_string(), 30);

        let mut csv = String::from("Ad,Telefon\n");
        for _ in 0..30 {
            csv.push_str(",555\n"); // все строки без имени
        }

        let report = executor.run_import("s", rows_of(&csv)).await;

        assert_eq!(report.failed_count, 30);
        assert_eq!(report.errors.len(), MAX_REPORTED_ERRORS);
        assert_eq!(
            tracker.get_progress("s").unwrap().errors.len(),
            MAX_REPORTED_ERRORS
        );
    }

    #[tokio::test]
    async fn rejects_non_csv_extension() {
        let crm = Arc::new(MockCrm::default());
        let (executor, _) = executor_with(crm);

        let result = executor
            .start_import(
                ImportRequest {
                    file_name: "customers.xlsx".to_string(),
                },
                b"Ad,Telefon\nAhmet,555\n".to_vec(),
            )
            .await;

        assert!(matches!(result, Err(ImportError::UnsupportedFileType)));
    }

    #[tokio::test]
    async fn rejects_empty_file() {
        let crm = Arc::new(MockCrm::default());
        let (executor, _) = executor_with(crm);

        let result = executor
            .start_import(
                ImportRequest {
                    file_name: "customers.csv".to_string(),
                },
                b"  \n\n".to_vec(),
            )
            .await;

        assert!(matches!(result, Err(ImportError::EmptyFile)));
    }

    #[tokio::test]
    async fn expired_session_aborts_before_any_row() {
        let crm = Arc::new(MockCrm {
            session_expired: true,
            ..Default::default()
        });
        let (executor, _) = executor_with(Arc::clone(&crm));

        let result = executor
            .start_import(
                ImportRequest {
                    file_name: "customers.csv".to_string(),
                },
                b"Ad,Telefon\nAhmet,555\n".to_vec(),
            )
            .await;

        assert!(matches!(result, Err(ImportError::SessionExpired(_))));
        assert!(crm.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn start_import_runs_in_background() {
        let crm = Arc::new(MockCrm::default());
        let (executor, _) = executor_with(Arc::clone(&crm));

        let response = executor
            .start_import(
                ImportRequest {
                    file_name: "Customers.CSV".to_string(),
                },
                "Müşteri Adı,Telefon\nAhmet,555\n".as_bytes().to_vec(),
            )
            .await
            .unwrap();

        let session_id = response.session_id.unwrap();

        // Ждем завершения фоновой задачи
        let mut finished = false;
        for _ in 0..100 {
            if let Some(progress) = executor.get_progress(&session_id) {
                if progress.status != ImportStatus::Running {
                    assert_eq!(progress.status, ImportStatus::Completed);
                    assert_eq!(progress.success_count, 1);
                    finished = true;
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(finished, "import did not finish in time");
    }

    #[tokio::test]
    async fn reimport_duplicates_customers() {
        // Идемпотентности нет: повторный импорт создает записи заново
        let crm = Arc::new(MockCrm::default());
        let (executor, tracker) = executor_with(Arc::clone(&crm));

        let csv = "Ad,Telefon\nAhmet,555\nAyşe,556\n";
        tracker.create_session("first".to_string(), 2);
        executor.run_import("first", rows_of(csv)).await;
        tracker.create_session("second".to_string(), 2);
        executor.run_import("second", rows_of(csv)).await;

        assert_eq!(crm.created.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn decodes_windows_1254_upload() {
        let crm = Arc::new(MockCrm::default());
        let (executor, _) = executor_with(Arc::clone(&crm));

        // "Müşteri Adı,Telefon\nGül,555\n" в Windows-1254
        let mut data = Vec::new();
        data.extend_from_slice(&[b'M', 0xFC, 0xFE, b't', b'e', b'r', b'i', b' ']);
        data.extend_from_slice(&[b'A', b'd', 0xFD]);
        data.extend_from_slice(b",Telefon\n");
        data.extend_from_slice(&[b'G', 0xFC, b'l']);
        data.extend_from_slice(b",555\n");

        let response = executor
            .start_import(
                ImportRequest {
                    file_name: "musteriler.csv".to_string(),
                },
                data,
            )
            .await
            .unwrap();

        let session_id = response.session_id.unwrap();

        let mut created_name = None;
        for _ in 0..100 {
            if let Some(progress) = executor.get_progress(&session_id) {
                if progress.status != ImportStatus::Running {
                    created_name = crm.created.lock().unwrap().first().map(|d| d.name.clone());
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(created_name.as_deref(), Some("Gül"));
    }

    #[tokio::test]
    async fn expired_completed_sessions_are_cleaned_on_next_start() {
        let crm = Arc::new(MockCrm::default());
        let tracker = Arc::new(ProgressTracker::new());
        let config = ImportConfig {
            rate_limit_requests: 10_000,
            rate_limit_window_ms: 1000,
            session_ttl_hours: 0, // завершенные сессии устаревают сразу
        };
        let executor = ImportExecutor::new(crm, Arc::clone(&tracker), config);

        let first = executor
            .start_import(
                ImportRequest {
                    file_name: "customers.csv".to_string(),
                },
                b"Ad,Telefon\nAhmet,555\n".to_vec(),
            )
            .await
            .unwrap();
        let first_id = first.session_id.unwrap();

        for _ in 0..100 {
            if let Some(progress) = executor.get_progress(&first_id) {
                if progress.status != ImportStatus::Running {
                    break;
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert_eq!(
            executor.get_progress(&first_id).unwrap().status,
            ImportStatus::Completed
        );

        // Старт следующего импорта выметает устаревшую сессию
        executor
            .start_import(
                ImportRequest {
                    file_name: "customers.csv".to_string(),
                },
                b"Ad,Telefon\nAli,556\n".to_vec(),
            )
            .await
            .unwrap();

        assert!(executor.get_progress(&first_id).is_none());
    }
}
