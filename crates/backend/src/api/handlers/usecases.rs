use axum::extract::{Multipart, Path};
use axum::http::StatusCode;
use axum::Json;
use contracts::usecases::u501_import_customers::{ImportResponse, ImportStartStatus};
use once_cell::sync::Lazy;
use std::sync::Arc;

use crate::shared::config::{self, Config};
use crate::shared::crm_client::{CrmApi, HttpCrmClient};
use crate::usecases;
use crate::usecases::u501_import_customers::ImportError;

static CONFIG: Lazy<Config> =
    Lazy::new(|| config::load_config().expect("Failed to load configuration"));

static CRM_CLIENT: Lazy<Arc<dyn CrmApi>> =
    Lazy::new(|| Arc::new(HttpCrmClient::new(&CONFIG.crm)));

// ============================================================================
// UseCase u501: Import customers from CSV
// ============================================================================

static IMPORT_EXECUTOR: Lazy<Arc<usecases::u501_import_customers::ImportExecutor>> =
    Lazy::new(|| {
        let tracker = Arc::new(usecases::u501_import_customers::ProgressTracker::new());
        Arc::new(usecases::u501_import_customers::ImportExecutor::new(
            Arc::clone(&CRM_CLIENT),
            tracker,
            CONFIG.import.clone(),
        ))
    });

/// Ответ на проваленный старт импорта: сессии нет, статус failed
fn failed_start(message: String) -> Json<ImportResponse> {
    Json(ImportResponse {
        session_id: None,
        status: ImportStartStatus::Failed,
        message,
    })
}

/// POST /api/u501/import/start (multipart, поле "file")
pub async fn u501_start_import(
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, (StatusCode, Json<ImportResponse>)> {
    let mut file_name = None;
    let mut data = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            failed_start(format!("Invalid multipart: {}", e)),
        )
    })? {
        if field.name() == Some("file") {
            file_name = field.file_name().map(ToString::to_string);
            let bytes = field.bytes().await.map_err(|e| {
                (
                    StatusCode::BAD_REQUEST,
                    failed_start(format!("Failed to read file: {}", e)),
                )
            })?;
            data = Some(bytes.to_vec());
        }
    }

    let missing_file = || {
        (
            StatusCode::BAD_REQUEST,
            failed_start("file part is required".to_string()),
        )
    };
    let file_name = file_name.ok_or_else(missing_file)?;
    let data = data.ok_or_else(missing_file)?;

    let request = contracts::usecases::u501_import_customers::ImportRequest { file_name };

    match IMPORT_EXECUTOR.start_import(request, data).await {
        Ok(response) => Ok(Json(response)),
        Err(e @ (ImportError::UnsupportedFileType | ImportError::EmptyFile)) => {
            Err((StatusCode::BAD_REQUEST, failed_start(e.to_string())))
        }
        Err(e @ ImportError::SessionExpired(_)) => {
            tracing::warn!("Import aborted: {}", e);
            Err((StatusCode::UNAUTHORIZED, failed_start(e.to_string())))
        }
    }
}

/// GET /api/u501/import/:session_id/progress
pub async fn u501_get_progress(
    Path(session_id): Path<String>,
) -> Result<
    Json<contracts::usecases::u501_import_customers::ImportProgress>,
    StatusCode,
> {
    match IMPORT_EXECUTOR.get_progress(&session_id) {
        Some(progress) => Ok(Json(progress)),
        None => Err(StatusCode::NOT_FOUND),
    }
}

// ============================================================================
// UseCase u502: Recurring work orders
// ============================================================================

static GENERATE_EXECUTOR: Lazy<Arc<usecases::u502_recurring_orders::GenerateExecutor>> =
    Lazy::new(|| {
        Arc::new(usecases::u502_recurring_orders::GenerateExecutor::new(
            Arc::clone(&CRM_CLIENT),
        ))
    });

/// POST /api/u502/generate/start
pub async fn u502_generate(
    Json(request): Json<contracts::usecases::u502_recurring_orders::GenerateRequest>,
) -> Result<
    Json<contracts::usecases::u502_recurring_orders::GenerateResponse>,
    (StatusCode, String),
> {
    match GENERATE_EXECUTOR.generate(request).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            tracing::error!("Failed to generate recurring orders: {}", e);
            Err((StatusCode::BAD_REQUEST, e.to_string()))
        }
    }
}
