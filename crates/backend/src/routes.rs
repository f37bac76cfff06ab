use axum::{
    routing::{get, post},
    Router,
};

use crate::api::handlers;

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        // ========================================
        // SYSTEM
        // ========================================
        .route(
            "/api/system/permissions/:role",
            get(handlers::permissions::get_role_features),
        )
        // ========================================
        // UseCase u501: Import customers from CSV
        // ========================================
        .route(
            "/api/u501/import/start",
            post(handlers::usecases::u501_start_import),
        )
        .route(
            "/api/u501/import/:session_id/progress",
            get(handlers::usecases::u501_get_progress),
        )
        // ========================================
        // UseCase u502: Recurring work orders
        // ========================================
        .route(
            "/api/u502/generate/start",
            post(handlers::usecases::u502_generate),
        )
}
