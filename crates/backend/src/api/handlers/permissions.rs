use axum::extract::Path;
use axum::http::StatusCode;
use axum::Json;
use contracts::shared::permissions::{allowed_features, Role};
use serde_json::json;

/// GET /api/system/permissions/:role
///
/// Allow-set возможностей для роли; UI строит меню только по нему
pub async fn get_role_features(
    Path(role): Path<String>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    let role: Role = role
        .parse()
        .map_err(|e: String| (StatusCode::BAD_REQUEST, e))?;

    Ok(Json(json!({
        "role": role,
        "features": allowed_features(role),
    })))
}
