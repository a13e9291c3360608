//! Axum handlers for the status and key-management endpoints.
//!
//! Admin calls authenticate with the server-configured secret, supplied via
//! the `x-admin-key` header or an `adminKey` field in the body.

use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::config::Config;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub has_key: bool,
    pub model: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetKeyRequest {
    pub api_key: String,
    pub admin_key: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ClearKeyRequest {
    pub admin_key: String,
}

/// GET /api/status
pub async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    Json(StatusResponse {
        has_key: state.credentials.has_key(),
        model: state.credentials.active_model(),
    })
}

/// POST /api/key
pub async fn set_key_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SetKeyRequest>,
) -> Result<Json<Value>, AppError> {
    require_admin(&state.config, &headers, &req.admin_key)?;

    let submitted = req.api_key.trim();
    if submitted.is_empty() {
        return Err(AppError::Validation("API key is required.".to_string()));
    }

    state.credentials.set_api_key(submitted);
    info!("model API key updated");
    Ok(Json(json!({ "ok": true })))
}

/// DELETE /api/key
/// The body is optional; the admin credential may arrive via header alone.
pub async fn clear_key_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<ClearKeyRequest>>,
) -> Result<Json<Value>, AppError> {
    let body_admin_key = body.map(|Json(req)| req.admin_key).unwrap_or_default();
    require_admin(&state.config, &headers, &body_admin_key)?;

    state.credentials.clear_api_key();
    info!("model API key cleared");
    Ok(Json(json!({ "ok": true })))
}

/// Checks the admin credential: 503 while no secret is configured, 401 on a
/// missing or mismatched value. The submitted value is never logged.
fn require_admin(config: &Config, headers: &HeaderMap, body_admin_key: &str) -> Result<(), AppError> {
    if config.admin_key.is_empty() {
        return Err(AppError::AdminNotConfigured);
    }

    let provided = headers
        .get("x-admin-key")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .unwrap_or(body_admin_key);

    if provided.is_empty() || provided != config.admin_key {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}
