//! Application settings routes.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{SettingResponse, SettingSource, UpdateSettingRequest};
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

/// List every resolvable setting.
///
/// GET /api/v1/settings
pub async fn list_settings(
    State(state): State<AppState>,
) -> Result<Json<Vec<SettingResponse>>, ApiError> {
    Ok(Json(state.settings.list().await?))
}

/// GET /api/v1/settings/:key
pub async fn get_setting(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<SettingResponse>, ApiError> {
    state
        .settings
        .get(&key)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Setting '{}' not found", key)))
}

/// Store a setting value. It overrides any configured fallback from now on.
///
/// PUT /api/v1/settings/:key
pub async fn put_setting(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(key): Path<String>,
    Json(request): Json<UpdateSettingRequest>,
) -> Result<Json<SettingResponse>, ApiError> {
    request.validate()?;

    let stored = state.settings.set_value(&key, &request.value, &actor).await?;
    info!(key = %stored.key, actor = %actor, "Setting stored via API");

    Ok(Json(SettingResponse {
        key: stored.key,
        value: stored.value,
        source: SettingSource::Database,
    }))
}
