// handlers/activities/random.rs - GET /activities/random handler

use axum::{extract::State, Json};
use serde_json::Value;

use crate::app::AppState;
use crate::error::ApiError;

/// Relay the upstream provider's body as-is
pub async fn activity_random(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let activity = state.provider.random_activity().await?;
    Ok(Json(activity))
}
