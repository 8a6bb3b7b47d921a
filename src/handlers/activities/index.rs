// handlers/activities/index.rs - GET /activities handler

use axum::{extract::State, Json};

use super::ActivitiesResponse;
use crate::app::AppState;
use crate::error::ApiError;

pub async fn activity_index(State(state): State<AppState>) -> Result<Json<ActivitiesResponse>, ApiError> {
    let activities = state.activities.list_all().await?;
    Ok(Json(ActivitiesResponse { activities }))
}
