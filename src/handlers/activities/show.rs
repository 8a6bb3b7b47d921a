// handlers/activities/show.rs - GET /activities/:id handler

use axum::{
    extract::{Path, State},
    Json,
};

use super::{parse_activity_id, ActivityResponse};
use crate::app::AppState;
use crate::error::ApiError;
use crate::policy::require_found;

pub async fn activity_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ActivityResponse>, ApiError> {
    let id = parse_activity_id(&id)?;
    let activity = require_found(state.activities.get_by_id(id).await?)?;
    Ok(Json(ActivityResponse { activity }))
}
