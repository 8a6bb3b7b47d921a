// handlers/activities/destroy.rs - DELETE /activities/:id handler

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension,
};

use super::parse_activity_id;
use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::policy::{require_found, require_ownership};

pub async fn activity_destroy(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_activity_id(&id)?;

    let activity = require_found(state.activities.get_by_id(id).await?)?;
    require_ownership(&user, &activity)?;

    state.activities.delete_by_id(id).await?;
    tracing::info!("User {} deleted activity {}", user.user_id, id);

    Ok(StatusCode::NO_CONTENT)
}
