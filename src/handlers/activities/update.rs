// handlers/activities/update.rs - PATCH /activities/:id handler
//
// Runs behind jwt_auth_middleware and remove_blank_fields. The patch type
// has no owner field, so an `owner` key in the body never reaches storage.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::{parse_activity_id, ActivityBody};
use crate::app::AppState;
use crate::database::models::ActivityPatch;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::policy::{require_found, require_ownership};

pub async fn activity_update(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<ActivityBody<ActivityPatch>>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let id = parse_activity_id(&id)?;
    let Json(body) = payload?;
    let patch = body.activity;

    let activity = require_found(state.activities.get_by_id(id).await?)?;
    require_ownership(&user, &activity)?;

    patch
        .validate()
        .map_err(|field_errors| ApiError::unprocessable_entity("Validation failed", field_errors))?;

    if patch.is_empty() {
        tracing::debug!("Nothing to update on activity {}", id);
        return Ok(StatusCode::NO_CONTENT);
    }

    state.activities.update_by_id(id, patch).await?;
    tracing::info!("User {} updated activity {}", user.user_id, id);

    Ok(StatusCode::NO_CONTENT)
}
