// handlers/activities/create.rs - POST /activities handler
//
// Not behind token auth, and the owner is read from the body rather than
// taken from a requester identity. The owner is stored as given, even when
// it is missing or names no known user.

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use super::{ActivityBody, ActivityResponse};
use crate::app::AppState;
use crate::database::models::CreateActivity;
use crate::error::ApiError;

pub async fn activity_create(
    State(state): State<AppState>,
    payload: Result<Json<ActivityBody<CreateActivity>>, JsonRejection>,
) -> Result<(StatusCode, Json<ActivityResponse>), ApiError> {
    let Json(body) = payload?;
    let new = body
        .activity
        .validate()
        .map_err(|field_errors| ApiError::unprocessable_entity("Validation failed", field_errors))?;

    let activity = state.activities.create(new).await?;
    match activity.owner_id {
        Some(owner_id) if activity.owner.is_none() => tracing::warn!(
            "Created activity {} for owner {} with no matching user",
            activity.id,
            owner_id
        ),
        owner_id => tracing::info!("Created activity {} owned by {:?}", activity.id, owner_id),
    }

    Ok((StatusCode::CREATED, Json(ActivityResponse { activity })))
}
