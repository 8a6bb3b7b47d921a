//! Not-found and ownership checks shared by the activity handlers

use crate::database::models::Activity;
use crate::error::ApiError;
use crate::middleware::AuthUser;

/// Unwrap a fetched entity, turning absence into a 404
pub fn require_found<T>(entity: Option<T>) -> Result<T, ApiError> {
    entity.ok_or_else(|| ApiError::not_found("The requested resource was not found"))
}

/// Fail with 403 unless `requester` owns `activity`
pub fn require_ownership(requester: &AuthUser, activity: &Activity) -> Result<(), ApiError> {
    if activity.owner_id != Some(requester.user_id) {
        tracing::warn!(
            "User {} attempted to modify activity {} owned by {:?}",
            requester.user_id,
            activity.id,
            activity.owner_id
        );
        return Err(ApiError::forbidden("You do not own this resource"));
    }
    Ok(())
}
