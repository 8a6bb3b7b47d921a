// handlers/activities/mod.rs - Activity resource handlers
//
// List, show, create and random are public. Update and destroy require a
// bearer token and check that the requester owns the activity.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::Activity;
use crate::error::ApiError;

pub mod create;  // POST /activities
pub mod destroy; // DELETE /activities/:id
pub mod index;   // GET /activities
pub mod random;  // GET /activities/random
pub mod show;    // GET /activities/:id
pub mod update;  // PATCH /activities/:id

pub use create::activity_create;
pub use destroy::activity_destroy;
pub use index::activity_index;
pub use random::activity_random;
pub use show::activity_show;
pub use update::activity_update;

/// `{ "activity": ... }` request body
#[derive(Debug, Deserialize)]
pub struct ActivityBody<T> {
    pub activity: T,
}

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub activity: Activity,
}

#[derive(Debug, Serialize)]
pub struct ActivitiesResponse {
    pub activities: Vec<Activity>,
}

/// An id that cannot be parsed can never match a stored activity
pub(crate) fn parse_activity_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found(format!("Activity {} not found", raw)))
}
