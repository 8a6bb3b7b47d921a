use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use super::user::User;

/// Activity as returned to clients, with the owner populated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    pub id: Uuid,
    /// Stored owner reference. May be absent, or name no existing user.
    #[serde(skip)]
    pub owner_id: Option<Uuid>,
    /// `owner_id` resolved to a user; `null` when it cannot be resolved
    pub owner: Option<User>,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub participants: Option<i32>,
    pub price: Option<f64>,
    pub accessibility: Option<f64>,
    pub link: Option<String>,
    pub key: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Flat row produced by joining `activities` with `users`
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub activity_type: Option<String>,
    pub participants: Option<i32>,
    pub price: Option<f64>,
    pub accessibility: Option<f64>,
    pub link: Option<String>,
    pub key: Option<String>,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    // NULL when the LEFT JOIN finds no user
    pub owner_email: Option<String>,
    pub owner_created_at: Option<DateTime<Utc>>,
    pub owner_updated_at: Option<DateTime<Utc>>,
}

impl From<ActivityRow> for Activity {
    fn from(row: ActivityRow) -> Self {
        let owner = match (row.owner_id, row.owner_email, row.owner_created_at, row.owner_updated_at) {
            (Some(id), Some(email), Some(created_at), Some(updated_at)) => Some(User {
                id,
                email,
                created_at,
                updated_at,
            }),
            _ => None,
        };

        Self {
            id: row.id,
            owner_id: row.owner_id,
            owner,
            title: row.title,
            description: row.description,
            activity_type: row.activity_type,
            participants: row.participants,
            price: row.price,
            accessibility: row.accessibility,
            link: row.link,
            key: row.key,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Create payload exactly as received. `title` is optional here so that a
/// missing title is reported as a validation error, not a parse error.
/// `owner` is taken as given: it may be absent or name no existing user.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateActivity {
    pub owner: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub activity_type: Option<String>,
    pub participants: Option<i32>,
    pub price: Option<f64>,
    pub accessibility: Option<f64>,
    pub link: Option<String>,
    pub key: Option<String>,
    pub completed: Option<bool>,
}

/// Validated create payload handed to the repository
#[derive(Debug, Clone, PartialEq)]
pub struct NewActivity {
    pub owner: Option<Uuid>,
    pub title: String,
    pub description: Option<String>,
    pub activity_type: Option<String>,
    pub participants: Option<i32>,
    pub price: Option<f64>,
    pub accessibility: Option<f64>,
    pub link: Option<String>,
    pub key: Option<String>,
    pub completed: bool,
}

impl CreateActivity {
    pub fn validate(self) -> Result<NewActivity, HashMap<String, String>> {
        let mut errors = HashMap::new();

        let title = self.title.filter(|t| !t.trim().is_empty());
        if title.is_none() {
            errors.insert("title".to_string(), "This field is required".to_string());
        }

        check_ranges(&mut errors, self.participants, self.price, self.accessibility);

        match title {
            Some(title) if errors.is_empty() => Ok(NewActivity {
                owner: self.owner,
                title,
                description: self.description,
                activity_type: self.activity_type,
                participants: self.participants,
                price: self.price,
                accessibility: self.accessibility,
                link: self.link,
                key: self.key,
                completed: self.completed.unwrap_or(false),
            }),
            _ => Err(errors),
        }
    }
}

/// Partial update. An absent field leaves the stored value alone; for
/// nullable columns an explicit `null` clears it. There is no `owner`
/// field: ownership is fixed at creation and an `owner` key in the body
/// is dropped during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ActivityPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, rename = "type", deserialize_with = "nullable")]
    pub activity_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub participants: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub accessibility: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub link: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub key: Option<Option<String>>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl ActivityPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn validate(&self) -> Result<(), HashMap<String, String>> {
        let mut errors = HashMap::new();
        if matches!(&self.title, Some(t) if t.trim().is_empty()) {
            errors.insert("title".to_string(), "Title cannot be blank".to_string());
        }
        check_ranges(
            &mut errors,
            self.participants.flatten(),
            self.price.flatten(),
            self.accessibility.flatten(),
        );
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Apply the patch to an in-memory activity
    pub fn apply_to(&self, activity: &mut Activity) {
        if let Some(title) = &self.title {
            activity.title = title.clone();
        }
        if let Some(v) = &self.description {
            activity.description = v.clone();
        }
        if let Some(v) = &self.activity_type {
            activity.activity_type = v.clone();
        }
        if let Some(v) = self.participants {
            activity.participants = v;
        }
        if let Some(v) = self.price {
            activity.price = v;
        }
        if let Some(v) = self.accessibility {
            activity.accessibility = v;
        }
        if let Some(v) = &self.link {
            activity.link = v.clone();
        }
        if let Some(v) = &self.key {
            activity.key = v.clone();
        }
        if let Some(v) = self.completed {
            activity.completed = v;
        }
    }
}

fn check_ranges(
    errors: &mut HashMap<String, String>,
    participants: Option<i32>,
    price: Option<f64>,
    accessibility: Option<f64>,
) {
    if matches!(participants, Some(p) if p < 1) {
        errors.insert("participants".to_string(), "Must be at least 1".to_string());
    }
    if matches!(price, Some(p) if !(0.0..=1.0).contains(&p)) {
        errors.insert("price".to_string(), "Must be between 0 and 1".to_string());
    }
    if matches!(accessibility, Some(a) if !(0.0..=1.0).contains(&a)) {
        errors.insert("accessibility".to_string(), "Must be between 0 and 1".to_string());
    }
}

// Distinguishes `"field": null` (Some(None)) from a missing field (None)
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
