use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::{Activity, ActivityPatch, ActivityRow, NewActivity};

/// Errors surfaced by activity storage
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Activity {0} not found")]
    NotFound(Uuid),

    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        if matches!(
            err,
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
        ) {
            return RepositoryError::Unavailable(err.to_string());
        }
        RepositoryError::Sqlx(err)
    }
}

/// Persistence access for activities. Every read resolves the stored owner
/// id to a full user record when one exists; an owner that is absent or
/// names no user reads back as `None`. Mutations assume the caller already
/// checked ownership.
#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// All activities in storage order
    async fn list_all(&self) -> Result<Vec<Activity>, RepositoryError>;

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Activity>, RepositoryError>;

    async fn create(&self, new: NewActivity) -> Result<Activity, RepositoryError>;

    async fn update_by_id(&self, id: Uuid, patch: ActivityPatch) -> Result<(), RepositoryError>;

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError>;

    async fn health_check(&self) -> Result<(), RepositoryError>;
}

const SELECT_ACTIVITY: &str = r#"
    SELECT
        a.id, a.owner_id, a.title, a.description, a.activity_type,
        a.participants, a.price, a.accessibility, a.link, a.key,
        a.completed, a.created_at, a.updated_at,
        u.email AS owner_email,
        u.created_at AS owner_created_at,
        u.updated_at AS owner_updated_at
    FROM activities a
    LEFT JOIN users u ON u.id = a.owner_id
"#;

/// PostgreSQL-backed activity storage
pub struct PgActivityRepository {
    pool: PgPool,
}

impl PgActivityRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityRepository for PgActivityRepository {
    async fn list_all(&self) -> Result<Vec<Activity>, RepositoryError> {
        let sql = format!("{} ORDER BY a.created_at, a.id", SELECT_ACTIVITY);
        let rows = sqlx::query_as::<_, ActivityRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Activity::from).collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Activity>, RepositoryError> {
        let sql = format!("{} WHERE a.id = $1", SELECT_ACTIVITY);
        let row = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Activity::from))
    }

    async fn create(&self, new: NewActivity) -> Result<Activity, RepositoryError> {
        let id = Uuid::new_v4();
        let owner = new.owner;

        sqlx::query(
            r#"
            INSERT INTO activities
                (id, owner_id, title, description, activity_type, participants,
                 price, accessibility, link, key, completed)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(id)
        .bind(new.owner)
        .bind(new.title)
        .bind(new.description)
        .bind(new.activity_type)
        .bind(new.participants)
        .bind(new.price)
        .bind(new.accessibility)
        .bind(new.link)
        .bind(new.key)
        .bind(new.completed)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Inserted activity {} for owner {:?}", id, owner);
        self.get_by_id(id).await?.ok_or(RepositoryError::NotFound(id))
    }

    async fn update_by_id(&self, id: Uuid, patch: ActivityPatch) -> Result<(), RepositoryError> {
        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new("UPDATE activities SET updated_at = now()");

        if let Some(title) = patch.title {
            qb.push(", title = ").push_bind(title);
        }
        if let Some(description) = patch.description {
            qb.push(", description = ").push_bind(description);
        }
        if let Some(activity_type) = patch.activity_type {
            qb.push(", activity_type = ").push_bind(activity_type);
        }
        if let Some(participants) = patch.participants {
            qb.push(", participants = ").push_bind(participants);
        }
        if let Some(price) = patch.price {
            qb.push(", price = ").push_bind(price);
        }
        if let Some(accessibility) = patch.accessibility {
            qb.push(", accessibility = ").push_bind(accessibility);
        }
        if let Some(link) = patch.link {
            qb.push(", link = ").push_bind(link);
        }
        if let Some(key) = patch.key {
            qb.push(", key = ").push_bind(key);
        }
        if let Some(completed) = patch.completed {
            qb.push(", completed = ").push_bind(completed);
        }
        qb.push(" WHERE id = ").push_bind(id);

        let result = qb.build().execute(&self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM activities WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(id));
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
