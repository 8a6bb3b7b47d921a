use sqlx::PgPool;
use tracing::info;

use super::manager::DatabaseError;

const CREATE_USERS: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id          UUID PRIMARY KEY,
        email       TEXT NOT NULL UNIQUE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

const CREATE_ACTIVITIES: &str = r#"
    CREATE TABLE IF NOT EXISTS activities (
        id             UUID PRIMARY KEY,
        owner_id       UUID,
        title          TEXT NOT NULL,
        description    TEXT,
        activity_type  TEXT,
        participants   INTEGER,
        price          DOUBLE PRECISION,
        accessibility  DOUBLE PRECISION,
        link           TEXT,
        key            TEXT,
        completed      BOOLEAN NOT NULL DEFAULT FALSE,
        created_at     TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at     TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

// Tables created before owners became optional carry a NOT NULL foreign key
const RELAX_ACTIVITIES_OWNER: [&str; 2] = [
    "ALTER TABLE activities DROP CONSTRAINT IF EXISTS activities_owner_id_fkey",
    "ALTER TABLE activities ALTER COLUMN owner_id DROP NOT NULL",
];

const CREATE_ACTIVITIES_OWNER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS activities_owner_id_idx ON activities (owner_id)";

/// Create the tables the API needs if they are missing
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DatabaseError> {
    for statement in [CREATE_USERS, CREATE_ACTIVITIES]
        .into_iter()
        .chain(RELAX_ACTIVITIES_OWNER)
        .chain([CREATE_ACTIVITIES_OWNER_INDEX])
    {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Database schema is up to date");
    Ok(())
}
