//! PgActivityRepository against a live database. Skipped unless DATABASE_URL
//! points at a PostgreSQL instance the tests may write to.

use anyhow::Result;
use tokio::sync::OnceCell;
use uuid::Uuid;

use activities_api::config::AppConfig;
use activities_api::database::models::{ActivityPatch, NewActivity, User};
use activities_api::database::{schema, ActivityRepository, Database, PgActivityRepository, RepositoryError};

static SCHEMA: OnceCell<()> = OnceCell::const_new();

async fn connect() -> Result<Option<Database>> {
    let Ok(url) = std::env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set; skipping PostgreSQL repository test");
        return Ok(None);
    };

    let mut config = AppConfig::development().database;
    config.url = Some(url);
    let db = Database::connect(&config).await?;
    SCHEMA
        .get_or_try_init(|| async { schema::ensure_schema(db.pool()).await })
        .await?;
    Ok(Some(db))
}

async fn insert_user(db: &Database) -> Result<User> {
    let user = User::new(format!("{}@example.com", Uuid::new_v4()));
    sqlx::query("INSERT INTO users (id, email, created_at, updated_at) VALUES ($1, $2, $3, $4)")
        .bind(user.id)
        .bind(&user.email)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(db.pool())
        .await?;
    // Round-trip through the database so timestamps match its precision
    Ok(sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user.id)
        .fetch_one(db.pool())
        .await?)
}

fn new_activity(owner: Option<Uuid>, title: &str) -> NewActivity {
    NewActivity {
        owner,
        title: title.to_string(),
        description: Some("around the park".to_string()),
        activity_type: Some("recreational".to_string()),
        participants: Some(1),
        price: Some(0.0),
        accessibility: None,
        link: None,
        key: None,
        completed: false,
    }
}

#[tokio::test]
async fn pg_repository_crud_lifecycle() -> Result<()> {
    let Some(db) = connect().await? else {
        return Ok(());
    };
    let repo = PgActivityRepository::new(db.pool().clone());
    let owner = insert_user(&db).await?;

    let created = repo.create(new_activity(Some(owner.id), "run")).await?;
    assert_eq!(created.owner_id, Some(owner.id));
    assert_eq!(created.owner.as_ref(), Some(&owner));
    assert_eq!(created.title, "run");
    assert!(!created.completed);

    let fetched = repo.get_by_id(created.id).await?.expect("created activity");
    assert_eq!(fetched, created);

    let patch = ActivityPatch {
        title: Some("long run".to_string()),
        description: Some(None),
        participants: Some(Some(3)),
        completed: Some(true),
        ..Default::default()
    };
    repo.update_by_id(created.id, patch).await?;

    let updated = repo.get_by_id(created.id).await?.expect("updated activity");
    assert_eq!(updated.title, "long run");
    assert_eq!(updated.description, None);
    assert_eq!(updated.participants, Some(3));
    assert_eq!(updated.activity_type.as_deref(), Some("recreational"));
    assert!(updated.completed);
    assert_eq!(updated.owner_id, Some(owner.id));
    assert_eq!(updated.owner.as_ref(), Some(&owner));
    assert!(updated.updated_at >= created.updated_at);

    let listed = repo.list_all().await?;
    let entry = listed.iter().find(|a| a.id == created.id).expect("listed activity");
    assert_eq!(entry.owner.as_ref().map(|u| u.email.as_str()), Some(owner.email.as_str()));

    repo.delete_by_id(created.id).await?;
    assert!(repo.get_by_id(created.id).await?.is_none());
    assert!(matches!(
        repo.delete_by_id(created.id).await,
        Err(RepositoryError::NotFound(id)) if id == created.id
    ));
    assert!(matches!(
        repo.update_by_id(created.id, ActivityPatch::default()).await,
        Err(RepositoryError::NotFound(_))
    ));

    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(owner.id)
        .execute(db.pool())
        .await?;
    db.close().await;
    Ok(())
}

#[tokio::test]
async fn pg_repository_keeps_absent_and_unknown_owners() -> Result<()> {
    let Some(db) = connect().await? else {
        return Ok(());
    };
    let repo = PgActivityRepository::new(db.pool().clone());
    let unknown = Uuid::new_v4();

    let ownerless = repo.create(new_activity(None, "read")).await?;
    let orphaned = repo.create(new_activity(Some(unknown), "swim")).await?;

    assert_eq!(ownerless.owner_id, None);
    assert_eq!(ownerless.owner, None);
    assert_eq!(orphaned.owner_id, Some(unknown));
    assert_eq!(orphaned.owner, None);

    let listed = repo.list_all().await?;
    assert!(listed.iter().any(|a| a.id == ownerless.id && a.owner.is_none()));
    assert!(listed.iter().any(|a| a.id == orphaned.id && a.owner_id == Some(unknown)));

    for id in [ownerless.id, orphaned.id] {
        repo.delete_by_id(id).await?;
    }
    db.close().await;
    Ok(())
}
