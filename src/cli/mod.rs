use anyhow::Context;
use clap::{Parser, Subcommand};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use uuid::Uuid;

use crate::app::{app, AppState};
use crate::auth::issue_token;
use crate::config::AppConfig;
use crate::database::models::User;
use crate::database::{schema, ActivityRepository, Database, MemoryActivityRepository, PgActivityRepository};
use crate::upstream::HttpActivityProvider;

#[derive(Parser)]
#[command(name = "activities-api")]
#[command(about = "Activities REST API server and maintenance commands")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server (default)")]
    Serve {
        #[arg(long, help = "Keep activities in process memory instead of PostgreSQL")]
        in_memory: bool,
    },

    #[command(about = "Create the users and activities tables if missing")]
    Migrate,

    #[command(about = "Print a bearer token for a user id")]
    Token {
        #[arg(long, help = "User id to place in the token subject")]
        user: Uuid,
    },
}

pub async fn run(cli: Cli, config: AppConfig) -> anyhow::Result<()> {
    match cli.command.unwrap_or(Commands::Serve { in_memory: false }) {
        Commands::Serve { in_memory } => serve(config, in_memory).await,
        Commands::Migrate => migrate(config).await,
        Commands::Token { user } => {
            let token = issue_token(user, &config.security).context("failed to issue token")?;
            println!("{}", token);
            Ok(())
        }
    }
}

async fn serve(config: AppConfig, in_memory: bool) -> anyhow::Result<()> {
    let provider = Arc::new(HttpActivityProvider::new(&config.upstream)?);

    let (activities, database): (Arc<dyn ActivityRepository>, Option<Database>) = if in_memory {
        let repo = MemoryActivityRepository::new();
        let user = repo.insert_user(User::new("demo@example.com")).await;
        let token = issue_token(user.id, &config.security).context("failed to issue demo token")?;
        info!("In-memory store seeded with user {} <{}>", user.id, user.email);
        info!("Bearer token for {}: {}", user.email, token);
        let repo: Arc<dyn ActivityRepository> = Arc::new(repo);
        (repo, None)
    } else {
        let db = Database::connect(&config.database)
            .await
            .context("failed to connect to database")?;
        let repo: Arc<dyn ActivityRepository> = Arc::new(PgActivityRepository::new(db.pool().clone()));
        (repo, Some(db))
    };

    let bind_addr = config.bind_addr();
    let state = AppState::new(activities, provider, config);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    info!("Activities API listening on http://{}", bind_addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    if let Some(db) = database {
        db.close().await;
    }
    Ok(())
}

async fn migrate(config: AppConfig) -> anyhow::Result<()> {
    let db = Database::connect(&config.database)
        .await
        .context("failed to connect to database")?;
    let result = schema::ensure_schema(db.pool()).await;
    db.close().await;
    result.context("failed to create schema")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
