//! Subcommand implementations.
//!
//! Every command talks to `PostgreSQL` directly; the in-memory store has
//! nothing to migrate or administer.

pub mod admin;
pub mod migrate;
pub mod stock;

use pc_house_api::db::{PgStore, create_pool};
use secrecy::SecretString;
use thiserror::Error;

/// Errors shared by every command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed to apply.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// No user record exists for the uid.
    #[error("No user with uid {0}; they must sign in once first")]
    UnknownUser(String),

    /// An argument failed validation.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The service layer rejected the operation.
    #[error("{0}")]
    Service(#[from] pc_house_api::error::AppError),
}

/// Resolve the database URL the same way the server does.
fn database_url() -> Result<SecretString, CommandError> {
    dotenvy::dotenv().ok();

    std::env::var("PC_HOUSE_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("PC_HOUSE_DATABASE_URL"))
}

/// Connect a store for commands that go through the service layer.
async fn connect() -> Result<PgStore, CommandError> {
    let url = database_url()?;
    tracing::info!("Connecting to database...");
    Ok(PgStore::new(create_pool(&url).await?))
}
