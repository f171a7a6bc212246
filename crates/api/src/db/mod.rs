//! Persistence for users, parts, orders, payments and reviews.
//!
//! Each collection has a repository trait; [`Store`] bundles them so services
//! hold a single handle. Two backends implement every trait:
//!
//! - [`PgStore`] - `PostgreSQL` through a shared `sqlx` pool
//! - [`MemoryStore`] - process-local tables for development and tests
//!
//! # Tables
//!
//! - `users` - Profiles keyed by external `uid`, with role
//! - `parts` - Catalog, unique business `id`
//! - `orders` - Placed orders with price snapshot
//! - `payments` - Payments reported by clients
//! - `reviews` - Append-only reviews
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p pc-house-cli -- migrate
//! ```

pub mod memory;
pub mod orders;
pub mod parts;
pub mod payments;
pub mod reviews;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::config::StoreBackend;

pub use memory::MemoryStore;
pub use orders::OrderRepository;
pub use parts::PartRepository;
pub use payments::PaymentRepository;
pub use reviews::ReviewRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate part id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Connectivity check used by the readiness endpoint.
#[async_trait]
pub trait HealthCheck: Send + Sync {
    /// Succeeds when the backend can serve queries.
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Every repository the services need, behind one handle.
pub trait Store:
    UserRepository
    + PartRepository
    + OrderRepository
    + PaymentRepository
    + ReviewRepository
    + HealthCheck
{
}

impl<T> Store for T where
    T: UserRepository
        + PartRepository
        + OrderRepository
        + PaymentRepository
        + ReviewRepository
        + HealthCheck
{
}

/// `PostgreSQL` backend. Cheap to clone (the pool is reference counted).
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wrap an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl HealthCheck for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Open the configured backend. Called once at startup.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the `PostgreSQL` pool cannot connect.
pub async fn open(backend: &StoreBackend) -> Result<Arc<dyn Store>, RepositoryError> {
    match backend {
        StoreBackend::Postgres { database_url } => {
            let pool = create_pool(database_url).await?;
            Ok(Arc::new(PgStore::new(pool)))
        }
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}

/// Map a unique-constraint violation to `Conflict`, anything else to `Database`.
pub(crate) fn map_unique_violation(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
