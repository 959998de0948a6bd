//! Store error types.

use thiserror::Error;

/// Errors surfaced by the data access layer.
///
/// Expected negative outcomes (absent document on a get, wrong password,
/// duplicate email) are `Option::None` at the call sites, not errors. These
/// variants cover updates against missing parents and store failures.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Document not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt document: {0}")]
    Corrupt(String),
}
