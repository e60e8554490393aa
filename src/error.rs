//! Error types for dataset and query-link operations

use thiserror::Error;

/// Errors that can occur while managing datasets and query links
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Query link not found: {0}")]
    LinkNotFound(String),

    #[error("Slug already in use: {0}")]
    DuplicateSlug(String),

    #[error("Required field missing: {0}")]
    MissingRequiredField(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("SQL error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn dataset_not_found(msg: impl Into<String>) -> Self {
        Self::DatasetNotFound(msg.into())
    }

    pub fn link_not_found(msg: impl Into<String>) -> Self {
        Self::LinkNotFound(msg.into())
    }

    pub fn duplicate_slug(msg: impl Into<String>) -> Self {
        Self::DuplicateSlug(msg.into())
    }

    pub fn missing_required_field(msg: impl Into<String>) -> Self {
        Self::MissingRequiredField(msg.into())
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::Database(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
