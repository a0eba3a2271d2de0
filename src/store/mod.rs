pub mod mongo;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database unreachable: {0}")]
    Connection(String),
    #[error("unique index on {collection}.{field} conflicts with existing data: {message}")]
    ConstraintViolation {
        collection: String,
        field: String,
        message: String,
    },
    #[error("administrative command failed: {0}")]
    Administrative(String),
}

/// Schema-administration interface of the document store.
///
/// Every operation is idempotent: ensuring something that already exists
/// is success, never an error.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Liveness check against the target instance.
    async fn ping(&self) -> Result<(), StoreError>;

    /// Create the collection if absent.
    async fn ensure_collection(&self, name: &str) -> Result<(), StoreError>;

    /// Create a unique index on `field` if absent.
    ///
    /// Fails with [`StoreError::ConstraintViolation`] when documents
    /// already present in the collection share a value for `field`.
    async fn ensure_unique_index(&self, collection: &str, field: &str) -> Result<(), StoreError>;
}
