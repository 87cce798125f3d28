//! Blob storage collaborators
//!
//! The pipeline only ever needs two operations on object storage: read a
//! whole object with its content type, and write a whole object with a
//! content type. [`BlobStore`] captures exactly that, with an S3-backed
//! implementation for production and an in-memory one for tests and local
//! runs.

pub mod memory;
pub mod s3;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

pub use memory::MemoryBlobStore;
pub use s3::S3BlobStore;

/// An object as read from the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobObject {
    /// Object body; may be empty
    pub body: Bytes,
    /// `Content-Type` recorded with the object, if any
    pub content_type: Option<String>,
}

impl BlobObject {
    pub fn new(body: impl Into<Bytes>, content_type: Option<&str>) -> Self {
        Self {
            body: body.into(),
            content_type: content_type.map(str::to_string),
        }
    }
}

/// Errors reported by a [`BlobStore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("{operation} failed: {message}")]
    Backend {
        operation: &'static str,
        message: String,
    },
}

/// Key-addressed object storage
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Read a whole object
    async fn get(&self, bucket: &str, key: &str) -> Result<BlobObject, StorageError>;

    /// Write a whole object, replacing any existing object at `key`
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;
}
