//! In-memory blob store.
//!
//! Keeps whole objects in a map keyed by `(bucket, key)`. Useful for tests
//! and for running the server without object storage.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use super::{BlobObject, BlobStore, StorageError};

#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<HashMap<(String, String), BlobObject>>,
    gets: AtomicU64,
    puts: AtomicU64,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an object without counting it as a `put`
    pub fn insert(&self, bucket: &str, key: &str, object: BlobObject) {
        self.objects
            .write()
            .insert((bucket.to_string(), key.to_string()), object);
    }

    /// Look at an object without counting it as a `get`
    pub fn object(&self, bucket: &str, key: &str) -> Option<BlobObject> {
        self.objects
            .read()
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
    }

    pub fn get_count(&self) -> u64 {
        self.gets.load(Ordering::Relaxed)
    }

    pub fn put_count(&self) -> u64 {
        self.puts.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<BlobObject, StorageError> {
        self.gets.fetch_add(1, Ordering::Relaxed);
        self.object(bucket, key).ok_or_else(|| StorageError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        })
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        self.puts.fetch_add(1, Ordering::Relaxed);
        self.insert(bucket, key, BlobObject::new(body, Some(content_type)));
        Ok(())
    }
}
