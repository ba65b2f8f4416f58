//! Mock storage backend
//!
//! Used when no real object store is configured. URL generation is
//! deterministic; listing has no data to serve and reports the store
//! as unavailable.

use async_trait::async_trait;
use std::time::Duration;
use tracing::info;

use crate::error::StorageError;
use crate::store::{join_url, MaterialStore, ObjectInfo};

/// Mock storage backend
pub struct MockStore {
    base_url: String,
}

impl MockStore {
    /// Create a new mock store serving URLs under `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        info!("Object storage disabled, using mock URLs under {}", base_url);
        Self { base_url }
    }
}

#[async_trait]
impl MaterialStore for MockStore {
    async fn list_objects(&self) -> Result<Vec<ObjectInfo>, StorageError> {
        Err(StorageError::Unavailable(
            "object storage is not configured".to_string(),
        ))
    }

    async fn presigned_url(&self, object_name: &str, _ttl: Duration) -> String {
        join_url(&self.base_url, object_name)
    }
}
