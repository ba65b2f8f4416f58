//! S3-compatible storage backend
//!
//! Uses the `object_store` crate to list materials and mint presigned
//! GET URLs. Supports AWS S3, MinIO, and other S3-compatible services.

use async_trait::async_trait;
use futures::TryStreamExt;
use http::Method;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path as ObjectPath;
use object_store::signer::Signer;
use object_store::ObjectStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::StorageError;
use crate::store::{join_url, MaterialStore, ObjectInfo};

/// S3 storage configuration
#[derive(Debug, Clone)]
pub struct S3Config {
    /// S3 bucket name
    pub bucket: String,
    /// S3 region (e.g., "us-east-1")
    pub region: String,
    /// S3 endpoint URL (for MinIO or other S3-compatible services)
    pub endpoint: Option<String>,
    /// AWS access key ID
    pub access_key_id: Option<String>,
    /// AWS secret access key
    pub secret_access_key: Option<String>,
    /// Allow HTTP (not HTTPS) connections
    pub allow_http: bool,
    /// Base URL substituted when presigning fails
    pub fallback_base: String,
}

/// S3 storage backend
pub struct S3Store {
    store: Arc<AmazonS3>,
    fallback_base: String,
}

impl S3Store {
    /// Create a new S3 storage backend
    pub fn new(config: S3Config) -> Result<Self, StorageError> {
        let mut builder = AmazonS3Builder::new()
            .with_bucket_name(&config.bucket)
            .with_region(&config.region);

        // Set endpoint for MinIO or other S3-compatible services
        if let Some(endpoint) = &config.endpoint {
            builder = builder.with_endpoint(endpoint);
        }

        // Set credentials
        if let Some(access_key) = &config.access_key_id {
            builder = builder.with_access_key_id(access_key);
        }
        if let Some(secret_key) = &config.secret_access_key {
            builder = builder.with_secret_access_key(secret_key);
        }

        // Allow HTTP for local development (MinIO)
        if config.allow_http {
            builder = builder.with_allow_http(true);
        }

        let store = builder.build().map_err(|e| {
            StorageError::Configuration(format!("Failed to create S3 client: {}", e))
        })?;

        info!(
            "Initialized S3 storage: bucket={}, region={}, endpoint={:?}",
            config.bucket, config.region, config.endpoint
        );

        Ok(Self {
            store: Arc::new(store),
            fallback_base: config.fallback_base,
        })
    }
}

#[async_trait]
impl MaterialStore for S3Store {
    async fn list_objects(&self) -> Result<Vec<ObjectInfo>, StorageError> {
        debug!("Listing objects from S3 bucket");

        let objects: Vec<_> = self
            .store
            .list(None)
            .try_collect()
            .await
            .map_err(|e| StorageError::Backend(e.to_string()))?;

        Ok(objects
            .into_iter()
            .map(|meta| ObjectInfo {
                name: meta.location.to_string(),
                size: meta.size as u64,
                uploaded_at: Some(meta.last_modified),
            })
            .collect())
    }

    async fn presigned_url(&self, object_name: &str, ttl: Duration) -> String {
        let path = ObjectPath::from(object_name);

        match self.store.signed_url(Method::GET, &path, ttl).await {
            Ok(url) => url.to_string(),
            Err(e) => {
                // Availability over strictness: serve the local fallback
                // rather than failing the whole listing.
                warn!("Presigning failed for {}: {}", object_name, e);
                join_url(&self.fallback_base, object_name)
            }
        }
    }
}
