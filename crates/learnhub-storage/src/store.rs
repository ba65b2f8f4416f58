//! Material store trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

use crate::error::StorageError;

/// Metadata for a stored object
#[derive(Debug, Clone)]
pub struct ObjectInfo {
    pub name: String,
    pub size: u64,
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Material store trait
///
/// Implementations provide object listing and time-limited access URLs.
/// The backend is selected once at startup; handlers never branch on it.
#[async_trait]
pub trait MaterialStore: Send + Sync {
    /// List all objects in the configured bucket
    async fn list_objects(&self) -> Result<Vec<ObjectInfo>, StorageError>;

    /// Produce a time-limited access URL for an object
    ///
    /// Never fails: backends that cannot sign fall back to a local URL.
    async fn presigned_url(&self, object_name: &str, ttl: Duration) -> String;
}

/// Join a base URL and an object name
pub(crate) fn join_url(base: &str, object_name: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), object_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("http://localhost:8080/static", "a.pdf"), "http://localhost:8080/static/a.pdf");
        assert_eq!(join_url("http://localhost:8080/static/", "a.pdf"), "http://localhost:8080/static/a.pdf");
    }
}
