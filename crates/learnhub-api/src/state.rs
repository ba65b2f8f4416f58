//! Application state

use learnhub_auth::{AuthGate, TokenIssuer};
use learnhub_db::Database;
use learnhub_storage::MaterialStore;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub store: Arc<dyn MaterialStore>,
    pub gate: AuthGate,
    pub tokens: Arc<TokenIssuer>,
    /// TTL applied to presigned material URLs
    pub presign_ttl: Duration,
}

impl AppState {
    pub fn new(
        db: Database,
        store: Arc<dyn MaterialStore>,
        tokens: Arc<TokenIssuer>,
        presign_ttl: Duration,
    ) -> Self {
        let gate = AuthGate::new(db.clone(), tokens.clone());
        Self {
            db,
            store,
            gate,
            tokens,
            presign_ttl,
        }
    }
}
