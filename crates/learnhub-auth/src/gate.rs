//! Authorization gate
//!
//! Resolves bearer tokens into live user records. Account status and
//! scopes are always re-derived from the current database row, never
//! trusted from token claims.

use std::sync::Arc;

use tracing::debug;

use learnhub_db::{Database, User};

use crate::error::AuthError;
use crate::scope::{role_of, scopes_of};
use crate::token::{TokenIssuer, TokenPair};

/// Authorization gate
#[derive(Clone)]
pub struct AuthGate {
    db: Database,
    tokens: Arc<TokenIssuer>,
}

impl AuthGate {
    /// Create a new gate
    pub fn new(db: Database, tokens: Arc<TokenIssuer>) -> Self {
        Self { db, tokens }
    }

    /// The token issuer behind this gate
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Authenticate a raw bearer token and enforce scope requirements
    ///
    /// Accepts the token with or without a `Bearer ` prefix. The user is
    /// looked up by the token's email claim and must be active; when
    /// `required_scopes` is non-empty, every entry must be present in the
    /// scope set computed from the user's current role.
    pub async fn authenticate(
        &self,
        raw_token: &str,
        required_scopes: &[&str],
    ) -> Result<User, AuthError> {
        let token = raw_token.strip_prefix("Bearer ").unwrap_or(raw_token);

        let claims = self.tokens.verify_access(token).map_err(|e| {
            debug!("Token rejected: {}", e);
            AuthError::Unauthenticated
        })?;

        let user = self
            .db
            .get_user_by_email(&claims.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::UserInactive);
        }

        if !required_scopes.is_empty() {
            let granted = scopes_of(role_of(&user));
            if let Some(missing) = required_scopes.iter().find(|s| !granted.contains(s)) {
                debug!("User {} missing scope {}", user.email, missing);
                return Err(AuthError::Forbidden);
            }
        }

        Ok(user)
    }

    /// Re-read a user record to guard against stale claims
    ///
    /// A user deactivated after token issuance fails here even though the
    /// token itself is still valid.
    pub async fn require_active(&self, user: &User) -> Result<User, AuthError> {
        let current = self
            .db
            .get_user_by_id(user.id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !current.is_active {
            return Err(AuthError::Forbidden);
        }

        Ok(current)
    }

    /// Require the admin flag on a user record
    pub fn require_admin(&self, user: &User) -> Result<(), AuthError> {
        if !user.is_admin {
            return Err(AuthError::Forbidden);
        }
        Ok(())
    }

    /// Exchange a refresh token for a rotated token pair
    ///
    /// Scopes are re-derived from the current user state, not the claims
    /// the refresh token was issued with. The old refresh token is not
    /// blacklisted; rotation is purely stateless.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AuthError> {
        let claims = self.tokens.verify_refresh(refresh_token).map_err(|e| {
            debug!("Refresh token rejected: {}", e);
            AuthError::Unauthenticated
        })?;

        let user = self
            .db
            .get_user_by_email(&claims.email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !user.is_active {
            return Err(AuthError::UserInactive);
        }

        let scopes = scopes_of(role_of(&user));
        let access_token = self.tokens.issue_access(user.id, &user.email, scopes)?;
        let refresh_token = self.tokens.issue_refresh(user.id, &user.email)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }
}
