//! JWT token issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// Token verification errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    #[error("Invalid token")]
    Invalid,

    #[error("Token expired")]
    Expired,

    #[error("Wrong token type")]
    WrongType,

    #[error("Token encoding failed: {0}")]
    Encoding(String),
}

/// Discriminates access tokens from refresh tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// User email
    pub email: String,
    /// Granted scopes (empty on refresh tokens)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub scopes: Vec<String>,
    /// Token type discriminator
    #[serde(rename = "type")]
    pub token_type: TokenType,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// A freshly rotated access/refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token issuer and verifier
///
/// Holds the process-wide symmetric signing secret, loaded once at startup.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Create a new token issuer
    pub fn new(secret: &str, access_ttl_minutes: i64, refresh_ttl_days: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl: Duration::minutes(access_ttl_minutes),
            refresh_ttl: Duration::days(refresh_ttl_days),
        }
    }

    /// Access token lifetime in seconds (for `expires_in` responses)
    pub fn access_ttl_seconds(&self) -> i64 {
        self.access_ttl.num_seconds()
    }

    /// Refresh token lifetime in seconds
    pub fn refresh_ttl_seconds(&self) -> i64 {
        self.refresh_ttl.num_seconds()
    }

    /// Issue a signed access token carrying the user's scopes
    pub fn issue_access(
        &self,
        user_id: i64,
        email: &str,
        scopes: &[&str],
    ) -> Result<String, TokenError> {
        self.issue(user_id, email, scopes, TokenType::Access, self.access_ttl)
    }

    /// Issue a signed refresh token
    pub fn issue_refresh(&self, user_id: i64, email: &str) -> Result<String, TokenError> {
        self.issue(user_id, email, &[], TokenType::Refresh, self.refresh_ttl)
    }

    fn issue(
        &self,
        user_id: i64,
        email: &str,
        scopes: &[&str],
        token_type: TokenType,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            scopes: scopes.iter().map(|s| s.to_string()).collect(),
            token_type,
            exp: (now + ttl).timestamp(),
            iat: now.timestamp(),
        };

        debug!("Issuing {:?} token for user: {}", token_type, email);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify an access token and return its claims
    pub fn verify_access(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Access)
    }

    /// Verify a refresh token and return its claims
    pub fn verify_refresh(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, TokenType::Refresh)
    }

    fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        // Strict expiry comparison, no clock-skew leeway
        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Invalid,
                }
            })?;

        if token_data.claims.token_type != expected {
            return Err(TokenError::WrongType);
        }

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret-key", 30, 7)
    }

    #[test]
    fn test_access_round_trip() {
        let tokens = issuer();

        let token = tokens
            .issue_access(1, "test@example.com", &["profile:read"])
            .unwrap();
        let claims = tokens.verify_access(&token).unwrap();

        assert_eq!(claims.sub, "1");
        assert_eq!(claims.email, "test@example.com");
        assert_eq!(claims.scopes, vec!["profile:read"]);
        assert_eq!(claims.token_type, TokenType::Access);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn test_invalid_token() {
        let tokens = issuer();

        assert_eq!(
            tokens.verify_access("invalid-token").unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let tokens = issuer();
        let other = TokenIssuer::new("another-secret", 30, 7);

        let token = tokens.issue_access(1, "test@example.com", &[]).unwrap();
        assert_eq!(other.verify_access(&token).unwrap_err(), TokenError::Invalid);
    }

    #[test]
    fn test_expired_token() {
        // Negative TTL produces an already-expired token
        let tokens = TokenIssuer::new("test-secret-key", -1, 7);

        let token = tokens.issue_access(1, "test@example.com", &[]).unwrap();
        assert_eq!(tokens.verify_access(&token).unwrap_err(), TokenError::Expired);
    }

    #[test]
    fn test_type_discriminator() {
        let tokens = issuer();

        let access = tokens.issue_access(1, "test@example.com", &[]).unwrap();
        let refresh = tokens.issue_refresh(1, "test@example.com").unwrap();

        assert_eq!(
            tokens.verify_access(&refresh).unwrap_err(),
            TokenError::WrongType
        );
        assert_eq!(
            tokens.verify_refresh(&access).unwrap_err(),
            TokenError::WrongType
        );

        // Refresh tokens carry no scopes
        let claims = tokens.verify_refresh(&refresh).unwrap();
        assert!(claims.scopes.is_empty());
    }
}
