//! JWT token generation and validation for admin sessions.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::auth::{Claims, TokenStage};

/// JWT configuration.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Pending (pre-2FA) token expiration in minutes.
    pub pending_token_expires_minutes: i64,
    /// Admin session token expiration in hours.
    pub session_token_expires_hours: i64,
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: "change-me-in-production".to_string(),
            pending_token_expires_minutes: 5,
            session_token_expires_hours: 12,
        }
    }
}

/// Errors that can occur during JWT operations.
#[derive(Debug, Error)]
pub enum JwtError {
    /// Token encoding failed.
    #[error("failed to encode token: {0}")]
    EncodingError(String),

    /// Token decoding failed.
    #[error("failed to decode token: {0}")]
    DecodingError(String),

    /// Token has expired.
    #[error("token has expired")]
    Expired,
}

/// JWT service for token operations.
#[derive(Clone)]
pub struct JwtService {
    settings: JwtSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("settings", &self.settings)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtService {
    /// Creates a new JWT service with the given settings.
    #[must_use]
    pub fn new(settings: JwtSettings) -> Self {
        let encoding_key = EncodingKey::from_secret(settings.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(settings.secret.as_bytes());
        Self {
            settings,
            encoding_key,
            decoding_key,
        }
    }

    /// Generates a short-lived token proving the password check passed.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_pending_token(&self, username: &str) -> Result<String, JwtError> {
        let expires_at =
            Utc::now() + Duration::minutes(self.settings.pending_token_expires_minutes);
        let claims = Claims::new(username, TokenStage::Pending2fa, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Generates a full admin session token after 2FA verification.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::EncodingError` if token generation fails.
    pub fn generate_session_token(&self, username: &str) -> Result<String, JwtError> {
        let expires_at = Utc::now() + Duration::hours(self.settings.session_token_expires_hours);
        let claims = Claims::new(username, TokenStage::Admin, expires_at);

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingError(e.to_string()))
    }

    /// Validates and decodes a token.
    ///
    /// # Errors
    ///
    /// Returns `JwtError::Expired` if the token has expired.
    /// Returns `JwtError::DecodingError` if the token is malformed.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let validation = Validation::default();

        decode::<Claims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::DecodingError(e.to_string()),
            })
    }

    /// Returns the pending token expiration in seconds.
    #[must_use]
    pub const fn pending_token_expires_in(&self) -> i64 {
        self.settings.pending_token_expires_minutes * 60
    }

    /// Returns the session token expiration in seconds.
    #[must_use]
    pub const fn session_token_expires_in(&self) -> i64 {
        self.settings.session_token_expires_hours * 3600
    }
}
