//! Session claims for the admin dashboard.
//!
//! Admin login is a two-stage flow: a correct password yields a short-lived
//! pending token, and a valid second-factor code exchanges it for a full
//! session token. The stage lives inside the JWT claims so protected routes
//! can reject half-authenticated callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How far through the login flow a token's bearer is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenStage {
    /// Password accepted, second factor still outstanding.
    #[serde(rename = "pending_2fa")]
    Pending2fa,
    /// Fully authenticated admin session.
    #[serde(rename = "admin")]
    Admin,
}

/// JWT claims for admin tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (admin username).
    pub sub: String,
    /// Login stage this token grants.
    pub stage: TokenStage,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for an admin user.
    #[must_use]
    pub fn new(username: &str, stage: TokenStage, expires_at: DateTime<Utc>) -> Self {
        let now = Utc::now();
        Self {
            sub: username.to_string(),
            stage,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the admin username from the claims.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.sub
    }

    /// Returns `true` for a fully authenticated session.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.stage, TokenStage::Admin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_stage_serde_names() {
        assert_eq!(
            serde_json::to_value(TokenStage::Pending2fa).unwrap(),
            serde_json::json!("pending_2fa")
        );
        assert_eq!(
            serde_json::to_value(TokenStage::Admin).unwrap(),
            serde_json::json!("admin")
        );
    }

    #[test]
    fn test_claims_stage() {
        let expires = Utc::now() + Duration::minutes(5);
        let pending = Claims::new("admin", TokenStage::Pending2fa, expires);
        assert!(!pending.is_admin());
        assert_eq!(pending.username(), "admin");

        let full = Claims::new("admin", TokenStage::Admin, expires);
        assert!(full.is_admin());
    }
}
