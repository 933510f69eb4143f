//! Admin authentication.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Password verification
//! - Time-based one-time passwords (second factor)
//! - The single admin account's credential checks
//!
//! There is one admin account, configured with an Argon2id password hash
//! and a hex-encoded TOTP secret. Both checks must pass before a session
//! token is issued; an arbitrary six-digit code is never accepted.

mod password;
mod totp;

pub use password::{PasswordError, hash_password, verify_password};
pub use totp::{Totp, TotpError};

use encore_shared::AdminConfig;

/// Credential verifier for the admin account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
    username: String,
    password_hash: String,
    totp: Totp,
}

impl AdminCredentials {
    /// Builds the verifier from configuration.
    ///
    /// # Errors
    ///
    /// Returns `TotpError::InvalidSecret` when the configured TOTP secret
    /// is not valid hex.
    pub fn from_config(config: &AdminConfig) -> Result<Self, TotpError> {
        Ok(Self {
            username: config.username.clone(),
            password_hash: config.password_hash.clone(),
            totp: Totp::from_hex(&config.totp_secret)?,
        })
    }

    /// Configured admin username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// First factor: username plus Argon2id-verified password.
    ///
    /// Malformed stored hashes count as a failed login rather than an
    /// internal error, so a bad deployment cannot be probed apart from a
    /// wrong password.
    #[must_use]
    pub fn verify_login(&self, username: &str, password: &str) -> bool {
        if username != self.username {
            return false;
        }
        verify_password(password, &self.password_hash).unwrap_or(false)
    }

    /// Second factor: TOTP code against the shared secret.
    #[must_use]
    pub fn verify_code(&self, code: &str) -> bool {
        self.totp.verify(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RFC_SECRET_HEX: &str = "3132333435363738393031323334353637383930";

    fn credentials(password: &str) -> AdminCredentials {
        AdminCredentials::from_config(&AdminConfig {
            username: "admin".to_string(),
            password_hash: hash_password(password).unwrap(),
            totp_secret: RFC_SECRET_HEX.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_verify_login() {
        let creds = credentials("hunter2!");
        assert!(creds.verify_login("admin", "hunter2!"));
        assert!(!creds.verify_login("admin", "wrong"));
        assert!(!creds.verify_login("root", "hunter2!"));
    }

    #[test]
    fn test_malformed_hash_fails_closed() {
        let creds = AdminCredentials::from_config(&AdminConfig {
            username: "admin".to_string(),
            password_hash: "not-a-phc-string".to_string(),
            totp_secret: RFC_SECRET_HEX.to_string(),
        })
        .unwrap();
        assert!(!creds.verify_login("admin", "anything"));
    }

    #[test]
    fn test_invalid_totp_secret_rejected_at_build() {
        let result = AdminCredentials::from_config(&AdminConfig {
            username: "admin".to_string(),
            password_hash: "$argon2id$stub".to_string(),
            totp_secret: "zz not hex".to_string(),
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_code_matches_current_step() {
        let creds = credentials("pw");
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs();
        let code = Totp::from_hex(RFC_SECRET_HEX).unwrap().code_at(now);
        assert!(creds.verify_code(&code));
        assert!(!creds.verify_code("000000") || code == "000000");
    }
}
