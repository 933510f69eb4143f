//! Time-based one-time passwords (RFC 6238).
//!
//! HMAC-SHA1 HOTP truncation over a 30-second counter, six digits, with a
//! one-step verification skew in both directions to absorb clock drift
//! between the server and the authenticator app.

use hmac::{Hmac, Mac};
use sha1::Sha1;
use thiserror::Error;

type HmacSha1 = Hmac<Sha1>;

/// Default code length.
const DEFAULT_DIGITS: u32 = 6;
/// Default time step in seconds.
const DEFAULT_STEP: u64 = 30;
/// Default verification skew in steps, either direction.
const DEFAULT_SKEW: u64 = 1;

/// TOTP errors.
#[derive(Debug, Error)]
pub enum TotpError {
    /// The shared secret is not valid hex.
    #[error("invalid TOTP secret: {0}")]
    InvalidSecret(String),
}

/// A TOTP verifier bound to one shared secret.
#[derive(Clone)]
pub struct Totp {
    secret: Vec<u8>,
    digits: u32,
    step: u64,
    skew: u64,
}

impl std::fmt::Debug for Totp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Totp")
            .field("digits", &self.digits)
            .field("step", &self.step)
            .field("skew", &self.skew)
            .finish()
    }
}

impl Totp {
    /// Creates a verifier over raw secret bytes with the standard
    /// parameters (6 digits, 30-second step, one step of skew).
    #[must_use]
    pub fn new(secret: Vec<u8>) -> Self {
        Self {
            secret,
            digits: DEFAULT_DIGITS,
            step: DEFAULT_STEP,
            skew: DEFAULT_SKEW,
        }
    }

    /// Creates a verifier from a hex-encoded secret.
    ///
    /// # Errors
    ///
    /// Returns `TotpError::InvalidSecret` when the input is not hex.
    pub fn from_hex(secret: &str) -> Result<Self, TotpError> {
        let bytes = hex::decode(secret).map_err(|e| TotpError::InvalidSecret(e.to_string()))?;
        Ok(Self::new(bytes))
    }

    /// Code for the step containing `unix_time`.
    #[must_use]
    pub fn code_at(&self, unix_time: u64) -> String {
        let counter = unix_time / self.step;
        let code = self.hotp(counter);
        format!("{:0width$}", code, width = self.digits as usize)
    }

    /// Verifies `code` against the step containing `unix_time`, allowing
    /// the configured skew in both directions.
    #[must_use]
    pub fn verify_at(&self, code: &str, unix_time: u64) -> bool {
        let counter = unix_time / self.step;
        let start = counter.saturating_sub(self.skew);
        (start..=counter + self.skew).any(|c| {
            let expected = format!("{:0width$}", self.hotp(c), width = self.digits as usize);
            expected == code
        })
    }

    /// Verifies `code` against the current system time.
    #[must_use]
    pub fn verify(&self, code: &str) -> bool {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        self.verify_at(code, now)
    }

    /// HOTP value for `counter` (RFC 4226 dynamic truncation).
    fn hotp(&self, counter: u64) -> u32 {
        let mut mac =
            HmacSha1::new_from_slice(&self.secret).expect("HMAC accepts keys of any length");
        mac.update(&counter.to_be_bytes());
        let digest = mac.finalize().into_bytes();

        let offset = (digest[digest.len() - 1] & 0x0f) as usize;
        let binary = (u32::from(digest[offset] & 0x7f) << 24)
            | (u32::from(digest[offset + 1]) << 16)
            | (u32::from(digest[offset + 2]) << 8)
            | u32::from(digest[offset + 3]);

        binary % 10u32.pow(self.digits)
    }
}
