//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// JWT configuration.
    pub jwt: JwtConfig,
    /// Admin account configuration.
    pub admin: AdminConfig,
    /// Storage selection configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// JWT configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Pending (pre-2FA) token expiration in minutes.
    #[serde(default = "default_pending_token_expiry")]
    pub pending_token_expiry_minutes: i64,
    /// Admin session token expiration in hours.
    #[serde(default = "default_session_token_expiry")]
    pub session_token_expiry_hours: i64,
}

fn default_pending_token_expiry() -> i64 {
    5
}

fn default_session_token_expiry() -> i64 {
    12
}

/// Admin account configuration.
///
/// There is a single admin account. The password is stored as an Argon2id
/// PHC hash and the second factor is a hex-encoded TOTP secret; neither has
/// a usable default, so admin login stays disabled until both are set.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    /// Admin username.
    #[serde(default = "default_admin_username")]
    pub username: String,
    /// Argon2id hash of the admin password (PHC string format).
    pub password_hash: String,
    /// Hex-encoded shared secret for TOTP verification.
    pub totp_secret: String,
}

fn default_admin_username() -> String {
    "admin".to_string()
}

/// Storage selection configuration.
///
/// `mode` forces a backend for development (`"local"` or `"mock"`); the
/// default `"auto"` lets the storage factory resolve the environment through
/// the configuration endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Backend selection: `auto`, `local`, or `mock`.
    #[serde(default = "default_storage_mode")]
    pub mode: String,
    /// Root directory for the local backend.
    #[serde(default = "default_local_root")]
    pub local_root: String,
    /// Configuration endpoint the factory resolves against.
    #[serde(default = "default_config_url")]
    pub config_url: String,
    /// Base URL of the storage proxy used by the remote backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            mode: default_storage_mode(),
            local_root: default_local_root(),
            config_url: default_config_url(),
            base_url: default_base_url(),
        }
    }
}

fn default_storage_mode() -> String {
    "auto".to_string()
}

fn default_local_root() -> String {
    "./media".to_string()
}

fn default_config_url() -> String {
    "http://localhost:8080/api/config".to_string()
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded or required
    /// fields (JWT secret, admin credentials) are missing.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("ENCORE").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_from_environment() {
        temp_env::with_vars(
            [
                ("ENCORE__SERVER__HOST", Some("127.0.0.1")),
                ("ENCORE__JWT__SECRET", Some("test-secret")),
                ("ENCORE__ADMIN__PASSWORD_HASH", Some("$argon2id$stub")),
                ("ENCORE__ADMIN__TOTP_SECRET", Some("deadbeef")),
            ],
            || {
                let config = AppConfig::load().expect("config should load");
                assert_eq!(config.server.host, "127.0.0.1");
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.jwt.secret, "test-secret");
                assert_eq!(config.jwt.pending_token_expiry_minutes, 5);
                assert_eq!(config.admin.username, "admin");
                assert_eq!(config.storage.mode, "auto");
                assert_eq!(config.storage.local_root, "./media");
            },
        );
    }

    #[test]
    fn test_missing_admin_credentials_is_an_error() {
        temp_env::with_vars(
            [
                ("ENCORE__JWT__SECRET", Some("test-secret")),
                ("ENCORE__ADMIN__PASSWORD_HASH", None::<&str>),
                ("ENCORE__ADMIN__TOTP_SECRET", None),
            ],
            || {
                assert!(AppConfig::load().is_err());
            },
        );
    }

    #[test]
    fn test_storage_settings_defaults() {
        let settings = StorageSettings::default();
        assert_eq!(settings.mode, "auto");
        assert_eq!(settings.config_url, "http://localhost:8080/api/config");
        assert_eq!(settings.base_url, "http://localhost:8080");
    }
}
