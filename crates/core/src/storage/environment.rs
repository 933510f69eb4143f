//! Runtime environment resolution.
//!
//! The same build artifact serves production and development, so the
//! deployment environment is classified from process environment variables
//! on every call rather than baked in at build time.

use serde::{Deserialize, Serialize};

use super::error::StorageError;

/// Deployment environment marker variable. Production when set to
/// `"production"`; anything else (including unset) is development.
pub const DEPLOY_ENV_VAR: &str = "DEPLOY_ENV";
/// Role identity the storage proxy assumes for bucket access. No default.
pub const AWS_ROLE_ARN_VAR: &str = "AWS_ROLE_ARN";
/// Bucket region variable.
pub const AWS_REGION_VAR: &str = "AWS_REGION";
/// Bucket name variable.
pub const AWS_BUCKET_VAR: &str = "AWS_BUCKET_NAME";

/// Region used when `AWS_REGION` is unset.
pub const DEFAULT_REGION: &str = "us-west-2";
/// Bucket used when `AWS_BUCKET_NAME` is unset.
pub const DEFAULT_BUCKET: &str = "musician-media";

/// Deployment environment classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Hosted production deployment; media lives in the remote bucket.
    Production,
    /// Everything else; media lives on the local disk.
    Development,
}

impl Environment {
    /// Classifies the running process. Re-reads the environment on every
    /// call so the check holds per request.
    #[must_use]
    pub fn current() -> Self {
        match std::env::var(DEPLOY_ENV_VAR) {
            Ok(v) if v == "production" => Self::Production,
            _ => Self::Development,
        }
    }

    /// Returns `true` in production.
    #[must_use]
    pub const fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Resolved storage configuration: which backend family to use and, for the
/// remote variant, where the bucket lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageKind {
    /// Browser-of-record equivalent: disk-backed local store.
    Local,
    /// Remote S3-compatible bucket behind the storage proxy.
    Remote {
        /// Bucket region.
        region: String,
        /// Bucket name.
        bucket_name: String,
    },
}

impl StorageKind {
    /// Resolves the storage configuration for the current environment.
    #[must_use]
    pub fn resolve() -> Self {
        if Environment::current().is_production() {
            Self::Remote {
                region: std::env::var(AWS_REGION_VAR)
                    .unwrap_or_else(|_| DEFAULT_REGION.to_string()),
                bucket_name: std::env::var(AWS_BUCKET_VAR)
                    .unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
            }
        } else {
            Self::Local
        }
    }

    /// Converts to the wire representation served by the config endpoint.
    #[must_use]
    pub fn to_wire(&self) -> WireConfig {
        match self {
            Self::Local => WireConfig {
                storage: WireStorage {
                    kind: "local".to_string(),
                    config: WireStorageParams::default(),
                },
            },
            Self::Remote {
                region,
                bucket_name,
            } => WireConfig {
                storage: WireStorage {
                    kind: "aws".to_string(),
                    config: WireStorageParams {
                        region: Some(region.clone()),
                        bucket_name: Some(bucket_name.clone()),
                    },
                },
            },
        }
    }

    /// Parses the wire representation fetched from the config endpoint.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ConfigurationMissing` for an unknown storage
    /// type tag.
    pub fn from_wire(wire: &WireConfig) -> Result<Self, StorageError> {
        match wire.storage.kind.as_str() {
            "local" => Ok(Self::Local),
            "aws" => Ok(Self::Remote {
                region: wire
                    .storage
                    .config
                    .region
                    .clone()
                    .unwrap_or_else(|| DEFAULT_REGION.to_string()),
                bucket_name: wire
                    .storage
                    .config
                    .bucket_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            }),
            other => Err(StorageError::configuration_missing(format!(
                "unknown storage type {other:?}"
            ))),
        }
    }
}

/// Resolves the role identity the proxy assumes for bucket access.
///
/// # Errors
///
/// Returns `StorageError::ConfigurationMissing` when `AWS_ROLE_ARN` is
/// unset or empty. Hardcoded credentials are never used.
pub fn role_arn() -> Result<String, StorageError> {
    match std::env::var(AWS_ROLE_ARN_VAR) {
        Ok(arn) if !arn.is_empty() => Ok(arn),
        _ => Err(StorageError::configuration_missing(format!(
            "{AWS_ROLE_ARN_VAR} is not set"
        ))),
    }
}

/// Wire shape of the configuration endpoint:
/// `{ "storage": { "type": "aws"|"local", "config": { "region"?, "bucketName"? } } }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireConfig {
    /// Storage section.
    pub storage: WireStorage,
}

/// Storage section of the wire configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireStorage {
    /// Storage type tag: `"aws"` or `"local"`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Remote parameters; empty for the local variant.
    #[serde(default)]
    pub config: WireStorageParams,
}

/// Remote storage parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WireStorageParams {
    /// Bucket region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    /// Bucket name.
    #[serde(rename = "bucketName", skip_serializing_if = "Option::is_none")]
    pub bucket_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_by_default() {
        temp_env::with_var(DEPLOY_ENV_VAR, None::<&str>, || {
            assert_eq!(Environment::current(), Environment::Development);
            assert_eq!(StorageKind::resolve(), StorageKind::Local);
        });
    }

    #[test]
    fn test_non_production_marker_is_development() {
        temp_env::with_var(DEPLOY_ENV_VAR, Some("preview"), || {
            assert_eq!(Environment::current(), Environment::Development);
        });
    }

    #[test]
    fn test_production_resolves_remote_with_defaults() {
        temp_env::with_vars(
            [
                (DEPLOY_ENV_VAR, Some("production")),
                (AWS_REGION_VAR, None::<&str>),
                (AWS_BUCKET_VAR, None),
            ],
            || {
                assert_eq!(
                    StorageKind::resolve(),
                    StorageKind::Remote {
                        region: DEFAULT_REGION.to_string(),
                        bucket_name: DEFAULT_BUCKET.to_string(),
                    }
                );
            },
        );
    }

    #[test]
    fn test_production_resolves_remote_with_overrides() {
        temp_env::with_vars(
            [
                (DEPLOY_ENV_VAR, Some("production")),
                (AWS_REGION_VAR, Some("eu-west-1")),
                (AWS_BUCKET_VAR, Some("encore-media")),
            ],
            || {
                assert_eq!(
                    StorageKind::resolve(),
                    StorageKind::Remote {
                        region: "eu-west-1".to_string(),
                        bucket_name: "encore-media".to_string(),
                    }
                );
            },
        );
    }

    #[test]
    fn test_role_arn_missing() {
        temp_env::with_var(AWS_ROLE_ARN_VAR, None::<&str>, || {
            assert!(matches!(
                role_arn(),
                Err(StorageError::ConfigurationMissing(_))
            ));
        });
    }

    #[test]
    fn test_role_arn_present() {
        temp_env::with_var(AWS_ROLE_ARN_VAR, Some("arn:aws:iam::123:role/media"), || {
            assert_eq!(role_arn().unwrap(), "arn:aws:iam::123:role/media");
        });
    }

    #[test]
    fn test_wire_shape_remote() {
        let kind = StorageKind::Remote {
            region: "us-west-2".to_string(),
            bucket_name: "musician-media".to_string(),
        };
        let json = serde_json::to_value(kind.to_wire()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "storage": {
                    "type": "aws",
                    "config": {
                        "region": "us-west-2",
                        "bucketName": "musician-media"
                    }
                }
            })
        );
    }

    #[test]
    fn test_wire_shape_local() {
        let json = serde_json::to_value(StorageKind::Local.to_wire()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "storage": { "type": "local", "config": {} }
            })
        );
    }

    #[test]
    fn test_wire_round_trip() {
        let kind = StorageKind::Remote {
            region: "us-east-1".to_string(),
            bucket_name: "b".to_string(),
        };
        assert_eq!(StorageKind::from_wire(&kind.to_wire()).unwrap(), kind);
        assert_eq!(
            StorageKind::from_wire(&StorageKind::Local.to_wire()).unwrap(),
            StorageKind::Local
        );
    }

    #[test]
    fn test_wire_unknown_type_rejected() {
        let wire = WireConfig {
            storage: WireStorage {
                kind: "ftp".to_string(),
                config: WireStorageParams::default(),
            },
        };
        assert!(StorageKind::from_wire(&wire).is_err());
    }
}
