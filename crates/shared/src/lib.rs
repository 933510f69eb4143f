//! Shared types, errors, and configuration for Encore.
//!
//! This crate provides common types used across all other crates:
//! - Bilingual text values for page content
//! - Application-wide error types
//! - JWT session handling for the admin dashboard
//! - Configuration management

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, TokenStage};
pub use config::{AdminConfig, AppConfig, StorageSettings};
pub use error::{AppError, AppResult};
pub use jwt::{JwtError, JwtService, JwtSettings};
pub use types::Localized;
