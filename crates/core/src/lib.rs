//! Core domain logic for Encore.
//!
//! This crate contains the environment-switched storage abstraction, the
//! editable content model behind the public pages, and the admin
//! authentication primitives. No web framework types leak in here.
//!
//! # Modules
//!
//! - `storage` - File storage contract, backends, and factory
//! - `content` - Page content documents and the media facade
//! - `auth` - Password hashing and TOTP verification

pub mod auth;
pub mod content;
pub mod storage;
