//! Common value types.

mod localized;

pub use localized::{Language, Localized};
