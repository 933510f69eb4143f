//! Bilingual text values.
//!
//! Every editable piece of site copy exists in English and Spanish. The
//! public pages pick one side based on the visitor's language; the admin
//! dashboard always edits both.

use serde::{Deserialize, Serialize};

/// Supported site languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Spanish.
    Es,
}

/// A bilingual string pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized {
    /// English text.
    pub en: String,
    /// Spanish text.
    pub es: String,
}

impl Localized {
    /// Creates a localized value from both translations.
    #[must_use]
    pub fn new(en: impl Into<String>, es: impl Into<String>) -> Self {
        Self {
            en: en.into(),
            es: es.into(),
        }
    }

    /// Returns the text for the given language.
    #[must_use]
    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::En => &self.en,
            Language::Es => &self.es,
        }
    }

    /// Returns `true` when both translations are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.en.is_empty() && self.es.is_empty()
    }
}
