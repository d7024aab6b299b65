//! Locale code normalization
//!
//! The CMS writes locales as `en-GB`; the site builder expects `en_GB`.
//! Rewrite rules override the mechanical result for specific codes.

use serde::{Deserialize, Serialize};

/// Replace one normalized locale code with another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleRewriteRule {
    pub from: String,
    pub to: String,
}

impl LocaleRewriteRule {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Converts CMS locale codes to builder locale codes.
#[derive(Debug, Clone, Default)]
pub struct LocaleNormalizer {
    rules: Vec<LocaleRewriteRule>,
}

impl LocaleNormalizer {
    pub fn new(rules: Vec<LocaleRewriteRule>) -> Self {
        Self { rules }
    }

    /// `-` becomes `_`, then the first rule whose `from` equals the
    /// normalized code supplies the result.
    pub fn normalize(&self, locale: &str) -> String {
        let normalized = locale.replace('-', "_");
        self.rules
            .iter()
            .find(|rule| rule.from == normalized)
            .map(|rule| rule.to.clone())
            .unwrap_or(normalized)
    }
}
