//! `[site]` section configuration.
//!
//! Site metadata passed to the page layout, plus the locale assumed when
//! a URL carries no locale prefix.
//!
//! # Example
//!
//! ```toml
//! [site]
//! title = "My Site"
//! description = "A localized content site"
//! default_locale = "en"
//! ```

use serde::{Deserialize, Serialize};

/// Site metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSectionConfig {
    /// Site title, rendered into the page layout.
    pub title: String,

    /// Site description, rendered into the page layout.
    pub description: String,

    /// Locale assumed when a URL carries no locale prefix.
    pub default_locale: String,
}

impl Default for SiteSectionConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            default_locale: "en".to_string(),
        }
    }
}
