//! `[build]` section configuration.
//!
//! Content roots and render-cache policy. All directory paths are
//! relative to the project root and normalized to absolute form at load
//! time.
//!
//! # Example
//!
//! ```toml
//! [build]
//! pages = "pages"              # templated page sources
//! public = "public"            # static asset tree
//! content = "content"          # render cache / generated site output
//! locales = "locales"          # one subdirectory per locale
//! page_extensions = ["md", "html"]
//! cache = false                # serve rendered output from the cache
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Build settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildSectionConfig {
    /// Templated page source tree.
    pub pages: PathBuf,

    /// Static asset tree, served read-through.
    pub public: PathBuf,

    /// Render cache root. Batch generation materializes the site here.
    pub content: PathBuf,

    /// Locale directory: one subdirectory per locale. Multi-locale mode
    /// is active exactly when this directory exists.
    pub locales: PathBuf,

    /// Page source extensions, probed in declared order (first match
    /// wins). Written without the leading dot.
    pub page_extensions: Vec<String>,

    /// Serve rendered output from the content cache when present.
    /// Batch generation ignores this and always writes the cache.
    pub cache: bool,
}

impl Default for BuildSectionConfig {
    fn default() -> Self {
        Self {
            pages: PathBuf::from("pages"),
            public: PathBuf::from("public"),
            content: PathBuf::from("content"),
            locales: PathBuf::from("locales"),
            page_extensions: vec!["md".to_string(), "html".to_string()],
            cache: false,
        }
    }
}
