//! Scaffold a new site skeleton.

use anyhow::{Result, bail};
use std::fs;

use crate::config::SiteConfig;
use crate::log;

const STARTER_CONFIG: &str = r#"[site]
title = "New Site"
description = "Built with polysite"
default_locale = "en"

[build]
page_extensions = ["md", "html"]
cache = false

[serve]
port = 3000
"#;

const STARTER_PAGE: &str = "# {greeting}\n\nThis page lives in `pages/index.md`.\n";

const STARTER_CSS: &str =
    "body {\n    font-family: sans-serif;\n    margin: 2rem auto;\n    max-width: 40rem;\n}\n";

const STARTER_STRINGS_EN: &str = "{\n    \"greeting\": \"Hello\"\n}\n";
const STARTER_STRINGS_FR: &str = "{\n    \"greeting\": \"Bonjour\"\n}\n";

/// Create a new site skeleton around the configured root.
pub fn new_site(config: &SiteConfig) -> Result<()> {
    if config.config_path.exists() {
        bail!("{} already exists", config.config_path.display());
    }
    let root = config.get_root();

    fs::create_dir_all(root.join("pages"))?;
    fs::create_dir_all(root.join("public/css"))?;
    fs::create_dir_all(root.join("locales/en"))?;
    fs::create_dir_all(root.join("locales/fr"))?;

    fs::write(&config.config_path, STARTER_CONFIG)?;
    fs::write(root.join("pages/index.md"), STARTER_PAGE)?;
    fs::write(root.join("public/css/main.css"), STARTER_CSS)?;
    fs::write(root.join("locales/en/common.json"), STARTER_STRINGS_EN)?;
    fs::write(root.join("locales/fr/common.json"), STARTER_STRINGS_FR)?;

    log!("init"; "created new site in {}", root.display());
    log!("init"; "next: cd in and run 'polysite serve'");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_at(root: &std::path::Path) -> SiteConfig {
        let mut config = SiteConfig::default();
        config.root = root.to_path_buf();
        config.config_path = root.join("polysite.toml");
        config
    }

    #[test]
    fn test_new_site_scaffolds_skeleton() {
        let dir = TempDir::new().unwrap();
        let config = config_at(dir.path());

        new_site(&config).unwrap();

        assert!(dir.path().join("polysite.toml").is_file());
        assert!(dir.path().join("pages/index.md").is_file());
        assert!(dir.path().join("public/css/main.css").is_file());
        assert!(dir.path().join("locales/fr/common.json").is_file());

        // The starter config parses cleanly
        let parsed = SiteConfig::from_str(STARTER_CONFIG).unwrap();
        assert_eq!(parsed.site.default_locale, "en");
    }

    #[test]
    fn test_new_site_refuses_existing_config() {
        let dir = TempDir::new().unwrap();
        let config = config_at(dir.path());
        fs::write(&config.config_path, "[site]\n").unwrap();

        assert!(new_site(&config).is_err());
    }
}
