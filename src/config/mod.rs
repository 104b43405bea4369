//! Site configuration management for `polysite.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build] content roots, page extensions, cache
//! │   ├── serve      # [serve] interface, port, watch
//! │   └── site       # [site] metadata, default locale
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config snapshot (arc-swap)
//! └── mod.rs         # SiteConfig (this file)
//! ```

pub mod section;
pub mod types;

pub use section::{BuildSectionConfig, ServeConfig, SiteSectionConfig};
pub use types::{ConfigError, cfg, init_config, reload_config};

use crate::{
    cli::{Cli, Commands},
    log,
};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Root configuration structure representing polysite.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Site metadata
    #[serde(default)]
    pub site: SiteSectionConfig,

    /// Content roots and cache policy
    #[serde(default)]
    pub build: BuildSectionConfig,

    /// Live server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            cli: None,
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            site: SiteSectionConfig::default(),
            build: BuildSectionConfig::default(),
            serve: ServeConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For non-Init commands, searches upward from cwd to find the config
    /// file. The project root is the config file's parent directory.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;

        // Init scaffolds a fresh site: no config file to read yet
        if cli.is_init() {
            let mut config = Self::default();
            let root = match &cli.command {
                Commands::Init { name: Some(name) } => cwd.join(name),
                _ => cwd,
            };
            config.config_path = root.join(&cli.config);
            config.cli = Some(cli);
            config.finalize(&root);
            return Ok(config);
        }

        let Some(config_path) = find_config_file(&cli.config) else {
            bail!(
                "Config file '{}' not found. Run 'polysite init' to create a new project.",
                cli.config.display()
            );
        };

        let content = fs::read_to_string(&config_path)
            .map_err(|err| ConfigError::Io(config_path.clone(), err))?;
        let (mut config, ignored) = Self::parse_with_ignored(&content)?;
        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, &config_path);
        }

        let root = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(cwd);
        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(&root);
        config.apply_command_options(cli);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Normalize the root and every content root to absolute paths.
    fn finalize(&mut self, root: &Path) {
        let root = crate::utils::fs::normalize_path(root);
        self.config_path = crate::utils::fs::normalize_path(&self.config_path);

        self.build.pages = crate::utils::fs::normalize_path(&root.join(&self.build.pages));
        self.build.public = crate::utils::fs::normalize_path(&root.join(&self.build.public));
        self.build.content = crate::utils::fs::normalize_path(&root.join(&self.build.content));
        self.build.locales = crate::utils::fs::normalize_path(&root.join(&self.build.locales));

        self.root = root;
    }

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Serve {
                interface,
                port,
                cache,
                watch,
            } => {
                Self::update_option(&mut self.serve.interface, interface.as_ref());
                Self::update_option(&mut self.serve.port, port.as_ref());
                Self::update_option(&mut self.serve.watch, watch.as_ref());
                Self::update_option(&mut self.build.cache, cache.as_ref());
            }
            Commands::Generate | Commands::Init { .. } => {}
        }
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    /// Validate configuration for the current command.
    pub fn validate(&self) -> Result<()> {
        if self.build.page_extensions.is_empty() {
            bail!(ConfigError::Validation(
                "build.page_extensions must list at least one extension".into()
            ));
        }
        for ext in &self.build.page_extensions {
            if ext.starts_with('.') {
                bail!(ConfigError::Validation(format!(
                    "page extensions are written without the leading dot (\"{}\")",
                    ext.trim_start_matches('.')
                )));
            }
        }
        if !self.build.pages.is_dir() {
            log!("warning"; "page directory {} does not exist", self.build.pages.display());
        }
        Ok(())
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }
}

/// Search upward from cwd for the config file.
fn find_config_file(name: &Path) -> Option<PathBuf> {
    let mut dir = std::env::current_dir().ok()?;
    loop {
        let candidate = dir.join(name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !dir.pop() {
            return None;
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML snippet.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================
