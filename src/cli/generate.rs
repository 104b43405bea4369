//! Batch site generation through the live-serving pipeline.
//!
//! Enumerates the site's whole address space (every public asset, every
//! page x locale pair) and feeds each synthesized request through the
//! exact pipeline live serving uses, with response delivery suppressed.
//! The pipeline's cache writes under the content root are the output.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use jwalk::WalkDir;
use rayon::prelude::*;

use crate::cli::serve::Sink;
use crate::config::SiteConfig;
use crate::render::{self, RenderContext};
use crate::{debug, log};

/// Transient address space for one batch run.
struct SiteManifest {
    public_assets: Vec<PathBuf>,
    pages: Vec<PathBuf>,
    locales: Vec<Option<String>>,
}

impl SiteManifest {
    fn discover(ctx: &RenderContext) -> Self {
        let config = &ctx.config;
        let locales = if ctx.locales.is_multi() {
            ctx.locales.iter().map(|l| Some(l.to_string())).collect()
        } else {
            vec![None]
        };
        Self {
            public_assets: collect_files(&config.build.public),
            pages: collect_files(&config.build.pages),
            locales,
        }
    }

    /// Synthesize one request URL per asset and per page x locale pair.
    fn requests(&self, config: &SiteConfig) -> Vec<String> {
        let mut urls = Vec::new();
        for asset in &self.public_assets {
            if let Ok(rel) = asset.strip_prefix(&config.build.public) {
                urls.push(format!("/{}", join_segments(rel)));
            }
        }
        for page in &self.pages {
            let Ok(rel) = page.strip_prefix(&config.build.pages) else {
                continue;
            };
            for locale in &self.locales {
                urls.push(page_url(locale.as_deref(), rel));
            }
        }
        urls
    }
}

/// Run the static generator.
///
/// Ordering across addresses is not significant (no cross-page
/// dependency), so rendering is parallelized.
pub fn run(config: &Arc<SiteConfig>) -> Result<()> {
    let ctx = RenderContext::batch(Arc::clone(config));
    let manifest = SiteManifest::discover(&ctx);
    let requests = manifest.requests(&ctx.config);

    if requests.is_empty() {
        log!("generate"; "nothing to generate (no pages or public assets found)");
        return Ok(());
    }

    log!(
        "generate";
        "rendering {} addresses ({} assets, {} pages x {} locales)",
        requests.len(),
        manifest.public_assets.len(),
        manifest.pages.len(),
        manifest.locales.len()
    );

    let statuses: Vec<u16> = requests
        .par_iter()
        .map(|url| {
            let outcome = render::run(url, &ctx);
            let status = outcome.status();
            if status != 200 {
                debug!("generate"; "skipped {} ({})", url, status);
            }
            let _ = Sink::Discard.deliver(outcome);
            status
        })
        .collect();

    let written = statuses.iter().filter(|s| **s == 200).count();
    let skipped = statuses.len() - written;
    if skipped > 0 {
        log!(
            "generate";
            "{} files written to {}, {} addresses skipped",
            written,
            ctx.config.build.content.display(),
            skipped
        );
    } else {
        log!(
            "generate";
            "{} files written to {}",
            written,
            ctx.config.build.content.display()
        );
    }
    Ok(())
}

/// `/{locale}/{dir}` for index pages, `/{locale}/{dir}/{name}` otherwise.
fn page_url(locale: Option<&str>, rel: &Path) -> String {
    let mut segments: Vec<String> = Vec::new();
    if let Some(locale) = locale {
        segments.push(locale.to_string());
    }
    if let Some(parent) = rel.parent() {
        segments.extend(
            parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned()),
        );
    }
    let stem = rel
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    if stem != "index" {
        segments.push(stem);
    }
    format!("/{}", segments.join("/"))
}

/// Slash-joined path segments (portable URL form of a relative path).
fn join_segments(rel: &Path) -> String {
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

/// `*.*` enumeration: only dotted file names address site resources.
fn collect_files(dir: &Path) -> Vec<PathBuf> {
    if !dir.is_dir() {
        return Vec::new();
    }
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Outcome;
    use std::fs;
    use tempfile::TempDir;

    /// Full site on disk:
    /// - pages/index.md, pages/guide/intro.md
    /// - public/css/main.css
    /// - locales/{en,fr} with one string table each
    fn site_fixture() -> (TempDir, Arc<SiteConfig>) {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("pages/guide")).unwrap();
        fs::create_dir_all(root.join("public/css")).unwrap();
        fs::create_dir_all(root.join("locales/en")).unwrap();
        fs::create_dir_all(root.join("locales/fr")).unwrap();
        fs::write(root.join("pages/index.md"), "# {greeting}\n").unwrap();
        fs::write(root.join("pages/guide/intro.md"), "# Intro\n\n{greeting}!\n").unwrap();
        fs::write(root.join("public/css/main.css"), "body { margin: 0 }").unwrap();
        fs::write(
            root.join("locales/en/common.json"),
            r#"{"greeting": "Hello"}"#,
        )
        .unwrap();
        fs::write(
            root.join("locales/fr/common.json"),
            r#"{"greeting": "Bonjour"}"#,
        )
        .unwrap();

        let mut config = SiteConfig::default();
        config.build.pages = root.join("pages");
        config.build.public = root.join("public");
        config.build.content = root.join("content");
        config.build.locales = root.join("locales");
        (dir, Arc::new(config))
    }

    #[test]
    fn test_generate_materializes_full_site() {
        let (_dir, config) = site_fixture();
        run(&config).unwrap();

        let content = &config.build.content;
        for expected in [
            "en/index.html",
            "fr/index.html",
            "en/guide/intro.html",
            "fr/guide/intro.html",
            "css/main.css",
        ] {
            assert!(content.join(expected).is_file(), "missing {expected}");
        }

        // Assets are byte-identical copies
        assert_eq!(
            fs::read(content.join("css/main.css")).unwrap(),
            fs::read(config.build.public.join("css/main.css")).unwrap()
        );

        // Translation applied per locale
        let fr = fs::read_to_string(content.join("fr/guide/intro.html")).unwrap();
        assert!(fr.contains("Bonjour!"));
        let en = fs::read_to_string(content.join("en/guide/intro.html")).unwrap();
        assert!(en.contains("Hello!"));
    }

    #[test]
    fn test_generate_matches_live_serving() {
        let (_dir, config) = site_fixture();
        run(&config).unwrap();

        // A fresh live context with caching off renders from scratch;
        // the bytes must equal what generation persisted.
        let mut live = RenderContext::live(Arc::clone(&config));
        live.cache_enabled = false;

        for (url, file) in [
            ("/fr/guide/intro", "fr/guide/intro.html"),
            ("/en", "en/index.html"),
            ("/css/main.css", "css/main.css"),
        ] {
            let Outcome::Rendered { bytes, .. } = render::run(url, &live) else {
                panic!("expected rendered outcome for {url}");
            };
            assert_eq!(
                fs::read(config.build.content.join(file)).unwrap(),
                bytes,
                "bytes differ for {url}"
            );
        }
    }

    #[test]
    fn test_generate_single_locale_site() {
        let (_dir, config) = site_fixture();
        // Remove the locale universe: single-language site
        fs::remove_dir_all(&config.build.locales).unwrap();

        run(&config).unwrap();

        let content = &config.build.content;
        assert!(content.join("index.html").is_file());
        assert!(content.join("guide/intro.html").is_file());
        assert!(!content.join("en").exists());
    }

    #[test]
    fn test_page_url_shapes() {
        assert_eq!(page_url(Some("fr"), Path::new("index.md")), "/fr");
        assert_eq!(
            page_url(Some("fr"), Path::new("guide/intro.md")),
            "/fr/guide/intro"
        );
        assert_eq!(page_url(None, Path::new("guide/index.md")), "/guide");
        assert_eq!(page_url(None, Path::new("index.md")), "/");
    }

    #[test]
    fn test_collect_files_requires_extension() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("kept.css"), "").unwrap();
        fs::write(dir.path().join("skipped"), "").unwrap();

        let files = collect_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("kept.css"));
    }
}
