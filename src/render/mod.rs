//! Render dispatch: one shared pipeline for live serving and batch
//! generation.
//!
//! A resolved page is served from the render cache when possible,
//! otherwise dispatched to the page parser (templated pages) or read
//! through from the public asset tree (static assets). Both execution
//! modes run this exact code path, which is what guarantees byte-identical
//! output between a live response and a generated file.

pub mod cache;

use std::path::Path;
use std::sync::Arc;
use std::{fs, io};

use crate::config::SiteConfig;
use crate::core::{Outcome, ResolvedPage, ResourceDescriptor, resolve, resource};
use crate::i18n::{Locales, TableTranslator, Translator};
use crate::page::{MarkdownParser, PageParser, ParseError};

pub use cache::CacheWrites;

/// Immutable per-request view of the world.
///
/// Mode decisions (caching, write policy) are explicit values threaded
/// through every call, never ambient state, so both modes can run side by
/// side in one process.
pub struct RenderContext {
    pub config: Arc<SiteConfig>,
    pub locales: Arc<Locales>,
    pub parser: Arc<dyn PageParser>,
    pub translator: Arc<dyn Translator>,
    pub cache_enabled: bool,
    pub cache_writes: CacheWrites,
}

impl RenderContext {
    /// Context for live serving: caching per config, detached cache
    /// writes so responses are never blocked on persistence.
    pub fn live(config: Arc<SiteConfig>) -> Self {
        let cache_enabled = config.build.cache;
        Self::with_mode(config, cache_enabled, CacheWrites::Detached)
    }

    /// Context for batch generation: cache writes are the product, so
    /// caching is forced on and writes complete before each call returns.
    pub fn batch(config: Arc<SiteConfig>) -> Self {
        Self::with_mode(config, true, CacheWrites::Inline)
    }

    fn with_mode(config: Arc<SiteConfig>, cache_enabled: bool, cache_writes: CacheWrites) -> Self {
        let locales = Arc::new(Locales::discover(
            &config.build.locales,
            &config.site.default_locale,
        ));
        let parser = Arc::new(MarkdownParser::new(&config));
        let translator = Arc::new(TableTranslator::load(&config.build.locales, &locales));
        Self {
            config,
            locales,
            parser,
            translator,
            cache_enabled,
            cache_writes,
        }
    }

    fn is_page_extension(&self, ext: &str) -> bool {
        self.config.build.page_extensions.iter().any(|p| p == ext)
    }
}

/// Run the full pipeline for one request URL: resolve, then render.
pub fn run(url: &str, ctx: &RenderContext) -> Outcome {
    match resolve(url, &ctx.config, &ctx.locales) {
        Some(page) => render(&page, ctx),
        None => Outcome::NotFound,
    }
}

/// Dispatch a resolved page to the cache, the page parser, or the public
/// asset tree. At most one cache write per call, never on cache hits.
pub fn render(page: &ResolvedPage, ctx: &RenderContext) -> Outcome {
    let Some(ext) = page.ext.as_deref() else {
        return Outcome::NotFound;
    };
    let Some(descriptor) = resource::lookup(ext) else {
        return Outcome::Unsupported;
    };

    // Cache hit bypasses rendering entirely. An unreadable cache file is
    // treated as a miss; the cache is memoization, not a source of truth.
    if ctx.cache_enabled
        && let Some(cached) = cache::lookup(&ctx.config.build.content, page)
        && let Ok(bytes) = fs::read(&cached)
    {
        return Outcome::rendered(bytes, descriptor);
    }

    if ctx.is_page_extension(ext) {
        render_page(page, ext, descriptor, ctx)
    } else {
        serve_asset(page, ext, descriptor, ctx)
    }
}

/// Delegate to the page parser and translator, then persist the rendered
/// HTML under `{content}/[{locale}/]{page}.html`.
fn render_page(
    page: &ResolvedPage,
    ext: &str,
    descriptor: ResourceDescriptor,
    ctx: &RenderContext,
) -> Outcome {
    let path = page.page_path();
    match ctx.parser.parse_page(&path, ext, page.locale.as_deref()) {
        Ok(html) => {
            let html = ctx.translator.translate(&html, &path, page.locale.as_deref());
            let bytes = html.into_bytes();
            if ctx.cache_enabled {
                cache::persist(
                    cache::page_path(&ctx.config.build.content, page),
                    bytes.clone(),
                    ctx.cache_writes,
                );
            }
            Outcome::rendered(bytes, descriptor)
        }
        Err(ParseError::MissingSource(_)) => Outcome::NotFound,
        Err(ParseError::Render(message)) => Outcome::Internal(Some(message)),
    }
}

/// Read a static asset from the public tree and persist a byte-identical
/// copy under `{content}/{page}.{ext}`.
fn serve_asset(
    page: &ResolvedPage,
    ext: &str,
    descriptor: ResourceDescriptor,
    ctx: &RenderContext,
) -> Outcome {
    let source = asset_source(&ctx.config.build.public, page, ext);
    match fs::read(&source) {
        Ok(bytes) => {
            if ctx.cache_enabled {
                cache::persist(
                    cache::asset_path(&ctx.config.build.content, page, ext),
                    bytes.clone(),
                    ctx.cache_writes,
                );
            }
            Outcome::rendered(bytes, descriptor)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Outcome::NotFound,
        Err(e) => Outcome::Internal(Some(e.to_string())),
    }
}

/// `{public_root}/{page}.{ext}`
fn asset_source(public_root: &Path, page: &ResolvedPage, ext: &str) -> std::path::PathBuf {
    public_root.join(format!("{}.{}", page.page_path().display(), ext))
}
