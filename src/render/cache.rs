//! Render cache: on-disk artifacts mirroring final output.
//!
//! Existence of a cache file is the sole cache signal. There is no
//! metadata, no expiry, and no invalidation beyond deleting the file.
//! Writes are best-effort: failures are logged, never propagated.

use std::path::{Path, PathBuf};

use crate::core::ResolvedPage;
use crate::debug;

/// When a cache write completes relative to the pipeline call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheWrites {
    /// Spawned onto the thread pool; the response is never blocked on
    /// persistence. Used by live serving.
    Detached,
    /// Completed before the pipeline returns. Used by batch generation,
    /// where the cache writes are the product.
    Inline,
}

/// Locate a cached artifact for a resolved page.
///
/// Checks the native-extension mirror first (static assets), then the
/// `{locale}/{page}.html` mirror (rendered pages). This dual check lets
/// assets and pages share one cache store.
pub fn lookup(content_root: &Path, page: &ResolvedPage) -> Option<PathBuf> {
    let ext = page.ext.as_deref()?;

    let resource = asset_path(content_root, page, ext);
    if resource.is_file() {
        return Some(resource);
    }

    let html = page_path(content_root, page);
    html.is_file().then_some(html)
}

/// `{content_root}/{page}.{ext}` - cache location for static assets.
pub fn asset_path(content_root: &Path, page: &ResolvedPage, ext: &str) -> PathBuf {
    content_root.join(format!("{}.{}", page.page_path().display(), ext))
}

/// `{content_root}/[{locale}/]{page}.html` - cache location for pages.
pub fn page_path(content_root: &Path, page: &ResolvedPage) -> PathBuf {
    let mut root = content_root.to_path_buf();
    if let Some(locale) = &page.locale {
        root.push(locale);
    }
    root.join(format!("{}.html", page.page_path().display()))
}

/// Best-effort persist of a rendered artifact.
///
/// The write is atomic (temp file + rename), so concurrent writers for
/// one cache key cannot produce a torn file; last write wins.
pub fn persist(path: PathBuf, bytes: Vec<u8>, writes: CacheWrites) {
    match writes {
        CacheWrites::Detached => rayon::spawn(move || write(&path, &bytes)),
        CacheWrites::Inline => write(&path, &bytes),
    }
}

fn write(path: &Path, bytes: &[u8]) {
    if let Err(e) = crate::utils::fs::write_atomic(path, bytes) {
        debug!("cache"; "write failed for {}: {}", path.display(), e);
    }
}
