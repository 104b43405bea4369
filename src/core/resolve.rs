//! Request resolution: URL path to page identity.
//!
//! Resolution is a pure function of the configuration snapshot and the
//! file-system state. It runs once per live request and once per batch
//! enumeration entry, and must agree both times.

use std::borrow::Cow;
use std::path::{Path, PathBuf};

use crate::config::SiteConfig;
use crate::i18n::Locales;

/// A URL resolved to a concrete page identity.
///
/// The locale, when present, was the first path segment of the URL and has
/// been stripped from `dir` and `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPage {
    pub locale: Option<String>,
    pub dir: Vec<String>,
    pub name: String,
    pub ext: Option<String>,
}

impl ResolvedPage {
    /// Page path relative to the page/public root, without extension.
    pub fn page_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        for part in &self.dir {
            path.push(part);
        }
        if !self.name.is_empty() {
            path.push(&self.name);
        }
        path
    }
}

/// Resolve a request URL to a page identity.
///
/// Returns `None` (not found) for URLs outside the canonical address
/// space: explicit page extensions, a literal `index` base name, and
/// extensionless paths with no matching page source.
pub fn resolve(url: &str, config: &SiteConfig, locales: &Locales) -> Option<ResolvedPage> {
    let path = normalize_url(url);
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    // Never step outside the content roots
    if segments.iter().any(|s| *s == "..") {
        return None;
    }

    let locale = locales.locale_from_path(&path).map(str::to_string);

    let raw_name = segments.pop().unwrap_or("");
    let (mut name, mut ext) = split_name(raw_name);

    // Strip the locale from the directory and the base name
    let mut dir: Vec<String> = segments
        .iter()
        .filter(|&&s| Some(s) != locale.as_deref())
        .map(ToString::to_string)
        .collect();
    if locale.as_deref() == Some(name.as_str()) {
        name.clear();
    }

    // Page URLs must be extensionless
    if let Some(e) = ext.as_deref()
        && config.build.page_extensions.iter().any(|p| p == e)
    {
        return None;
    }

    // Directory URLs must omit the index filename
    if ext.is_none() && name == "index" {
        return None;
    }

    // Implicit extension: probe the page root directly, then as a directory
    // index. The resolved identity keeps the `index` base name so the cache
    // and the parser see the same path either way.
    if ext.is_none() {
        ext = find_extension(
            &config.build.pages,
            &page_path_of(&dir, &name),
            &config.build.page_extensions,
        );
        if ext.is_none() {
            if !name.is_empty() {
                dir.push(std::mem::take(&mut name));
            }
            name = "index".to_string();
            ext = find_extension(
                &config.build.pages,
                &page_path_of(&dir, &name),
                &config.build.page_extensions,
            );
        }
        ext.as_ref()?;
    }

    Some(ResolvedPage {
        locale,
        dir,
        name,
        ext,
    })
}

/// First configured page extension for which a source file exists under
/// the page root. Declared order is the tie-break when several exist.
pub fn find_extension(page_root: &Path, page: &Path, extensions: &[String]) -> Option<String> {
    extensions
        .iter()
        .find(|ext| page_source(page_root, page, ext.as_str()).is_file())
        .cloned()
}

/// `{page_root}/{page}.{ext}`
pub fn page_source(page_root: &Path, page: &Path, ext: &str) -> PathBuf {
    page_root.join(format!("{}.{}", page.display(), ext))
}

fn page_path_of(dir: &[String], name: &str) -> PathBuf {
    let mut path: PathBuf = dir.iter().collect();
    if !name.is_empty() {
        path.push(name);
    }
    path
}

/// Normalize a browser URL: strip query string and fragment, decode
/// percent-encoding, trim slashes.
fn normalize_url(url: &str) -> String {
    use percent_encoding::percent_decode_str;

    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path)
        .decode_utf8()
        .map(Cow::into_owned)
        .unwrap_or_else(|_| path.to_string());
    decoded.trim_matches('/').to_string()
}

/// Split a path segment into base name and extension.
///
/// Follows standard path-component rules: the extension is everything
/// after the last dot, and dotfiles (`.gitignore`) have no extension.
fn split_name(raw: &str) -> (String, Option<String>) {
    match raw.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => {
            (stem.to_string(), Some(ext.to_string()))
        }
        _ => (raw.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Site fixture: pages tree + locale directories.
    ///
    /// ```text
    /// pages/
    /// ├── index.md
    /// ├── about.md
    /// ├── dual.md        (also dual.html)
    /// ├── dual.html
    /// └── guide/
    ///     ├── index.md
    ///     └── intro.md
    /// locales/
    /// ├── en/
    /// └── fr/
    /// ```
    fn fixture() -> (TempDir, SiteConfig, Locales) {
        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        fs::create_dir_all(pages.join("guide")).unwrap();
        fs::write(pages.join("index.md"), "# home").unwrap();
        fs::write(pages.join("about.md"), "# about").unwrap();
        fs::write(pages.join("dual.md"), "# md wins").unwrap();
        fs::write(pages.join("dual.html"), "<h1>html</h1>").unwrap();
        fs::write(pages.join("guide/index.md"), "# guide").unwrap();
        fs::write(pages.join("guide/intro.md"), "# intro").unwrap();

        let locales_dir = dir.path().join("locales");
        fs::create_dir_all(locales_dir.join("en")).unwrap();
        fs::create_dir_all(locales_dir.join("fr")).unwrap();

        let mut config = SiteConfig::default();
        config.build.pages = pages;
        config.build.locales = locales_dir.clone();
        let locales = Locales::discover(&locales_dir, "en");

        (dir, config, locales)
    }

    #[test]
    fn test_explicit_page_extension_rejected() {
        let (_dir, config, locales) = fixture();
        assert_eq!(resolve("/about.md", &config, &locales), None);
        assert_eq!(resolve("/guide/intro.html", &config, &locales), None);
    }

    #[test]
    fn test_literal_index_rejected() {
        let (_dir, config, locales) = fixture();
        assert_eq!(resolve("/index", &config, &locales), None);
        assert_eq!(resolve("/guide/index", &config, &locales), None);
        // Locale stripping happens first, the rule still applies
        assert_eq!(resolve("/fr/index", &config, &locales), None);
    }

    #[test]
    fn test_locale_stripping() {
        let (_dir, config, locales) = fixture();
        let page = resolve("/fr/guide/intro", &config, &locales).unwrap();
        assert_eq!(page.locale.as_deref(), Some("fr"));
        assert_eq!(page.dir, vec!["guide".to_string()]);
        assert_eq!(page.name, "intro");
        assert_eq!(page.ext.as_deref(), Some("md"));
    }

    #[test]
    fn test_locale_only_url_resolves_index() {
        let (_dir, config, locales) = fixture();
        let page = resolve("/fr", &config, &locales).unwrap();
        assert_eq!(page.locale.as_deref(), Some("fr"));
        assert!(page.dir.is_empty());
        assert_eq!(page.name, "index");
        assert_eq!(page.ext.as_deref(), Some("md"));
    }

    #[test]
    fn test_root_url_resolves_index() {
        let (_dir, config, locales) = fixture();
        let page = resolve("/", &config, &locales).unwrap();
        assert_eq!(page.locale, None);
        assert_eq!(page.page_path(), PathBuf::from("index"));
    }

    #[test]
    fn test_directory_url_falls_back_to_index() {
        let (_dir, config, locales) = fixture();
        let page = resolve("/guide", &config, &locales).unwrap();
        assert_eq!(page.dir, vec!["guide".to_string()]);
        assert_eq!(page.name, "index");
        assert_eq!(page.ext.as_deref(), Some("md"));
    }

    #[test]
    fn test_extension_resolution_is_order_deterministic() {
        let (_dir, mut config, locales) = fixture();

        config.build.page_extensions = vec!["md".into(), "html".into()];
        let page = resolve("/dual", &config, &locales).unwrap();
        assert_eq!(page.ext.as_deref(), Some("md"));

        config.build.page_extensions = vec!["html".into(), "md".into()];
        let page = resolve("/dual", &config, &locales).unwrap();
        assert_eq!(page.ext.as_deref(), Some("html"));
    }

    #[test]
    fn test_unknown_page_not_found() {
        let (_dir, config, locales) = fixture();
        assert_eq!(resolve("/missing", &config, &locales), None);
        assert_eq!(resolve("/fr/guide/missing", &config, &locales), None);
    }

    #[test]
    fn test_asset_extension_passes_through_unprobed() {
        let (_dir, config, locales) = fixture();
        // No file probing for extension-carrying URLs; existence is
        // checked later by render dispatch against the public root.
        let page = resolve("/css/main.css", &config, &locales).unwrap();
        assert_eq!(page.dir, vec!["css".to_string()]);
        assert_eq!(page.name, "main");
        assert_eq!(page.ext.as_deref(), Some("css"));
    }

    #[test]
    fn test_traversal_rejected() {
        let (_dir, config, locales) = fixture();
        assert_eq!(resolve("/../etc/passwd", &config, &locales), None);
        assert_eq!(resolve("/%2e%2e/secret", &config, &locales), None);
    }

    #[test]
    fn test_query_and_fragment_stripped() {
        let (_dir, config, locales) = fixture();
        let page = resolve("/about?v=1#top", &config, &locales).unwrap();
        assert_eq!(page.name, "about");
    }

    #[test]
    fn test_single_locale_site_skips_stripping() {
        let (_dir, config, _locales) = fixture();
        let locales = Locales::discover(Path::new("/nonexistent-locales"), "en");
        // "fr" is a plain directory segment without a locale universe
        assert_eq!(resolve("/fr/guide/intro", &config, &locales), None);
        let page = resolve("/about", &config, &locales).unwrap();
        assert_eq!(page.locale, None);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let (_dir, config, locales) = fixture();
        let first = resolve("/fr/guide/intro", &config, &locales);
        let second = resolve("/fr/guide/intro", &config, &locales);
        assert_eq!(first, second);
    }
}
