//! Locale discovery and translation.
//!
//! The locale universe is read once per configuration snapshot from the
//! locales directory: each subdirectory names one locale. Multi-locale
//! mode is active exactly when that directory exists; without it the site
//! is single-language and URLs carry no locale prefix.

use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;

/// Immutable locale universe for one configuration snapshot.
#[derive(Debug, Clone, Default)]
pub struct Locales {
    locales: Vec<String>,
    default_locale: String,
    multi: bool,
}

impl Locales {
    /// Discover locales from the locale directory's subdirectories.
    pub fn discover(locales_dir: &Path, default_locale: &str) -> Self {
        let multi = locales_dir.is_dir();
        let mut locales = Vec::new();

        if multi && let Ok(entries) = fs::read_dir(locales_dir) {
            for entry in entries.flatten() {
                if entry.path().is_dir()
                    && let Some(name) = entry.file_name().to_str()
                {
                    locales.push(name.to_string());
                }
            }
        }
        locales.sort();

        Self {
            locales,
            default_locale: default_locale.to_string(),
            multi,
        }
    }

    /// Locale tag carried by a URL path, if its first segment names one.
    pub fn locale_from_path(&self, path: &str) -> Option<&str> {
        if !self.multi {
            return None;
        }
        let first = path.trim_start_matches('/').split('/').next()?;
        self.locales
            .iter()
            .find(|l| l.as_str() == first)
            .map(String::as_str)
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.locales.iter().map(String::as_str)
    }
}

/// Translation collaborator: substitutes localized strings into rendered
/// HTML. Pure and infallible; unknown tokens stay literal.
pub trait Translator: Send + Sync {
    fn translate(&self, html: &str, page: &Path, locale: Option<&str>) -> String;
}

/// `{token}` substitution backed by per-locale JSON string tables.
///
/// Every `*.json` file under a locale directory contributes its top-level
/// string entries to that locale's table. Non-string values and
/// unreadable files are skipped.
pub struct TableTranslator {
    tables: FxHashMap<String, FxHashMap<String, String>>,
}

impl TableTranslator {
    pub fn load(locales_dir: &Path, locales: &Locales) -> Self {
        let mut tables = FxHashMap::default();
        for locale in locales.iter() {
            let mut table = FxHashMap::default();
            collect_strings(&locales_dir.join(locale), &mut table);
            tables.insert(locale.to_string(), table);
        }
        Self { tables }
    }
}

fn collect_strings(dir: &Path, table: &mut FxHashMap<String, String>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_strings(&path, table);
        } else if path.extension().is_some_and(|e| e == "json")
            && let Ok(text) = fs::read_to_string(&path)
            && let Ok(serde_json::Value::Object(map)) = serde_json::from_str(&text)
        {
            for (key, value) in map {
                if let serde_json::Value::String(s) = value {
                    table.insert(key, s);
                }
            }
        }
    }
}

impl Translator for TableTranslator {
    fn translate(&self, html: &str, _page: &Path, locale: Option<&str>) -> String {
        match locale.and_then(|l| self.tables.get(l)) {
            Some(table) if !table.is_empty() => substitute(html, table),
            _ => html.to_string(),
        }
    }
}

/// Replace `{token}` occurrences with table values. Tokens missing from
/// the table and unbalanced braces are left as-is.
fn substitute(html: &str, table: &FxHashMap<String, String>) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find(['{', '}']) {
            Some(end) if after.as_bytes()[end] == b'}' => {
                let token = &after[..end];
                match table.get(token) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(token);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn locales_fixture() -> (TempDir, Locales) {
        let dir = TempDir::new().unwrap();
        let locales_dir = dir.path().join("locales");
        fs::create_dir_all(locales_dir.join("en")).unwrap();
        fs::create_dir_all(locales_dir.join("fr")).unwrap();
        fs::write(
            locales_dir.join("en/common.json"),
            r#"{"greeting": "Hello", "site-name": "Example"}"#,
        )
        .unwrap();
        fs::write(
            locales_dir.join("fr/common.json"),
            r#"{"greeting": "Bonjour", "count": 3}"#,
        )
        .unwrap();
        let locales = Locales::discover(&locales_dir, "en");
        (dir, locales)
    }

    #[test]
    fn test_discover_sorted() {
        let (_dir, locales) = locales_fixture();
        assert!(locales.is_multi());
        assert_eq!(locales.iter().collect::<Vec<_>>(), vec!["en", "fr"]);
    }

    #[test]
    fn test_discover_missing_dir_is_single_locale() {
        let locales = Locales::discover(Path::new("/no/such/dir"), "en");
        assert!(!locales.is_multi());
        assert_eq!(locales.iter().count(), 0);
        assert_eq!(locales.default_locale(), "en");
    }

    #[test]
    fn test_locale_from_path() {
        let (_dir, locales) = locales_fixture();
        assert_eq!(locales.locale_from_path("fr/guide/intro"), Some("fr"));
        assert_eq!(locales.locale_from_path("/en"), Some("en"));
        assert_eq!(locales.locale_from_path("guide/fr"), None);
        assert_eq!(locales.locale_from_path(""), None);
    }

    #[test]
    fn test_translate_substitutes_tokens() {
        let (dir, locales) = locales_fixture();
        let translator = TableTranslator::load(&dir.path().join("locales"), &locales);

        let html = "<h1>{greeting}</h1><p>{unknown}</p>";
        let fr = translator.translate(html, Path::new("index"), Some("fr"));
        assert_eq!(fr, "<h1>Bonjour</h1><p>{unknown}</p>");

        let en = translator.translate(html, Path::new("index"), Some("en"));
        assert_eq!(en, "<h1>Hello</h1><p>{unknown}</p>");
    }

    #[test]
    fn test_translate_without_locale_is_identity() {
        let (dir, locales) = locales_fixture();
        let translator = TableTranslator::load(&dir.path().join("locales"), &locales);

        let html = "<h1>{greeting}</h1>";
        assert_eq!(
            translator.translate(html, Path::new("index"), None),
            html.to_string()
        );
    }

    #[test]
    fn test_substitute_ignores_non_string_values() {
        let (dir, locales) = locales_fixture();
        let translator = TableTranslator::load(&dir.path().join("locales"), &locales);
        // "count" is a number in the fr table, so the token stays literal
        let out = translator.translate("{count}", Path::new("index"), Some("fr"));
        assert_eq!(out, "{count}");
    }

    #[test]
    fn test_substitute_unbalanced_braces() {
        let mut table = FxHashMap::default();
        table.insert("a".to_string(), "x".to_string());
        assert_eq!(substitute("{a} and { open", &table), "x and { open");
        assert_eq!(substitute("{{a}", &table), "{x");
    }
}
