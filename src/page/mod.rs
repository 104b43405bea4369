//! Page parsing: source file to a rendered HTML document.
//!
//! The render pipeline reaches page sources only through the [`PageParser`]
//! trait, keeping the markdown/templating engine an external collaborator.

use std::path::{Path, PathBuf};
use std::{fs, io};

use pulldown_cmark::{Options, Parser, html};
use thiserror::Error;

use crate::config::SiteConfig;

/// Page parsing failures.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The page source file does not exist. Maps to 404, not 500.
    #[error("page source not found: {0}")]
    MissingSource(PathBuf),

    /// The source exists but could not be rendered.
    #[error("{0}")]
    Render(String),
}

/// External page parser contract: `{page, extension, locale}` to a full
/// HTML document. `page` is relative to the page root, without extension.
pub trait PageParser: Send + Sync {
    fn parse_page(&self, page: &Path, ext: &str, locale: Option<&str>)
    -> Result<String, ParseError>;
}

/// Markdown/HTML page parser over the page tree.
///
/// `.md` sources are converted with pulldown-cmark; other sources are used
/// as-is. Either way the body is wrapped in the site layout shell.
pub struct MarkdownParser {
    pages_dir: PathBuf,
    title: String,
    description: String,
    default_locale: String,
}

impl MarkdownParser {
    pub fn new(config: &SiteConfig) -> Self {
        Self {
            pages_dir: config.build.pages.clone(),
            title: config.site.title.clone(),
            description: config.site.description.clone(),
            default_locale: config.site.default_locale.clone(),
        }
    }

    fn layout(&self, body: &str, locale: Option<&str>) -> String {
        let lang = locale.unwrap_or(&self.default_locale);
        format!(
            "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
             <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
             <title>{title}</title>\n\
             <meta name=\"description\" content=\"{description}\">\n\
             </head>\n<body>\n{body}</body>\n</html>\n",
            title = self.title,
            description = self.description,
        )
    }
}

impl PageParser for MarkdownParser {
    fn parse_page(
        &self,
        page: &Path,
        ext: &str,
        locale: Option<&str>,
    ) -> Result<String, ParseError> {
        let source_path = crate::core::page_source(&self.pages_dir, page, ext);
        let source = fs::read_to_string(&source_path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ParseError::MissingSource(source_path.clone()),
            _ => ParseError::Render(e.to_string()),
        })?;

        let body = match ext {
            "md" => markdown_to_html(&source),
            _ => source,
        };
        Ok(self.layout(&body, locale))
    }
}

/// Convert markdown to HTML with the common extensions enabled.
fn markdown_to_html(source: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(source, options);
    let mut out = String::with_capacity(source.len() * 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parser_fixture() -> (TempDir, MarkdownParser) {
        let dir = TempDir::new().unwrap();
        let pages = dir.path().join("pages");
        fs::create_dir_all(pages.join("guide")).unwrap();
        fs::write(pages.join("about.md"), "# About\n\nSome *text*.\n").unwrap();
        fs::write(pages.join("guide/raw.html"), "<h1>Raw</h1>").unwrap();

        let mut config = SiteConfig::default();
        config.build.pages = pages;
        config.site.title = "Test Site".to_string();
        (dir, MarkdownParser::new(&config))
    }

    #[test]
    fn test_parse_markdown_page() {
        let (_dir, parser) = parser_fixture();
        let html = parser
            .parse_page(Path::new("about"), "md", Some("en"))
            .unwrap();

        assert!(html.contains("<h1>About</h1>"));
        assert!(html.contains("<em>text</em>"));
        assert!(html.contains("<title>Test Site</title>"));
        assert!(html.contains("lang=\"en\""));
    }

    #[test]
    fn test_parse_html_page_passthrough() {
        let (_dir, parser) = parser_fixture();
        let html = parser
            .parse_page(Path::new("guide/raw"), "html", None)
            .unwrap();

        assert!(html.contains("<h1>Raw</h1>"));
        // No locale: layout falls back to the default locale
        assert!(html.contains("lang=\"en\""));
    }

    #[test]
    fn test_missing_source_is_distinguished() {
        let (_dir, parser) = parser_fixture();
        let err = parser
            .parse_page(Path::new("missing"), "md", None)
            .unwrap_err();
        assert!(matches!(err, ParseError::MissingSource(_)));
    }
}
