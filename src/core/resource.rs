//! Static resource table: file extension to delivery descriptor.
//!
//! The table is the single authority on which extensions are servable.
//! Extensions absent from it are answered with 501 Not Implemented.

/// How a resource's bytes are read and delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Binary,
}

/// Delivery metadata for one resource extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceDescriptor {
    pub encoding: Encoding,
    pub mime: &'static str,
}

const fn utf8(mime: &'static str) -> ResourceDescriptor {
    ResourceDescriptor {
        encoding: Encoding::Utf8,
        mime,
    }
}

const fn binary(mime: &'static str) -> ResourceDescriptor {
    ResourceDescriptor {
        encoding: Encoding::Binary,
        mime,
    }
}

/// Common MIME type constants.
pub mod types {
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JSON: &str = "application/json";

    pub const ICO: &str = "image/x-icon";
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const SVG: &str = "image/svg+xml";

    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
    pub const TTF: &str = "font/ttf";
    pub const OTF: &str = "font/otf";
    pub const EOT: &str = "application/vnd.ms-fontobject";
}

/// Look up the descriptor for a file extension (without the leading dot).
///
/// Page source extensions map to `text/html` since pages always render
/// to HTML. Immutable for the process lifetime.
pub fn lookup(ext: &str) -> Option<ResourceDescriptor> {
    let descriptor = match ext {
        // Pages render to HTML regardless of their source format
        "html" | "ejs" | "md" => utf8(types::HTML),

        "js" => utf8(types::JAVASCRIPT),
        "css" => utf8(types::CSS),
        "json" => utf8(types::JSON),

        "ico" => binary(types::ICO),
        "png" => binary(types::PNG),
        "jpg" | "jpeg" => binary(types::JPEG),
        "gif" => binary(types::GIF),
        "svg" => binary(types::SVG),

        "woff" => binary(types::WOFF),
        "woff2" => binary(types::WOFF2),
        "ttf" => binary(types::TTF),
        "otf" => binary(types::OTF),
        "eot" => binary(types::EOT),

        _ => return None,
    };
    Some(descriptor)
}
