//! Pipeline outcome type consumed by the response sink.
//!
//! Resolution and rendering failures are reported as tagged values, never
//! thrown across the pipeline boundary. The sink maps each variant to its
//! HTTP status in live mode and discards it in batch mode.

use super::resource::{Encoding, ResourceDescriptor};

/// Result of resolving and rendering one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Rendered (or cache-served) bytes ready for delivery.
    Rendered {
        bytes: Vec<u8>,
        encoding: Encoding,
        mime: &'static str,
    },
    /// Unknown URL shape, disallowed canonical form, or missing file.
    NotFound,
    /// Extension absent from the resource table.
    Unsupported,
    /// Renderer failed unexpectedly; optional diagnostic message.
    Internal(Option<String>),
}

impl Outcome {
    /// Successful outcome from raw bytes and a table descriptor.
    pub fn rendered(bytes: Vec<u8>, descriptor: ResourceDescriptor) -> Self {
        Self::Rendered {
            bytes,
            encoding: descriptor.encoding,
            mime: descriptor.mime,
        }
    }

    /// HTTP status this outcome maps to in live mode.
    pub const fn status(&self) -> u16 {
        match self {
            Self::Rendered { .. } => 200,
            Self::NotFound => 404,
            Self::Internal(_) => 500,
            Self::Unsupported => 501,
        }
    }

    pub const fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }
}
