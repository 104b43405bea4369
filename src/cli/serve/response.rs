//! Response sink: the only component that touches the HTTP transport.
//!
//! Exactly one terminal write per request in live mode; nothing at all in
//! batch mode, where the pipeline's cache writes are the only observable
//! output. This separation is what lets batch generation reuse the serving
//! pipeline without opening a socket.

use crate::core::Outcome;
use anyhow::Result;
use tiny_http::{Header, Request, Response, StatusCode};

/// Terminal delivery for one pipeline outcome.
pub enum Sink {
    /// Live mode: respond over HTTP.
    Http(Request),
    /// Batch mode: suppress delivery.
    Discard,
}

impl Sink {
    pub fn deliver(self, outcome: Outcome) -> Result<()> {
        match self {
            Self::Http(request) => respond(request, outcome),
            Self::Discard => Ok(()),
        }
    }
}

fn respond(request: Request, outcome: Outcome) -> Result<()> {
    match outcome {
        Outcome::Rendered { bytes, mime, .. } => {
            let response = Response::from_data(bytes)
                .with_status_code(StatusCode(200))
                .with_header(content_type(mime));
            request.respond(response)?;
        }
        Outcome::NotFound => request.respond(Response::empty(StatusCode(404)))?,
        Outcome::Unsupported => request.respond(Response::empty(StatusCode(501)))?,
        Outcome::Internal(None) => request.respond(Response::empty(StatusCode(500)))?,
        Outcome::Internal(Some(message)) => {
            let response = Response::from_string(message).with_status_code(StatusCode(500));
            request.respond(response)?;
        }
    }
    Ok(())
}

fn content_type(mime: &'static str) -> Header {
    Header::from_bytes("Content-Type", mime).unwrap()
}
