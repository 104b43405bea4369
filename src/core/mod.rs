//! Core types - pure abstractions shared across the codebase.

mod outcome;
mod resolve;
pub mod resource;
mod state;

pub use outcome::Outcome;
pub use resolve::{ResolvedPage, find_extension, page_source, resolve};
pub use resource::{Encoding, ResourceDescriptor};
pub use state::{is_shutdown, register_server, setup_shutdown_handler};
