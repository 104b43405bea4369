//! Configuration utility types.

mod error;
mod handle;

pub use error::ConfigError;
pub use handle::{cfg, init_config, reload_config};
