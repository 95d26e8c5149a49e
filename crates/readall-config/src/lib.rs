//! # ReadAll Config
//!
//! TOML configuration for the ReadAll automation: browser endpoint, named
//! pauses, per-provider switches and logging.

mod error;
mod loader;
mod schema;
mod validator;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use schema::*;
pub use validator::{ConfigValidator, ValidationError, ValidationResult, ValidationWarning};
