//! Error types for the ReadAll protocol layer.

mod automation;
mod dom;

pub use automation::*;
pub use dom::*;
