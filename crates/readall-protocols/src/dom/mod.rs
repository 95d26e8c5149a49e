//! Document capability surface.
//!
//! The automation engine never touches a concrete DOM. It talks to a
//! [`Document`], which can be a live browser tab or an in-memory tree.

mod events;
mod traits;
mod types;

pub use events::*;
pub use traits::*;
pub use types::*;
