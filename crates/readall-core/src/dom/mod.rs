//! In-memory document used to exercise providers without a browser.

mod memory;
mod selector;

pub use memory::{
    element, ClickHandler, DispatchedEvent, ElementBuilder, MemoryDocument, MemoryTree,
};
pub use selector::SelectorList;
