//! # ReadAll Protocols
//!
//! Core protocol definitions (traits) for the ReadAll automation engine.
//! Contains only interface definitions - no implementations.
//!
//! ## Core Traits
//!
//! - [`Document`] - Read/observe/mutate surface over a live (or fake) page
//! - [`MailProvider`] - Per-webmail automation strategy
//! - [`TriggerControl`] - Busy/idle affordance driven by a workflow
//! - [`Notifier`] - Sink for user-visible progress and error notices

pub mod dom;
pub mod error;
pub mod provider;
pub mod sink;

pub use dom::{
    CheckState, Document, MouseEventKind, MutationWatch, NodeId, Rect, SyntheticMouseEvent,
};
pub use error::{AutomationError, DomError};
pub use provider::MailProvider;
pub use sink::{Notifier, TriggerControl};
