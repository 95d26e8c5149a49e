//! Document errors.

use thiserror::Error;

use crate::dom::NodeId;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Stale node handle: {0}")]
    StaleNode(NodeId),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Document backend error: {0}")]
    Backend(String),

    #[error("Document detached")]
    Detached,
}
