//! Toolbar control locator.
//!
//! There is no stable selector for the master "select all" checkbox. Every
//! row carries its own checkbox, so the master is found structurally:
//! rendered, outside the message grid, outside any row, and topmost.

use std::cmp::Ordering;

use tracing::debug;

use readall_protocols::{AutomationError, Document, DomError, NodeId, Rect};

/// Elements exposing checkbox semantics.
pub const CHECKBOX_SELECTOR: &str = "[role=\"checkbox\"]";
/// Message grid container.
pub const GRID_SELECTOR: &str = "[role=\"grid\"]";
/// Individual message row.
pub const ROW_SELECTOR: &str = "tr, [role=\"row\"]";

/// Structural heuristic for the master toolbar checkbox.
#[derive(Debug, Clone)]
pub struct ToolbarLocator {
    checkbox: &'static str,
    grid: &'static str,
    row: &'static str,
}

impl Default for ToolbarLocator {
    fn default() -> Self {
        Self::new(CHECKBOX_SELECTOR, GRID_SELECTOR, ROW_SELECTOR)
    }
}

impl ToolbarLocator {
    pub fn new(checkbox: &'static str, grid: &'static str, row: &'static str) -> Self {
        Self {
            checkbox,
            grid,
            row,
        }
    }

    /// Surviving candidates, topmost first.
    pub async fn candidates(&self, doc: &dyn Document) -> Result<Vec<(NodeId, Rect)>, DomError> {
        let mut candidates = Vec::new();
        for node in doc.query_selector_all(self.checkbox).await? {
            match self.qualify(doc, node).await {
                Ok(Some(rect)) => candidates.push((node, rect)),
                Ok(None) => {}
                // Re-rendered away between the query and the read.
                Err(DomError::StaleNode(_)) => {}
                Err(e) => return Err(e),
            }
        }
        candidates.sort_by(|a, b| a.1.top().partial_cmp(&b.1.top()).unwrap_or(Ordering::Equal));
        Ok(candidates)
    }

    async fn qualify(&self, doc: &dyn Document, node: NodeId) -> Result<Option<Rect>, DomError> {
        let Some(rect) = doc.layout(node).await? else {
            return Ok(None);
        };
        if doc.closest(node, self.grid).await?.is_some() {
            return Ok(None);
        }
        if doc.closest(node, self.row).await?.is_some() {
            return Ok(None);
        }
        Ok(Some(rect))
    }

    /// The master checkbox, if any candidate survives.
    pub async fn locate(&self, doc: &dyn Document) -> Result<Option<NodeId>, DomError> {
        let candidates = self.candidates(doc).await?;
        debug!("Toolbar checkbox candidates: {}", candidates.len());
        Ok(candidates.first().map(|(node, _)| *node))
    }

    /// Like [`locate`](Self::locate), failing with `ControlNotFound`.
    pub async fn require(&self, doc: &dyn Document) -> Result<NodeId, AutomationError> {
        self.locate(doc)
            .await?
            .ok_or_else(|| AutomationError::control_not_found("the toolbar"))
    }
}

#[cfg(test)]
#[path = "locator_tests.rs"]
mod tests;
