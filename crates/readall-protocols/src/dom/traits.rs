//! Document trait definition.

use async_trait::async_trait;
use tokio::sync::watch;
use url::Url;

use super::{NodeId, Rect, SyntheticMouseEvent};
use crate::error::DomError;

/// Receiver side of a structural-change subscription.
///
/// The value is a generation counter bumped on every change. Dropping the
/// receiver ends the subscription.
pub type MutationWatch = watch::Receiver<u64>;

/// Queryable, observable, mutable view of a page.
///
/// Node handles are only meaningful until the next suspension point; the
/// host page may re-render at any time.
#[async_trait]
pub trait Document: Send + Sync {
    /// Current page location.
    async fn location(&self) -> Result<Url, DomError>;

    /// First element matching `selector` in document order.
    async fn query_selector(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        Ok(self.query_selector_all(selector).await?.into_iter().next())
    }

    /// All elements matching `selector` in document order.
    async fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError>;

    /// Descendants of `scope` matching `selector`, in document order.
    async fn query_selector_all_within(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, DomError>;

    /// Parent element, if any.
    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError>;

    /// Nearest inclusive ancestor matching `selector`.
    async fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, DomError>;

    /// Attribute value.
    async fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError>;

    /// Concatenated text of the node and its descendants.
    async fn text_content(&self, node: NodeId) -> Result<String, DomError>;

    /// Rendered box in viewport coordinates, `None` when not rendered.
    async fn layout(&self, node: NodeId) -> Result<Option<Rect>, DomError>;

    /// Dispatch a single mouse event targeting `node`.
    async fn dispatch_mouse_event(
        &self,
        node: NodeId,
        event: &SyntheticMouseEvent,
    ) -> Result<(), DomError>;

    /// Subscribe to structural changes under the document body.
    fn observe(&self) -> MutationWatch;
}
