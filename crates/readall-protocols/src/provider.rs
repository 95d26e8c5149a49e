//! Mail provider trait definition.

use async_trait::async_trait;
use url::Url;

use crate::dom::Document;
use crate::error::AutomationError;

/// Automation strategy for one webmail surface.
///
/// Providers are stateless across invocations: everything an operation needs
/// is recomputed from the document on each call, and every operation must
/// close any menu or dialog it opened before returning.
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// Display name (e.g., "Gmail").
    fn name(&self) -> &str;

    /// Pure hostname check against the page location.
    fn is_applicable(&self, location: &Url) -> bool;

    /// Wait (bounded) for the message list to render. Timeout yields `false`.
    async fn is_ready(&self, doc: &dyn Document) -> Result<bool, AutomationError>;

    /// Select the intended scope of messages.
    async fn select_all(&self, doc: &dyn Document) -> Result<(), AutomationError>;

    /// Mark the current selection as read.
    async fn mark_as_read(&self, doc: &dyn Document) -> Result<(), AutomationError>;

    /// Clear the selection.
    async fn deselect_all(&self, doc: &dyn Document) -> Result<(), AutomationError>;
}
