//! [`Document`] over a live Chrome tab.
//!
//! Queries go through the DOM domain; everything that needs the element
//! itself (ancestry, text, layout, events) runs as a function on the resolved
//! remote object. Mutations are reported back through a `Runtime` binding fed
//! by a page-side `MutationObserver`.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};
use url::Url;

use readall_protocols::{Document, DomError, MutationWatch, NodeId, Rect, SyntheticMouseEvent};

use crate::cdp::{BindingCalled, CdpError, CdpResponse, PageSession};

/// Name of the page binding the observer reports through.
const BINDING: &str = "__readallChanged";

/// Installs one coalescing observer per page realm.
const OBSERVER_SCRIPT: &str = r#"(() => {
  if (window.__readallObserver) return;
  let queued = false;
  const report = () => {
    if (queued) return;
    queued = true;
    setTimeout(() => { queued = false; window.__readallChanged(''); }, 0);
  };
  const start = () => {
    window.__readallObserver = new MutationObserver(report);
    window.__readallObserver.observe(document.body, { childList: true, subtree: true, attributes: true });
  };
  if (document.body) start();
  else document.addEventListener('DOMContentLoaded', start, { once: true });
})()"#;

const PARENT_FN: &str = "function() { return this.parentElement; }";
const CLOSEST_FN: &str = "function(selector) { return this.closest(selector); }";
const TEXT_FN: &str = "function() { return this.textContent || ''; }";
const LAYOUT_FN: &str = r#"function() {
  if (!this.isConnected) return null;
  if (this.offsetParent === null && this !== document.body
      && getComputedStyle(this).position !== 'fixed') return null;
  const r = this.getBoundingClientRect();
  return { x: r.x, y: r.y, width: r.width, height: r.height };
}"#;
const DISPATCH_FN: &str = r#"function(init) {
  const event = new MouseEvent(init.type, {
    bubbles: init.bubbles,
    cancelable: init.cancelable,
    buttons: init.buttons,
    view: window,
  });
  this.dispatchEvent(event);
}"#;

/// Page events the document reacts to.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum PageEvent {
    /// The observer reported a mutation.
    Changed,
    /// The whole document was replaced; node ids are void.
    Replaced,
}

pub(crate) fn page_event(event: &CdpResponse) -> Option<PageEvent> {
    match event.method.as_deref()? {
        "Runtime.bindingCalled" => {
            let params = event.params.clone()?;
            let call: BindingCalled = serde_json::from_value(params).ok()?;
            (call.name == BINDING).then_some(PageEvent::Changed)
        }
        "DOM.documentUpdated" => Some(PageEvent::Replaced),
        _ => None,
    }
}

/// Look up `name` in a flat `[name, value, ...]` attribute list.
pub(crate) fn attribute_from_pairs(pairs: &[String], name: &str) -> Option<String> {
    pairs
        .chunks_exact(2)
        .find(|pair| pair[0].eq_ignore_ascii_case(name))
        .map(|pair| pair[1].clone())
}

/// Decode the layout function's result.
pub(crate) fn rect_from_value(value: &Value) -> Option<Rect> {
    let field = |key: &str| value.get(key).and_then(Value::as_f64);
    Some(Rect::new(field("x")?, field("y")?, field("width")?, field("height")?))
}

fn stale(node: NodeId) -> impl Fn(CdpError) -> DomError {
    move |e| {
        if e.is_missing_node() {
            DomError::StaleNode(node)
        } else {
            e.into()
        }
    }
}

fn bump(changes: &watch::Sender<u64>) {
    changes.send_modify(|generation| *generation = generation.wrapping_add(1));
}

/// A webmail tab driven over CDP.
pub struct CdpDocument {
    session: Arc<PageSession>,
    root: Arc<Mutex<Option<i64>>>,
    changes: Arc<watch::Sender<u64>>,
    events_task: JoinHandle<()>,
}

impl CdpDocument {
    /// Wrap an attached page and start watching it for mutations.
    pub async fn attach(session: PageSession) -> Result<Self, CdpError> {
        let events = session
            .take_events()
            .ok_or_else(|| CdpError::InvalidResponse("page events already taken".to_string()))?;
        let session = Arc::new(session);

        session.add_binding(BINDING).await?;
        session.evaluate(OBSERVER_SCRIPT).await?;

        let root = Arc::new(Mutex::new(None));
        let (changes, _) = watch::channel(0u64);
        let changes = Arc::new(changes);

        let events_task = tokio::spawn(Self::event_loop(
            events,
            session.clone(),
            root.clone(),
            changes.clone(),
        ));

        debug!("Watching page {} for mutations", session.target_id());

        Ok(Self {
            session,
            root,
            changes,
            events_task,
        })
    }

    async fn event_loop(
        mut events: mpsc::UnboundedReceiver<CdpResponse>,
        session: Arc<PageSession>,
        root: Arc<Mutex<Option<i64>>>,
        changes: Arc<watch::Sender<u64>>,
    ) {
        while let Some(event) = events.recv().await {
            match page_event(&event) {
                Some(PageEvent::Changed) => bump(&changes),
                Some(PageEvent::Replaced) => {
                    root.lock().take();
                    bump(&changes);
                    if let Err(e) = session.evaluate(OBSERVER_SCRIPT).await {
                        warn!("Failed to reinstall mutation observer: {}", e);
                    }
                }
                None => {}
            }
        }
        debug!("Event stream for page {} ended", session.target_id());
    }

    pub fn session(&self) -> &PageSession {
        &self.session
    }

    /// Number of live mutation subscriptions.
    pub fn observer_count(&self) -> usize {
        self.changes.receiver_count()
    }

    async fn root(&self) -> Result<i64, CdpError> {
        if let Some(id) = *self.root.lock() {
            return Ok(id);
        }
        let id = self.session.get_document().await?;
        *self.root.lock() = Some(id);
        Ok(id)
    }

    fn invalidate_root(&self) {
        self.root.lock().take();
    }

    async fn release(&self, object_id: &str) {
        if let Err(e) = self.session.release_object(object_id).await {
            trace!("Failed to release {}: {}", object_id, e);
        }
    }

    /// Run `function` on the element and return its result by value.
    async fn call_on(
        &self,
        node: NodeId,
        function: &str,
        args: Option<Vec<Value>>,
    ) -> Result<Value, DomError> {
        let object_id = self.session.resolve_node(node.0).await.map_err(stale(node))?;
        let result = self.session.call_function_on(&object_id, function, args).await;
        self.release(&object_id).await;
        result.map_err(stale(node))
    }

    /// Run `function` on the element and map the element it returns back to a node id.
    async fn element_from(
        &self,
        node: NodeId,
        function: &str,
        args: Option<Vec<Value>>,
    ) -> Result<Option<NodeId>, CdpError> {
        let object_id = self.session.resolve_node(node.0).await?;
        let result = match self.session.call_function_on_raw(&object_id, function, args).await {
            Ok(remote) if remote.is_nullish() => Ok(None),
            Ok(remote) => match remote.object_id {
                Some(found) => {
                    let id = self.session.request_node(&found).await;
                    self.release(&found).await;
                    id.map(|id| Some(NodeId(id)))
                }
                None => Ok(None),
            },
            Err(e) => Err(e),
        };
        self.release(&object_id).await;
        result
    }
}

impl Drop for CdpDocument {
    fn drop(&mut self) {
        self.events_task.abort();
    }
}

#[async_trait]
impl Document for CdpDocument {
    async fn location(&self) -> Result<Url, DomError> {
        let href = self.session.evaluate("location.href").await?;
        let href = href
            .as_str()
            .ok_or_else(|| DomError::Backend("location.href is not a string".to_string()))?;
        Url::parse(href).map_err(|e| DomError::Backend(format!("Invalid page URL {}: {}", href, e)))
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let root = self.root().await?;
        match self.session.query_selector_all(root, selector).await {
            Ok(ids) => Ok(ids.into_iter().map(NodeId).collect()),
            Err(CdpError::Protocol { .. }) => {
                // Either the cached root went stale or the selector is bad.
                self.invalidate_root();
                let root = self.root().await?;
                match self.session.query_selector_all(root, selector).await {
                    Ok(ids) => Ok(ids.into_iter().map(NodeId).collect()),
                    Err(CdpError::Protocol { .. }) => {
                        Err(DomError::InvalidSelector(selector.to_string()))
                    }
                    Err(e) => Err(e.into()),
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn query_selector_all_within(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        match self.session.query_selector_all(scope.0, selector).await {
            Ok(ids) => Ok(ids.into_iter().map(NodeId).collect()),
            Err(e) if e.is_missing_node() => Err(DomError::StaleNode(scope)),
            Err(CdpError::Protocol { .. }) => Err(DomError::InvalidSelector(selector.to_string())),
            Err(e) => Err(e.into()),
        }
    }

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError> {
        self.element_from(node, PARENT_FN, None)
            .await
            .map_err(stale(node))
    }

    async fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        self.element_from(node, CLOSEST_FN, Some(vec![Value::from(selector)]))
            .await
            .map_err(|e| match e {
                CdpError::JavaScript(message) if message.contains("SyntaxError") => {
                    DomError::InvalidSelector(selector.to_string())
                }
                other => stale(node)(other),
            })
    }

    async fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let pairs = self
            .session
            .get_attributes(node.0)
            .await
            .map_err(stale(node))?;
        Ok(attribute_from_pairs(&pairs, name))
    }

    async fn text_content(&self, node: NodeId) -> Result<String, DomError> {
        let value = self.call_on(node, TEXT_FN, None).await?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    async fn layout(&self, node: NodeId) -> Result<Option<Rect>, DomError> {
        let value = self.call_on(node, LAYOUT_FN, None).await?;
        Ok(rect_from_value(&value))
    }

    async fn dispatch_mouse_event(
        &self,
        node: NodeId,
        event: &SyntheticMouseEvent,
    ) -> Result<(), DomError> {
        let init = serde_json::to_value(event).map_err(|e| DomError::Backend(e.to_string()))?;
        self.call_on(node, DISPATCH_FN, Some(vec![init])).await?;
        Ok(())
    }

    fn observe(&self) -> MutationWatch {
        self.changes.subscribe()
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
