//! In-memory structural document.
//!
//! A small arena tree standing in for a rendered page: elements carry a tag,
//! attributes, own text and an optional rendered box. Click handlers let a
//! test script how the "host page" reacts to synthetic input.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tracing::trace;
use url::Url;

use readall_protocols::{
    Document, DomError, MouseEventKind, MutationWatch, NodeId, Rect, SyntheticMouseEvent,
};

use super::selector::SelectorList;

const DOCUMENT_NODE: NodeId = NodeId(0);
const BODY_NODE: NodeId = NodeId(1);

/// Reaction to a click reaching a node. Receives the event target.
pub type ClickHandler = Arc<dyn Fn(&mut MemoryTree, NodeId) + Send + Sync>;

/// Declarative element description used to grow the tree.
#[derive(Debug, Clone, Default)]
pub struct ElementBuilder {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    rect: Option<Rect>,
    children: Vec<ElementBuilder>,
}

/// Start describing an element.
pub fn element(tag: &str) -> ElementBuilder {
    ElementBuilder {
        tag: tag.to_ascii_lowercase(),
        ..Default::default()
    }
}

impl ElementBuilder {
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.push((name.to_ascii_lowercase(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Give the element a rendered box. Elements without one count as hidden.
    pub fn rect(mut self, x: f64, y: f64, width: f64, height: f64) -> Self {
        self.rect = Some(Rect::new(x, y, width, height));
        self
    }

    pub fn child(mut self, child: ElementBuilder) -> Self {
        self.children.push(child);
        self
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    rect: Option<Rect>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Mutable tree behind a [`MemoryDocument`].
pub struct MemoryTree {
    nodes: HashMap<NodeId, NodeData>,
    handlers: HashMap<NodeId, Vec<ClickHandler>>,
    next_id: i64,
    changes: u64,
}

impl MemoryTree {
    fn new() -> Self {
        let mut nodes = HashMap::new();
        nodes.insert(
            DOCUMENT_NODE,
            NodeData {
                tag: "#document".to_string(),
                attrs: Vec::new(),
                text: String::new(),
                rect: None,
                parent: None,
                children: vec![BODY_NODE],
            },
        );
        nodes.insert(
            BODY_NODE,
            NodeData {
                tag: "body".to_string(),
                attrs: Vec::new(),
                text: String::new(),
                rect: Some(Rect::new(0.0, 0.0, 1280.0, 720.0)),
                parent: Some(DOCUMENT_NODE),
                children: Vec::new(),
            },
        );
        Self {
            nodes,
            handlers: HashMap::new(),
            next_id: 2,
            changes: 0,
        }
    }

    /// The `<body>` element.
    pub fn body(&self) -> NodeId {
        BODY_NODE
    }

    /// Insert `builder` (and its children) as the last child of `parent`.
    pub fn append(&mut self, parent: NodeId, builder: ElementBuilder) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            NodeData {
                tag: builder.tag,
                attrs: builder.attrs,
                text: builder.text,
                rect: builder.rect,
                parent: Some(parent),
                children: Vec::new(),
            },
        );
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(id);
        }
        for child in builder.children {
            self.append(id, child);
        }
        self.changes += 1;
        id
    }

    /// Detach `node` and its subtree.
    pub fn remove(&mut self, node: NodeId) {
        let Some(data) = self.nodes.remove(&node) else {
            return;
        };
        if let Some(parent) = data.parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.children.retain(|c| *c != node);
        }
        self.handlers.remove(&node);
        for child in data.children {
            self.remove(child);
        }
        self.changes += 1;
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        if let Some(data) = self.nodes.get_mut(&node) {
            match data.attrs.iter_mut().find(|(k, _)| *k == name) {
                Some((_, v)) => *v = value.to_string(),
                None => data.attrs.push((name, value.to_string())),
            }
            self.changes += 1;
        }
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.attrs.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
            self.changes += 1;
        }
    }

    pub fn set_rect(&mut self, node: NodeId, rect: Option<Rect>) {
        if let Some(data) = self.nodes.get_mut(&node) {
            data.rect = rect;
            self.changes += 1;
        }
    }

    /// Register a click reaction on `node` (fires for clicks bubbling through it).
    pub fn on_click<F>(&mut self, node: NodeId, handler: F)
    where
        F: Fn(&mut MemoryTree, NodeId) + Send + Sync + 'static,
    {
        self.handlers.entry(node).or_default().push(Arc::new(handler));
    }

    /// Elements matching `selector` in document order.
    pub fn select(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.select_within(DOCUMENT_NODE, selector)
    }

    /// First element matching `selector`.
    pub fn select_one(&self, selector: &str) -> Result<Option<NodeId>, DomError> {
        Ok(self.select(selector)?.into_iter().next())
    }

    fn select_within(&self, scope: NodeId, selector: &str) -> Result<Vec<NodeId>, DomError> {
        if !self.nodes.contains_key(&scope) {
            return Err(DomError::StaleNode(scope));
        }
        let list = SelectorList::parse(selector)?;
        let mut found = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[&scope].children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if list.matches(self, node) {
                found.push(node);
            }
            if let Some(data) = self.nodes.get(&node) {
                stack.extend(data.children.iter().rev().copied());
            }
        }
        Ok(found)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains_key(&node)
    }

    pub fn attr_of(&self, node: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(&node).and_then(|d| {
            d.attrs
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v.as_str())
        })
    }

    /// Tag name of an element; `None` for the document node or unknown handles.
    pub(crate) fn tag_of(&self, node: NodeId) -> Option<&str> {
        if node == DOCUMENT_NODE {
            return None;
        }
        self.nodes.get(&node).map(|d| d.tag.as_str())
    }

    /// Parent element (never the document node).
    pub(crate) fn parent_of(&self, node: NodeId) -> Option<NodeId> {
        self.nodes
            .get(&node)
            .and_then(|d| d.parent)
            .filter(|p| *p != DOCUMENT_NODE)
    }

    pub fn text_of(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        if let Some(data) = self.nodes.get(&node) {
            out.push_str(&data.text);
            for child in &data.children {
                self.collect_text(*child, out);
            }
        }
    }

    /// Rendered box; hidden when the node or any ancestor has none.
    pub fn rect_of(&self, node: NodeId) -> Option<Rect> {
        let own = self.nodes.get(&node)?.rect?;
        let mut current = self.parent_of(node);
        while let Some(ancestor) = current {
            self.nodes.get(&ancestor)?.rect?;
            current = self.parent_of(ancestor);
        }
        Some(own)
    }

    fn node(&self, node: NodeId) -> Result<&NodeData, DomError> {
        self.nodes.get(&node).ok_or(DomError::StaleNode(node))
    }

    /// Handlers along the propagation path, target first.
    fn click_path_handlers(&self, target: NodeId, bubbles: bool) -> Vec<ClickHandler> {
        let mut path = vec![target];
        if bubbles {
            let mut current = self.nodes.get(&target).and_then(|d| d.parent);
            while let Some(node) = current {
                path.push(node);
                current = self.nodes.get(&node).and_then(|d| d.parent);
            }
        }
        path.iter()
            .filter_map(|n| self.handlers.get(n))
            .flat_map(|hs| hs.iter().cloned())
            .collect()
    }
}

/// One event recorded by [`MemoryDocument::dispatched_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub target: NodeId,
    pub kind: MouseEventKind,
    pub bubbles: bool,
    pub buttons: u16,
}

/// [`Document`] implementation over a [`MemoryTree`].
pub struct MemoryDocument {
    location: RwLock<Url>,
    tree: Mutex<MemoryTree>,
    events: Mutex<Vec<DispatchedEvent>>,
    mutations: watch::Sender<u64>,
}

impl MemoryDocument {
    pub fn new(location: Url) -> Self {
        let (mutations, _) = watch::channel(0);
        Self {
            location: RwLock::new(location),
            tree: Mutex::new(MemoryTree::new()),
            events: Mutex::new(Vec::new()),
            mutations,
        }
    }

    /// Parse `location` and create an empty document there.
    pub fn at(location: &str) -> Result<Self, DomError> {
        let url = Url::parse(location)
            .map_err(|e| DomError::Backend(format!("invalid location {location}: {e}")))?;
        Ok(Self::new(url))
    }

    pub fn set_location(&self, location: Url) {
        *self.location.write() = location;
    }

    /// Run `f` against the tree, notifying observers if anything changed.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut MemoryTree) -> R) -> R {
        let (result, changed) = {
            let mut tree = self.tree.lock();
            let before = tree.changes;
            let result = f(&mut *tree);
            (result, tree.changes != before)
        };
        if changed {
            self.notify_observers();
        }
        result
    }

    /// Read-only access to the tree.
    pub fn inspect<R>(&self, f: impl FnOnce(&MemoryTree) -> R) -> R {
        f(&*self.tree.lock())
    }

    /// Convenience: append under `<body>`.
    pub fn append_to_body(&self, builder: ElementBuilder) -> NodeId {
        self.mutate(|tree| {
            let body = tree.body();
            tree.append(body, builder)
        })
    }

    /// Every event dispatched so far, in order.
    pub fn dispatched_events(&self) -> Vec<DispatchedEvent> {
        self.events.lock().clone()
    }

    /// Targets of dispatched `click` events, in order.
    pub fn clicked(&self) -> Vec<NodeId> {
        self.events
            .lock()
            .iter()
            .filter(|e| e.kind == MouseEventKind::Click)
            .map(|e| e.target)
            .collect()
    }

    /// Number of live mutation subscriptions.
    pub fn observer_count(&self) -> usize {
        self.mutations.receiver_count()
    }

    /// Number of change notifications published so far.
    pub fn mutation_count(&self) -> u64 {
        *self.mutations.borrow()
    }

    fn notify_observers(&self) {
        self.mutations.send_modify(|generation| *generation += 1);
    }
}

#[async_trait]
impl Document for MemoryDocument {
    async fn location(&self) -> Result<Url, DomError> {
        Ok(self.location.read().clone())
    }

    async fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>, DomError> {
        self.tree.lock().select(selector)
    }

    async fn query_selector_all_within(
        &self,
        scope: NodeId,
        selector: &str,
    ) -> Result<Vec<NodeId>, DomError> {
        self.tree.lock().select_within(scope, selector)
    }

    async fn parent(&self, node: NodeId) -> Result<Option<NodeId>, DomError> {
        let tree = self.tree.lock();
        tree.node(node)?;
        Ok(tree.parent_of(node))
    }

    async fn closest(&self, node: NodeId, selector: &str) -> Result<Option<NodeId>, DomError> {
        let tree = self.tree.lock();
        tree.node(node)?;
        let list = SelectorList::parse(selector)?;
        let mut current = Some(node);
        while let Some(candidate) = current {
            if list.matches(&tree, candidate) {
                return Ok(Some(candidate));
            }
            current = tree.parent_of(candidate);
        }
        Ok(None)
    }

    async fn attribute(&self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        let tree = self.tree.lock();
        tree.node(node)?;
        Ok(tree.attr_of(node, name).map(str::to_string))
    }

    async fn text_content(&self, node: NodeId) -> Result<String, DomError> {
        let tree = self.tree.lock();
        tree.node(node)?;
        Ok(tree.text_of(node))
    }

    async fn layout(&self, node: NodeId) -> Result<Option<Rect>, DomError> {
        let tree = self.tree.lock();
        tree.node(node)?;
        Ok(tree.rect_of(node))
    }

    async fn dispatch_mouse_event(
        &self,
        node: NodeId,
        event: &SyntheticMouseEvent,
    ) -> Result<(), DomError> {
        let changed = {
            let mut tree = self.tree.lock();
            tree.node(node)?;
            self.events.lock().push(DispatchedEvent {
                target: node,
                kind: event.kind,
                bubbles: event.bubbles,
                buttons: event.buttons,
            });
            trace!("dispatch {} on {}", event.kind.as_str(), node);

            if event.kind != MouseEventKind::Click {
                false
            } else {
                let before = tree.changes;
                for handler in tree.click_path_handlers(node, event.bubbles) {
                    handler(&mut *tree, node);
                }
                tree.changes != before
            }
        };
        if changed {
            self.notify_observers();
        }
        Ok(())
    }

    fn observe(&self) -> MutationWatch {
        self.mutations.subscribe()
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
