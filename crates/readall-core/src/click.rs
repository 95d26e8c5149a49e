//! Synthetic pointer interaction.

use tracing::trace;

use readall_protocols::{Document, DomError, MouseEventKind, NodeId, SyntheticMouseEvent};

/// Event order of one simulated click.
pub const CLICK_SEQUENCE: [MouseEventKind; 3] = [
    MouseEventKind::MouseDown,
    MouseEventKind::Click,
    MouseEventKind::MouseUp,
];

/// Dispatch mousedown, click, mouseup on `node`, bubbling, primary button held.
///
/// Several webmail frameworks listen on raw pointer events and ignore a bare
/// `element.click()`, so every synthetic interaction goes through here.
pub async fn simulate_click(doc: &dyn Document, node: NodeId) -> Result<(), DomError> {
    for kind in CLICK_SEQUENCE {
        doc.dispatch_mouse_event(node, &SyntheticMouseEvent::primary(kind))
            .await?;
    }
    trace!("Simulated click on {}", node);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{element, MemoryDocument};

    #[tokio::test]
    async fn test_click_sequence_order() {
        let doc = MemoryDocument::at("https://mail.google.com/").unwrap();
        let node = doc.append_to_body(element("div").attr("role", "button"));

        simulate_click(&doc, node).await.unwrap();

        let events = doc.dispatched_events();
        assert_eq!(events.len(), 3);
        let kinds: Vec<_> = events.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, CLICK_SEQUENCE.to_vec());
        assert!(events.iter().all(|e| e.target == node && e.bubbles && e.buttons == 1));
    }

    #[tokio::test]
    async fn test_click_on_stale_node_fails() {
        let doc = MemoryDocument::at("https://mail.google.com/").unwrap();
        let node = doc.append_to_body(element("div"));
        doc.mutate(|tree| tree.remove(node));

        let result = simulate_click(&doc, node).await;
        assert!(matches!(result, Err(DomError::StaleNode(_))));
        assert!(doc.dispatched_events().is_empty());
    }
}
