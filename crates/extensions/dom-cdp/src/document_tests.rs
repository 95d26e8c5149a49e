use serde_json::json;

use super::*;

fn event(value: Value) -> CdpResponse {
    serde_json::from_value(value).unwrap()
}

// ============================================================================
// Attributes
// ============================================================================

#[test]
fn test_attribute_from_pairs() {
    let pairs: Vec<String> = ["role", "checkbox", "aria-checked", "mixed"]
        .iter()
        .map(|s| s.to_string())
        .collect();

    assert_eq!(attribute_from_pairs(&pairs, "aria-checked").as_deref(), Some("mixed"));
    assert_eq!(attribute_from_pairs(&pairs, "ROLE").as_deref(), Some("checkbox"));
    assert_eq!(attribute_from_pairs(&pairs, "title"), None);
}

#[test]
fn test_attribute_values_are_not_names() {
    let pairs: Vec<String> = ["title", "role"].iter().map(|s| s.to_string()).collect();
    assert_eq!(attribute_from_pairs(&pairs, "role"), None);
}

#[test]
fn test_attribute_empty_value() {
    let pairs: Vec<String> = ["hidden", ""].iter().map(|s| s.to_string()).collect();
    assert_eq!(attribute_from_pairs(&pairs, "hidden").as_deref(), Some(""));
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn test_rect_from_value() {
    let rect = rect_from_value(&json!({"x": 10.5, "y": 40, "width": 20, "height": 18})).unwrap();
    assert_eq!(rect, Rect::new(10.5, 40.0, 20.0, 18.0));
}

#[test]
fn test_rect_from_null_is_unrendered() {
    assert!(rect_from_value(&Value::Null).is_none());
    assert!(rect_from_value(&json!({"x": 1, "y": 2})).is_none());
}

// ============================================================================
// Page events
// ============================================================================

#[test]
fn test_binding_call_is_a_change() {
    let e = event(json!({
        "method": "Runtime.bindingCalled",
        "params": {"name": "__readallChanged", "payload": "", "executionContextId": 3},
        "sessionId": "S"
    }));
    assert_eq!(page_event(&e), Some(PageEvent::Changed));
}

#[test]
fn test_foreign_binding_is_ignored() {
    let e = event(json!({
        "method": "Runtime.bindingCalled",
        "params": {"name": "somethingElse", "payload": "x", "executionContextId": 3}
    }));
    assert_eq!(page_event(&e), None);
}

#[test]
fn test_document_updated_replaces() {
    let e = event(json!({"method": "DOM.documentUpdated", "params": {}}));
    assert_eq!(page_event(&e), Some(PageEvent::Replaced));
}

#[test]
fn test_responses_and_other_events_ignored() {
    assert_eq!(page_event(&event(json!({"id": 1, "result": {}}))), None);
    assert_eq!(
        page_event(&event(json!({"method": "Page.loadEventFired", "params": {"timestamp": 1.0}}))),
        None
    );
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_node_maps_to_stale() {
    let err = stale(NodeId(12))(CdpError::Protocol {
        code: -32000,
        message: "Could not find node with given id".to_string(),
    });
    assert!(matches!(err, DomError::StaleNode(NodeId(12))));

    let err = stale(NodeId(12))(CdpError::SessionClosed);
    assert!(matches!(err, DomError::Detached));
}

#[test]
fn test_bump_wraps_generation() {
    let (tx, rx) = watch::channel(u64::MAX);
    bump(&tx);
    assert_eq!(*rx.borrow(), 0);
}
