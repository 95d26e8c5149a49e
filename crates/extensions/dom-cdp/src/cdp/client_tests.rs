use super::*;

fn response(json: &str) -> CdpResponse {
    serde_json::from_str(json).unwrap()
}

fn pending_with(id: u64) -> (Mutex<HashMap<u64, PendingRequest>>, oneshot::Receiver<Result<Value, CdpError>>) {
    let (tx, rx) = oneshot::channel();
    let pending = Mutex::new(HashMap::new());
    pending.lock().insert(id, PendingRequest { tx });
    (pending, rx)
}

#[test]
fn test_settle_routes_result_to_request() {
    let (pending, mut rx) = pending_with(3);
    let event = settle(response(r#"{"id": 3, "result": {"nodeIds": [5, 9]}}"#), &pending);

    assert!(event.is_none());
    assert!(pending.lock().is_empty());
    let value = rx.try_recv().unwrap().unwrap();
    assert_eq!(value["nodeIds"][1], 9);
}

#[test]
fn test_settle_routes_protocol_error() {
    let (pending, mut rx) = pending_with(4);
    settle(
        response(r#"{"id": 4, "error": {"code": -32000, "message": "Could not find node with given id"}}"#),
        &pending,
    );

    let err = rx.try_recv().unwrap().unwrap_err();
    assert!(err.is_missing_node());
}

#[test]
fn test_settle_passes_events_through() {
    let (pending, _rx) = pending_with(1);
    let event = settle(
        response(r#"{"method": "DOM.documentUpdated", "params": {}, "sessionId": "S1"}"#),
        &pending,
    )
    .unwrap();

    assert_eq!(event.method.as_deref(), Some("DOM.documentUpdated"));
    assert_eq!(pending.lock().len(), 1);
}

#[test]
fn test_settle_ignores_unknown_response() {
    let (pending, _rx) = pending_with(1);
    assert!(settle(response(r#"{"id": 99, "result": {}}"#), &pending).is_none());
    assert_eq!(pending.lock().len(), 1);
}

#[test]
fn test_request_id_increment() {
    let id = AtomicU64::new(1);
    assert_eq!(id.fetch_add(1, Ordering::SeqCst), 1);
    assert_eq!(id.load(Ordering::SeqCst), 2);
}
