use super::*;
use crate::dom::{element, MemoryDocument, MemoryTree};

const INBOX: &str = "https://mail.yahoo.com/d/folders/1";

/// Yahoo's select-all button, optionally exposing its state.
fn yahoo_page(state: Option<(&str, &str)>) -> (MemoryDocument, NodeId) {
    let doc = MemoryDocument::at(INBOX).unwrap();
    let mut button = element("button")
        .attr("data-test-id", "checkbox-select-all")
        .rect(20.0, 80.0, 24.0, 24.0);
    if let Some((name, value)) = state {
        button = button.attr(name, value);
    }
    let button = doc.append_to_body(button);
    doc.append_to_body(
        element("div")
            .attr("data-test-id", "virtual-list")
            .rect(0.0, 120.0, 900.0, 600.0),
    );
    (doc, button)
}

#[test]
fn test_applicability() {
    let yahoo = YahooProvider::default();
    assert!(yahoo.is_applicable(&Url::parse(INBOX).unwrap()));
    assert!(!yahoo.is_applicable(&Url::parse("https://www.yahoo.com/").unwrap()));
}

#[tokio::test(start_paused = true)]
async fn test_ready_on_virtual_list() {
    let (doc, _) = yahoo_page(None);
    assert!(YahooProvider::default().is_ready(&doc).await.unwrap());
}

#[tokio::test]
async fn test_selection_state_sources() {
    let (doc, button) = yahoo_page(Some(("aria-checked", "mixed")));
    assert_eq!(selection_state(&doc, button).await.unwrap(), Some(CheckState::Mixed));

    let (doc, button) = yahoo_page(Some(("data-test-selected", "true")));
    assert_eq!(selection_state(&doc, button).await.unwrap(), Some(CheckState::Checked));

    let (doc, button) = yahoo_page(None);
    assert_eq!(selection_state(&doc, button).await.unwrap(), None);
}

#[tokio::test(start_paused = true)]
async fn test_select_clicks_button() {
    let (doc, button) = yahoo_page(Some(("aria-checked", "false")));
    YahooProvider::default().select_all(&doc).await.unwrap();
    assert_eq!(doc.clicked(), vec![button]);
}

#[tokio::test(start_paused = true)]
async fn test_select_skips_when_already_selected() {
    let (doc, _) = yahoo_page(Some(("data-test-selected", "true")));
    YahooProvider::default().select_all(&doc).await.unwrap();
    assert!(doc.clicked().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_select_missing_button() {
    let doc = MemoryDocument::at(INBOX).unwrap();
    let err = YahooProvider::default().select_all(&doc).await.unwrap_err();
    assert_eq!(err.to_string(), "Could not find the select-all button.");
}

#[tokio::test(start_paused = true)]
async fn test_mark_read_prefers_titled_button() {
    let (doc, _) = yahoo_page(None);
    doc.append_to_body(
        element("button")
            .attr("data-test-id", "toolbar-mark-read")
            .rect(300.0, 40.0, 30.0, 30.0),
    );
    let titled = doc.append_to_body(
        element("button")
            .attr("title", "Mark as read")
            .rect(260.0, 40.0, 30.0, 30.0),
    );

    YahooProvider::default().mark_as_read(&doc).await.unwrap();
    assert_eq!(doc.clicked(), vec![titled]);
}

#[tokio::test(start_paused = true)]
async fn test_mark_read_through_more_menu() {
    let (doc, _) = yahoo_page(None);
    let more = doc.append_to_body(
        element("button")
            .attr("data-test-id", "toolbar-more")
            .rect(340.0, 40.0, 30.0, 30.0),
    );
    doc.mutate(|tree| {
        tree.on_click(more, |tree: &mut MemoryTree, _| {
            let body = tree.body();
            tree.append(
                body,
                element("ul").attr("role", "menu").rect(340.0, 70.0, 180.0, 90.0).child(
                    element("li")
                        .attr("role", "menuitem")
                        .text("Mark as read")
                        .rect(340.0, 70.0, 180.0, 30.0),
                ),
            );
        });
    });

    YahooProvider::default().mark_as_read(&doc).await.unwrap();
    let clicked = doc.clicked();
    assert_eq!(clicked[0], more);
    assert_eq!(doc.inspect(|tree| tree.text_of(clicked[1])), "Mark as read");
}

#[tokio::test(start_paused = true)]
async fn test_deselect_presses_stateless_button() {
    let (doc, button) = yahoo_page(None);
    YahooProvider::default().deselect_all(&doc).await.unwrap();
    assert_eq!(doc.clicked(), vec![button]);
}

#[tokio::test(start_paused = true)]
async fn test_deselect_skips_clear_button() {
    let (doc, _) = yahoo_page(Some(("aria-checked", "false")));
    YahooProvider::default().deselect_all(&doc).await.unwrap();
    assert!(doc.clicked().is_empty());
}
