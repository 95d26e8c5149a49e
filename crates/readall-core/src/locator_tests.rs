use super::*;
use crate::dom::{element, MemoryDocument};

fn checkbox(top: f64) -> crate::dom::ElementBuilder {
    element("div")
        .attr("role", "checkbox")
        .attr("aria-checked", "false")
        .rect(10.0, top, 20.0, 20.0)
}

#[tokio::test]
async fn test_picks_topmost_outside_grid_and_rows() {
    let doc = MemoryDocument::at("https://mail.google.com/").unwrap();
    // Per-row checkboxes, higher on the page than the master.
    doc.append_to_body(
        element("table")
            .attr("role", "grid")
            .rect(0.0, 0.0, 800.0, 600.0)
            .child(element("tbody").rect(0.0, 0.0, 800.0, 600.0).child(
                element("tr")
                    .rect(0.0, 5.0, 800.0, 30.0)
                    .child(checkbox(5.0)),
            )),
    );
    doc.append_to_body(
        element("div")
            .attr("role", "row")
            .rect(0.0, 8.0, 800.0, 30.0)
            .child(checkbox(8.0)),
    );
    // Hidden checkbox at the very top.
    doc.append_to_body(element("div").attr("role", "checkbox"));
    // Two toolbar-level candidates; the upper one wins.
    let lower = doc.append_to_body(checkbox(120.0));
    let master = doc.append_to_body(checkbox(64.0));

    let locator = ToolbarLocator::default();
    let candidates = locator.candidates(&doc).await.unwrap();
    assert_eq!(
        candidates.iter().map(|(n, _)| *n).collect::<Vec<_>>(),
        vec![master, lower]
    );
    assert_eq!(locator.locate(&doc).await.unwrap(), Some(master));
}

#[tokio::test]
async fn test_empty_candidate_list_is_control_not_found() {
    let doc = MemoryDocument::at("https://mail.google.com/").unwrap();
    doc.append_to_body(
        element("table")
            .attr("role", "grid")
            .rect(0.0, 0.0, 800.0, 600.0)
            .child(checkbox(40.0)),
    );

    let locator = ToolbarLocator::default();
    assert_eq!(locator.locate(&doc).await.unwrap(), None);
    let err = locator.require(&doc).await.unwrap_err();
    assert!(err.is_control_not_found());
    assert!(err.to_string().contains("toolbar"));
}

#[tokio::test]
async fn test_custom_selectors() {
    let doc = MemoryDocument::at("https://outlook.live.com/mail/").unwrap();
    doc.append_to_body(
        element("div")
            .attr("role", "listbox")
            .rect(0.0, 50.0, 800.0, 600.0)
            .child(checkbox(60.0)),
    );
    let header = doc.append_to_body(checkbox(200.0));

    let locator = ToolbarLocator::new(CHECKBOX_SELECTOR, "[role=\"listbox\"]", ROW_SELECTOR);
    assert_eq!(locator.locate(&doc).await.unwrap(), Some(header));
}
