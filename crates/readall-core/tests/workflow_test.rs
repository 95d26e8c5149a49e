//! End-to-end workflow tests against an in-memory Gmail page.
//!
//! Each test builds the page, bootstraps the automation and runs the whole
//! select → mark read → deselect workflow with paused time.

use std::sync::Arc;

use readall_core::{
    element, Automation, GmailProvider, MemoryDocument, MemoryTree, NoticeLevel, Provider,
    ProviderRegistry, RecordingNotifier, RecordingTrigger, SelectScope, Timings, WorkflowOutcome,
    WorkflowState,
};
use readall_protocols::NodeId;

// ============================================================================
// Test Helpers
// ============================================================================

const INBOX: &str = "https://mail.google.com/mail/u/0/#inbox";

struct Page {
    doc: MemoryDocument,
    master: NodeId,
    trigger: NodeId,
}

struct Harness {
    automation: Automation,
    trigger: Arc<RecordingTrigger>,
    notifier: Arc<RecordingNotifier>,
}

fn harness(scope: SelectScope) -> Harness {
    let trigger = Arc::new(RecordingTrigger::new());
    let notifier = Arc::new(RecordingNotifier::new());
    let registry = ProviderRegistry::new(vec![
        Provider::from(GmailProvider::new(Timings::default(), scope)),
    ]);
    Harness {
        automation: Automation::new(registry, Timings::default(), trigger.clone(), notifier.clone()),
        trigger,
        notifier,
    }
}

fn toggle(tree: &mut MemoryTree, target: NodeId) {
    let next = match tree.attr_of(target, "aria-checked") {
        Some("true") => "false",
        _ => "true",
    };
    tree.set_attr(target, "aria-checked", next);
}

fn close_menus(tree: &mut MemoryTree) {
    for menu in tree.select("[role=\"menu\"]").unwrap() {
        tree.remove(menu);
    }
}

/// Gmail-like inbox: toolbar with master checkbox and scope menu ("All",
/// "None"), and a grid of rows with their own checkboxes.
fn gmail_page() -> Page {
    let doc = MemoryDocument::at(INBOX).unwrap();
    let (master, trigger) = doc.mutate(|tree| {
        let body = tree.body();
        let toolbar = tree.append(body, element("div").attr("gh", "mtb").rect(0.0, 50.0, 1280.0, 48.0));
        let container = tree.append(toolbar, element("div").rect(0.0, 50.0, 60.0, 48.0));
        let wrapper = tree.append(container, element("span").rect(8.0, 60.0, 24.0, 24.0));
        let master = tree.append(
            wrapper,
            element("div")
                .attr("role", "checkbox")
                .attr("aria-checked", "false")
                .rect(10.0, 62.0, 20.0, 20.0),
        );
        let trigger = tree.append(
            container,
            element("div")
                .attr("role", "button")
                .attr("aria-haspopup", "true")
                .rect(34.0, 62.0, 12.0, 20.0),
        );

        // An unrelated checkbox higher up the page, but hidden.
        tree.append(body, element("div").attr("role", "checkbox").attr("style", "display:none"));

        let mut grid = element("table").attr("role", "grid").rect(0.0, 120.0, 1280.0, 600.0);
        for i in 0..3 {
            let top = 120.0 + 40.0 * i as f64;
            grid = grid.child(
                element("tr").attr("role", "row").rect(0.0, top, 1280.0, 40.0).child(
                    element("td").rect(0.0, top, 40.0, 40.0).child(
                        element("div")
                            .attr("role", "checkbox")
                            .attr("aria-checked", "false")
                            .rect(10.0, top + 10.0, 20.0, 20.0),
                    ),
                ),
            );
        }
        tree.append(body, grid);

        tree.on_click(master, toggle);
        tree.on_click(trigger, move |tree: &mut MemoryTree, _| {
            if tree.select_one("[role=\"menu\"]").unwrap().is_some() {
                close_menus(tree);
                return;
            }
            let body = tree.body();
            let menu = tree.append(body, element("div").attr("role", "menu").rect(34.0, 90.0, 120.0, 60.0));
            for (label, state) in [("All", "true"), ("None", "false")] {
                let item = tree.append(
                    menu,
                    element("div").attr("role", "menuitem").text(label).rect(34.0, 90.0, 120.0, 20.0),
                );
                tree.on_click(item, move |tree: &mut MemoryTree, _| {
                    tree.set_attr(master, "aria-checked", state);
                    close_menus(tree);
                });
            }
        });
        (master, trigger)
    });
    Page {
        doc,
        master,
        trigger,
    }
}

fn add_direct_mark_read(page: &Page) -> NodeId {
    page.doc.append_to_body(
        element("div")
            .attr("role", "button")
            .attr("aria-label", "Mark as read")
            .rect(120.0, 62.0, 20.0, 20.0),
    )
}

/// "More" menu with a "Mark as read" item that raises a bulk dialog.
fn add_overflow_mark_read_with_dialog(page: &Page) -> NodeId {
    page.doc.mutate(|tree| {
        let body = tree.body();
        let more = tree.append(
            body,
            element("div")
                .attr("role", "button")
                .attr("aria-label", "More")
                .rect(160.0, 62.0, 20.0, 20.0),
        );
        tree.on_click(more, |tree: &mut MemoryTree, _| {
            let body = tree.body();
            let menu = tree.append(body, element("div").attr("role", "menu").rect(160.0, 90.0, 200.0, 40.0));
            let item = tree.append(
                menu,
                element("div").attr("role", "menuitem").text("Mark as read").rect(160.0, 90.0, 200.0, 20.0),
            );
            tree.on_click(item, |tree: &mut MemoryTree, _| {
                close_menus(tree);
                let body = tree.body();
                let dialog = tree.append(
                    body,
                    element("div")
                        .attr("role", "alertdialog")
                        .text("This action will affect all 2,345 conversations in Inbox.")
                        .rect(400.0, 300.0, 320.0, 140.0),
                );
                tree.append(dialog, element("button").attr("name", "cancel").text("Cancel").rect(560.0, 400.0, 60.0, 24.0));
                let ok = tree.append(
                    dialog,
                    element("button").attr("name", "ok").text("OK").rect(630.0, 400.0, 60.0, 24.0),
                );
                tree.on_click(ok, move |tree: &mut MemoryTree, _| {
                    tree.remove(dialog);
                    let body = tree.body();
                    tree.set_attr(body, "data-bulk", "running");
                });
            });
        });
        more
    })
}

fn texts(doc: &MemoryDocument, nodes: &[NodeId]) -> Vec<String> {
    doc.inspect(|tree| nodes.iter().map(|n| tree.text_of(*n)).collect())
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test(start_paused = true)]
async fn scenario_a_checkbox_direct_control_and_none() {
    let h = harness(SelectScope::UnreadOnly);
    let page = gmail_page();
    let mark_read = add_direct_mark_read(&page);

    let provider = h.automation.initialize(&page.doc).await.unwrap().unwrap();
    let report = h.automation.run(provider, &page.doc).await;

    assert!(report.outcome.is_completed(), "{:?}", report.outcome);
    assert_eq!(report.transitions.last(), Some(&WorkflowState::Done));

    let clicked = page.doc.clicked();
    // Scope menu opened and closed (no "Unread"), master ticked, mark read,
    // then "None" from the scope menu.
    assert_eq!(&clicked[..5], &[page.trigger, page.trigger, page.master, mark_read, page.trigger]);
    assert_eq!(texts(&page.doc, &clicked[5..]), vec!["None"]);

    let state = page.doc.inspect(|tree| tree.attr_of(page.master, "aria-checked").map(str::to_string));
    assert_eq!(state.as_deref(), Some("false"));
    assert!(h.notifier.errors().is_empty());
    assert_eq!(h.trigger.changes(), vec![true, false]);
}

#[tokio::test(start_paused = true)]
async fn scenario_b_no_matching_provider() {
    let h = harness(SelectScope::UnreadOnly);
    let doc = MemoryDocument::at("https://news.example.com/").unwrap();
    doc.append_to_body(element("div").attr("role", "checkbox").rect(0.0, 0.0, 10.0, 10.0));
    let before = doc.mutation_count();

    let provider = h.automation.initialize(&doc).await.unwrap();

    assert!(provider.is_none());
    assert_eq!(doc.mutation_count(), before);
    assert!(doc.dispatched_events().is_empty());
    assert_eq!(
        h.notifier.notices(),
        vec![(NoticeLevel::Info, "No matching provider found for this page.".to_string())]
    );
    assert!(h.trigger.changes().is_empty());
}

#[tokio::test(start_paused = true)]
async fn scenario_c_overflow_menu_with_bulk_dialog() {
    let h = harness(SelectScope::UnreadOnly);
    let page = gmail_page();
    let more = add_overflow_mark_read_with_dialog(&page);

    let provider = h.automation.initialize(&page.doc).await.unwrap().unwrap();
    let report = h.automation.run(provider, &page.doc).await;

    assert!(report.outcome.is_completed(), "{:?}", report.outcome);
    let clicked = page.doc.clicked();
    let more_at = clicked.iter().position(|n| *n == more).unwrap();
    assert_eq!(
        texts(&page.doc, &clicked[more_at + 1..more_at + 3]),
        vec!["Mark as read", "OK"]
    );
    let (bulk, dialog_open) = page.doc.inspect(|tree| {
        (
            tree.attr_of(tree.body(), "data-bulk").map(str::to_string),
            tree.select_one("[role=\"alertdialog\"]").unwrap().is_some(),
        )
    });
    assert_eq!(bulk.as_deref(), Some("running"));
    assert!(!dialog_open);
    assert!(h.notifier.errors().is_empty());
}

#[tokio::test(start_paused = true)]
async fn scenario_d_no_toolbar_candidate() {
    let h = harness(SelectScope::UnreadOnly);
    let doc = MemoryDocument::at(INBOX).unwrap();
    // Only per-row checkboxes: every candidate is filtered out.
    doc.append_to_body(
        element("table").attr("role", "grid").rect(0.0, 120.0, 1280.0, 600.0).child(
            element("tr").attr("role", "row").rect(0.0, 120.0, 1280.0, 40.0).child(
                element("div")
                    .attr("role", "checkbox")
                    .attr("aria-checked", "false")
                    .rect(10.0, 130.0, 20.0, 20.0),
            ),
        ),
    );

    let provider = h.automation.initialize(&doc).await.unwrap().unwrap();
    let report = h.automation.run(provider, &doc).await;

    let WorkflowOutcome::Failed(err) = &report.outcome else {
        panic!("expected failure, got {:?}", report.outcome);
    };
    assert!(err.is_control_not_found());
    assert_eq!(report.transitions, vec![WorkflowState::Selecting, WorkflowState::Failed]);
    assert_eq!(h.automation.orchestrator().state(), WorkflowState::Failed);
    assert_eq!(h.notifier.errors(), vec!["Could not find the toolbar."]);
    assert_eq!(h.trigger.changes(), vec![true, false]);
    assert!(doc.clicked().is_empty());
}

#[tokio::test(start_paused = true)]
async fn full_history_scope_extends_selection() {
    let h = harness(SelectScope::FullHistory);
    let page = gmail_page();
    add_direct_mark_read(&page);
    page.doc.mutate(|tree| {
        tree.on_click(page.master, |tree: &mut MemoryTree, _| {
            if tree.select_one("span[role=\"link\"]").unwrap().is_some() {
                return;
            }
            let body = tree.body();
            let link = tree.append(
                body,
                element("span")
                    .attr("role", "link")
                    .text("Select all 2,345 conversations in Inbox")
                    .rect(300.0, 100.0, 260.0, 18.0),
            );
            tree.on_click(link, |tree: &mut MemoryTree, _| {
                let body = tree.body();
                tree.set_attr(body, "data-scope", "folder");
            });
        });
    });

    let provider = h.automation.initialize(&page.doc).await.unwrap().unwrap();
    let report = h.automation.run(provider, &page.doc).await;

    assert!(report.outcome.is_completed(), "{:?}", report.outcome);
    let clicked = page.doc.clicked();
    assert_eq!(clicked[0], page.master);
    assert_eq!(
        texts(&page.doc, &clicked[1..2]),
        vec!["Select all 2,345 conversations in Inbox"]
    );
    let scope = page.doc.inspect(|tree| tree.attr_of(tree.body(), "data-scope").map(str::to_string));
    assert_eq!(scope.as_deref(), Some("folder"));
}
