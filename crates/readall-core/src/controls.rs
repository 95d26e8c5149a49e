//! Shared control-level steps: lookups by selector or label, menus,
//! checkbox state, and bulk-confirmation dialogs.

use tracing::{debug, info, warn};

use readall_protocols::{AutomationError, CheckState, Document, DomError, NodeId};

use crate::click::simulate_click;
use crate::timing::Timings;
use crate::wait::poll_until;

/// Generic menu entry.
pub const MENU_ITEM_SELECTOR: &str = "[role=\"menuitem\"]";

/// First node matched by the first selector that matches anything.
pub async fn first_match(
    doc: &dyn Document,
    selectors: &[&str],
) -> Result<Option<NodeId>, DomError> {
    for selector in selectors {
        if let Some(node) = doc.query_selector(selector).await? {
            debug!("Matched {}", selector);
            return Ok(Some(node));
        }
    }
    Ok(None)
}

/// One way of finding a control.
#[derive(Debug, Clone, Copy)]
pub enum Lookup {
    /// Element matching the selector.
    Selector(&'static str),
    /// Nearest `ancestor` of an element matching `selector`, e.g. the button
    /// wrapping an icon.
    AncestorOf {
        selector: &'static str,
        ancestor: &'static str,
    },
    /// Element matching `selector` whose trimmed text is one of `labels`.
    Text {
        selector: &'static str,
        labels: &'static [&'static str],
    },
}

impl Lookup {
    pub async fn find(&self, doc: &dyn Document) -> Result<Option<NodeId>, DomError> {
        match *self {
            Lookup::Selector(selector) => doc.query_selector(selector).await,
            Lookup::AncestorOf { selector, ancestor } => {
                match doc.query_selector(selector).await? {
                    Some(inner) => doc.closest(inner, ancestor).await,
                    None => Ok(None),
                }
            }
            Lookup::Text { selector, labels } => find_by_text(doc, selector, labels).await,
        }
    }
}

/// Result of the first lookup that finds anything.
pub async fn first_lookup(doc: &dyn Document, lookups: &[Lookup]) -> Result<Option<NodeId>, DomError> {
    for lookup in lookups {
        if let Some(node) = lookup.find(doc).await? {
            debug!("Matched {:?}", lookup);
            return Ok(Some(node));
        }
    }
    Ok(None)
}

/// First element matching `selector` whose trimmed text equals one of `labels`.
pub async fn find_by_text(
    doc: &dyn Document,
    selector: &str,
    labels: &[&str],
) -> Result<Option<NodeId>, DomError> {
    let nodes = doc.query_selector_all(selector).await?;
    first_labelled(doc, nodes, labels).await
}

/// Like [`find_by_text`], restricted to descendants of `scope`.
pub async fn find_by_text_within(
    doc: &dyn Document,
    scope: NodeId,
    selector: &str,
    labels: &[&str],
) -> Result<Option<NodeId>, DomError> {
    let nodes = doc.query_selector_all_within(scope, selector).await?;
    first_labelled(doc, nodes, labels).await
}

/// First of `nodes` whose trimmed text is one of `labels`. Nodes that went
/// stale since the query (menus re-render while animating open) are skipped.
async fn first_labelled(
    doc: &dyn Document,
    nodes: Vec<NodeId>,
    labels: &[&str],
) -> Result<Option<NodeId>, DomError> {
    for node in nodes {
        let text = match doc.text_content(node).await {
            Ok(text) => text,
            Err(DomError::StaleNode(_)) => {
                debug!("Skipping stale candidate {}", node);
                continue;
            }
            Err(e) => return Err(e),
        };
        if labels.contains(&text.trim()) {
            return Ok(Some(node));
        }
    }
    Ok(None)
}

/// Rendered at all.
pub async fn is_visible(doc: &dyn Document, node: NodeId) -> Result<bool, DomError> {
    Ok(doc.layout(node).await?.is_some())
}

/// Live `aria-checked` state; never cached.
pub async fn check_state(doc: &dyn Document, node: NodeId) -> Result<CheckState, DomError> {
    let value = doc.attribute(node, "aria-checked").await?;
    Ok(CheckState::from_aria(value.as_deref()))
}

/// Open the menu behind `trigger` and activate the first item labelled with
/// one of `labels`. When no such item exists the menu is closed again and
/// `false` is returned. A failure after the menu opened also closes it before
/// the error is returned.
pub async fn choose_menu_item(
    doc: &dyn Document,
    trigger: NodeId,
    item_selector: &str,
    labels: &[&str],
    settle: std::time::Duration,
) -> Result<bool, DomError> {
    simulate_click(doc, trigger).await?;
    tokio::time::sleep(settle).await;

    let chosen = match find_by_text(doc, item_selector, labels).await {
        Ok(Some(item)) => simulate_click(doc, item).await.map(|_| true),
        Ok(None) => Ok(false),
        Err(e) => Err(e),
    };

    match chosen {
        Ok(true) => {
            debug!("Chose menu item {:?}", labels);
            Ok(true)
        }
        Ok(false) => {
            debug!("No menu item labelled {:?}; closing menu", labels);
            simulate_click(doc, trigger).await?;
            Ok(false)
        }
        Err(e) => {
            warn!("Menu step failed ({}); closing menu", e);
            if let Err(close) = simulate_click(doc, trigger).await {
                debug!("Could not close menu: {}", close);
            }
            Err(e)
        }
    }
}

/// Wait (bounded) for a toggled checkbox to report a selection.
///
/// Exhaustion is a soft failure: the page may still converge, so the caller
/// carries on either way.
pub async fn confirm_selected(
    doc: &dyn Document,
    checkbox: NodeId,
    timings: &Timings,
) -> Result<bool, DomError> {
    let confirmed = poll_until(timings.confirm_attempts, timings.confirm_interval, move || async move {
        match check_state(doc, checkbox).await {
            Ok(state) => Ok(state.has_selection()),
            // Re-rendered checkbox: keep polling, the next read may land.
            Err(DomError::StaleNode(_)) => Ok(false),
            Err(e) => Err(e),
        }
    })
    .await?;

    if !confirmed {
        warn!(
            "Selection not confirmed after {} checks; continuing",
            timings.confirm_attempts
        );
    }
    Ok(confirmed)
}

/// Structural description of a platform's bulk-confirmation dialog.
#[derive(Debug, Clone, Copy)]
pub struct BulkDialog {
    /// Dialog containers.
    pub dialog: &'static [&'static str],
    /// Affirmative controls matched by selector inside the dialog.
    pub confirm: &'static [&'static str],
    /// Fallback: buttons inside the dialog with one of these labels.
    pub confirm_labels: &'static [&'static str],
}

const DIALOG_BUTTONS: &str = "button, [role=\"button\"]";

impl BulkDialog {
    /// First visible dialog that carries an affirmative control, with that
    /// control. Dialogs without one (a compose window, say) are not bulk
    /// confirmations and are passed over.
    async fn find_bulk(&self, doc: &dyn Document) -> Result<Option<(NodeId, NodeId)>, DomError> {
        for selector in self.dialog {
            for node in doc.query_selector_all(selector).await? {
                match is_visible(doc, node).await {
                    Ok(true) => {}
                    Ok(false) | Err(DomError::StaleNode(_)) => continue,
                    Err(e) => return Err(e),
                }
                match self.find_confirm(doc, node).await? {
                    Some(confirm) => return Ok(Some((node, confirm))),
                    None => debug!("Dialog {} has no affirmative control; ignoring it", node),
                }
            }
        }
        Ok(None)
    }

    async fn find_confirm(
        &self,
        doc: &dyn Document,
        dialog: NodeId,
    ) -> Result<Option<NodeId>, DomError> {
        for selector in self.confirm {
            if let Some(node) = doc
                .query_selector_all_within(dialog, selector)
                .await?
                .into_iter()
                .next()
            {
                return Ok(Some(node));
            }
        }
        find_by_text_within(doc, dialog, DIALOG_BUTTONS, self.confirm_labels).await
    }

    /// Poll briefly for the dialog and confirm it if it shows up.
    ///
    /// Returns `Ok(false)` when no bulk dialog appeared (small selections
    /// never raise one, and unrelated dialogs do not count). When it does
    /// appear, returns only after the affirmative control was activated and
    /// the dialog went away (or the bound ran out).
    pub async fn resolve(&self, doc: &dyn Document, timings: &Timings) -> Result<bool, AutomationError> {
        let mut found = self.find_bulk(doc).await?;
        let mut lookups = 0;
        while found.is_none() && lookups < timings.dialog_poll_attempts {
            tokio::time::sleep(timings.dialog_poll_interval).await;
            found = self.find_bulk(doc).await?;
            lookups += 1;
        }
        let Some((dialog, confirm)) = found else {
            debug!("No bulk-confirmation dialog");
            return Ok(false);
        };

        simulate_click(doc, confirm).await?;
        info!("Confirmed bulk action dialog");

        let attempts = bounded_attempts(timings);
        let closed = poll_until(attempts, timings.confirm_interval, move || async move {
            match doc.layout(dialog).await {
                Ok(rect) => Ok(rect.is_none()),
                Err(DomError::StaleNode(_)) => Ok(true),
                Err(e) => Err(e),
            }
        })
        .await?;
        if !closed {
            warn!("Bulk-confirmation dialog still open after confirming");
        }
        Ok(true)
    }
}

fn bounded_attempts(timings: &Timings) -> u32 {
    let interval = timings.confirm_interval.as_millis().max(1);
    (timings.bulk_start_timeout.as_millis() / interval).clamp(1, u32::MAX as u128) as u32
}

#[cfg(test)]
#[path = "controls_tests.rs"]
mod tests;
