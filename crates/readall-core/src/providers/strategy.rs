//! Fallback chains shared by provider variants.
//!
//! Two select-all philosophies exist: scoped-unread (open the selection-scope
//! menu, pick "Unread", else tick the master checkbox) and full-history (tick
//! the master checkbox, then follow the "select all N conversations" banner
//! and confirm the bulk dialog). Deselect mirrors the scoped pattern.

use tracing::{debug, info, warn};

use readall_protocols::{AutomationError, CheckState, Document, DomError, NodeId};

use crate::click::simulate_click;
use crate::controls::{
    check_state, choose_menu_item, confirm_selected, first_match, first_lookup, is_visible,
    BulkDialog, Lookup,
};
use crate::locator::ToolbarLocator;
use crate::timing::Timings;
use crate::wait::wait_for;

/// The selection-scope menu next to the master checkbox.
#[derive(Debug, Clone, Copy)]
pub struct ScopeMenu {
    /// Trigger candidates inside the master checkbox's container, in priority order.
    pub triggers: &'static [&'static str],
    pub item: &'static str,
    pub unread_labels: &'static [&'static str],
    pub none_labels: &'static [&'static str],
}

impl ScopeMenu {
    /// A control sharing the master checkbox's container but distinct from it.
    pub async fn find_trigger(
        &self,
        doc: &dyn Document,
        master: NodeId,
    ) -> Result<Option<NodeId>, DomError> {
        let Some(parent) = doc.parent(master).await? else {
            return Ok(None);
        };
        let container = doc.parent(parent).await?.unwrap_or(parent);
        for selector in self.triggers {
            for node in doc.query_selector_all_within(container, selector).await? {
                if node != master {
                    return Ok(Some(node));
                }
            }
        }
        Ok(None)
    }
}

/// Post-selection banner offering to extend the selection to the whole folder.
#[derive(Debug, Clone, Copy)]
pub struct BulkBanner {
    pub selector: &'static str,
    pub prefix: &'static str,
    pub keyword: &'static str,
}

impl BulkBanner {
    async fn find(&self, doc: &dyn Document) -> Result<Option<NodeId>, DomError> {
        for node in doc.query_selector_all(self.selector).await? {
            let text = doc.text_content(node).await?;
            let text = text.trim();
            if text.starts_with(self.prefix)
                && text.contains(self.keyword)
                && is_visible(doc, node).await?
            {
                return Ok(Some(node));
            }
        }
        Ok(None)
    }
}

/// Controls making up a mark-as-read chain.
#[derive(Debug, Clone, Copy)]
pub struct MarkReadControls {
    /// Waited for first (bounded by the wait timeout), when set.
    pub awaited: Option<&'static str>,
    pub direct: &'static [Lookup],
    pub overflow: &'static [&'static str],
    pub overflow_item: &'static str,
    pub overflow_labels: &'static [&'static str],
    pub hint: Option<&'static str>,
    pub dialog: Option<BulkDialog>,
}

/// Tick the master checkbox unless something is already selected, then
/// confirm the state took. Returns `false` when nothing was clicked.
pub async fn tick_master(
    doc: &dyn Document,
    master: NodeId,
    timings: &Timings,
) -> Result<bool, AutomationError> {
    if check_state(doc, master).await?.has_selection() {
        debug!("Master checkbox already selected");
        return Ok(false);
    }
    simulate_click(doc, master).await?;
    confirm_selected(doc, master, timings).await?;
    Ok(true)
}

/// Scoped-unread select-all.
pub async fn select_unread(
    doc: &dyn Document,
    locator: &ToolbarLocator,
    menu: &ScopeMenu,
    timings: &Timings,
) -> Result<(), AutomationError> {
    let master = locator.require(doc).await?;
    if check_state(doc, master).await?.has_selection() {
        info!("Selection already present; skipping select-all");
        return Ok(());
    }

    if let Some(trigger) = menu.find_trigger(doc, master).await? {
        if choose_menu_item(doc, trigger, menu.item, menu.unread_labels, timings.scope_menu_settle)
            .await?
        {
            info!("Selected \"Unread\" via the selection menu");
            tokio::time::sleep(timings.after_scope).await;
            return Ok(());
        }
    }

    info!("\"Unread\" option not found, falling back to select all visible");
    // The menu round-trip may have re-rendered the toolbar.
    let master = locator.require(doc).await?;
    tick_master(doc, master, timings).await?;
    Ok(())
}

/// Full-history select-all.
pub async fn select_full_history(
    doc: &dyn Document,
    locator: &ToolbarLocator,
    banner: &BulkBanner,
    dialog: &BulkDialog,
    timings: &Timings,
) -> Result<(), AutomationError> {
    let master = locator.require(doc).await?;
    if !tick_master(doc, master, timings).await? {
        info!("Selection already present; skipping select-all");
        return Ok(());
    }

    let mut link = banner.find(doc).await?;
    let mut lookups = 0;
    while link.is_none() && lookups < timings.dialog_poll_attempts {
        tokio::time::sleep(timings.dialog_poll_interval).await;
        link = banner.find(doc).await?;
        lookups += 1;
    }
    let Some(link) = link else {
        debug!("No bulk-select banner; keeping the page-level selection");
        return Ok(());
    };

    simulate_click(doc, link).await?;
    info!("Extended selection to the whole folder");
    dialog.resolve(doc, timings).await?;
    Ok(())
}

/// Scoped deselect-all. Never fails for a missing control.
pub async fn deselect_via_menu(
    doc: &dyn Document,
    locator: &ToolbarLocator,
    menu: &ScopeMenu,
    timings: &Timings,
) -> Result<(), AutomationError> {
    let Some(master) = locator.locate(doc).await? else {
        warn!("Could not find master checkbox to locate dropdown");
        return Ok(());
    };

    match menu.find_trigger(doc, master).await? {
        Some(trigger) => {
            match choose_menu_item(doc, trigger, menu.item, menu.none_labels, timings.menu_settle)
                .await
            {
                Ok(true) => {
                    info!("Cleared selection via \"None\"");
                    return Ok(());
                }
                Ok(false) => warn!("Could not find \"None\" option"),
                Err(DomError::StaleNode(node)) => {
                    warn!("Selection menu re-rendered under us ({}); skipping it", node)
                }
                Err(e) => return Err(e.into()),
            }
        }
        None => warn!("Could not find selection dropdown button"),
    }

    info!("Falling back to checkbox toggle");
    toggle_off(doc, locator, timings).await
}

/// Toggle the master checkbox until nothing is selected.
///
/// A mixed checkbox may flip to fully checked on the first toggle, so the
/// state is read again after a pause and toggled once more if needed.
pub async fn toggle_off(
    doc: &dyn Document,
    locator: &ToolbarLocator,
    timings: &Timings,
) -> Result<(), AutomationError> {
    let Some(master) = locator.locate(doc).await? else {
        warn!("Master checkbox disappeared before toggling");
        return Ok(());
    };
    if !check_state(doc, master).await?.has_selection() {
        return Ok(());
    }
    simulate_click(doc, master).await?;
    tokio::time::sleep(timings.toggle_recheck).await;

    if let Some(master) = locator.locate(doc).await? {
        if check_state(doc, master).await? == CheckState::Checked {
            debug!("Toggle landed on all-selected; toggling again");
            simulate_click(doc, master).await?;
        }
    }
    Ok(())
}

/// Direct control, then overflow menu, then bulk-confirmation dialog.
pub async fn mark_read(
    doc: &dyn Document,
    controls: &MarkReadControls,
    timings: &Timings,
) -> Result<(), AutomationError> {
    let mut direct = match controls.awaited {
        Some(selector) => wait_for(doc, selector, timings.wait_timeout).await?,
        None => None,
    };
    if direct.is_none() {
        direct = first_lookup(doc, controls.direct).await?;
    }

    let activated = match direct {
        Some(button) => {
            simulate_click(doc, button).await?;
            true
        }
        None => match first_match(doc, controls.overflow).await? {
            Some(more) => {
                choose_menu_item(
                    doc,
                    more,
                    controls.overflow_item,
                    controls.overflow_labels,
                    timings.menu_settle,
                )
                .await?
            }
            None => false,
        },
    };

    if !activated {
        let control = "\"Mark as read\" button";
        return Err(match controls.hint {
            Some(hint) => AutomationError::control_not_found_with_hint(control, hint),
            None => AutomationError::control_not_found(control),
        });
    }

    if let Some(dialog) = &controls.dialog {
        dialog.resolve(doc, timings).await?;
    }
    Ok(())
}
