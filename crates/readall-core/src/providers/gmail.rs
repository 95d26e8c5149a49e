//! Gmail provider.

use async_trait::async_trait;
use url::Url;

use readall_protocols::{AutomationError, Document, MailProvider};

use super::strategy::{
    deselect_via_menu, mark_read, select_full_history, select_unread, BulkBanner,
    MarkReadControls, ScopeMenu,
};
use super::{host_matches, SelectScope};
use crate::controls::{BulkDialog, Lookup, MENU_ITEM_SELECTOR};
use crate::locator::{ToolbarLocator, CHECKBOX_SELECTOR, GRID_SELECTOR, ROW_SELECTOR};
use crate::timing::Timings;
use crate::wait::wait_for;

const HOSTS: &[&str] = &["mail.google.com"];
const READY_MARKER: &str = "table[role=\"grid\"]";

const SCOPE_MENU: ScopeMenu = ScopeMenu {
    triggers: &[
        "[role=\"button\"][aria-haspopup=\"true\"]",
        "div[role=\"button\"][aria-label*=\"Select\"]",
        "div[role=\"button\"]",
    ],
    item: MENU_ITEM_SELECTOR,
    unread_labels: &["Unread"],
    none_labels: &["None"],
};

const BANNER: BulkBanner = BulkBanner {
    selector: "span[role=\"link\"], [role=\"link\"]",
    prefix: "Select all",
    keyword: "conversations",
};

const BULK_DIALOG: BulkDialog = BulkDialog {
    dialog: &["[role=\"alertdialog\"]"],
    confirm: &["button[name=\"ok\"]"],
    confirm_labels: &["OK", "Continue", "Confirm"],
};

const MARK_READ: MarkReadControls = MarkReadControls {
    awaited: None,
    direct: &[
        Lookup::Selector("div[role=\"button\"][aria-label=\"Mark as read\"]"),
        Lookup::Selector("div[data-tooltip=\"Mark as read\"]"),
    ],
    overflow: &[
        "div[role=\"button\"][aria-label=\"More\"]",
        "div[role=\"button\"][data-tooltip=\"More\"]",
    ],
    overflow_item: MENU_ITEM_SELECTOR,
    overflow_labels: &["Mark as read", "Mark as Read"],
    hint: Some("Is your Gmail in English?"),
    dialog: Some(BULK_DIALOG),
};

/// Gmail web client.
#[derive(Debug, Clone)]
pub struct GmailProvider {
    timings: Timings,
    scope: SelectScope,
    locator: ToolbarLocator,
}

impl GmailProvider {
    pub fn new(timings: Timings, scope: SelectScope) -> Self {
        Self {
            timings,
            scope,
            locator: ToolbarLocator::new(CHECKBOX_SELECTOR, GRID_SELECTOR, ROW_SELECTOR),
        }
    }

    pub fn scope(&self) -> SelectScope {
        self.scope
    }

    /// Hostname fragments this provider answers to.
    pub fn hosts(&self) -> &'static [&'static str] {
        HOSTS
    }
}

impl Default for GmailProvider {
    fn default() -> Self {
        Self::new(Timings::default(), SelectScope::default())
    }
}

#[async_trait]
impl MailProvider for GmailProvider {
    fn name(&self) -> &str {
        "Gmail"
    }

    fn is_applicable(&self, location: &Url) -> bool {
        host_matches(location, HOSTS)
    }

    async fn is_ready(&self, doc: &dyn Document) -> Result<bool, AutomationError> {
        Ok(wait_for(doc, READY_MARKER, self.timings.ready_timeout)
            .await?
            .is_some())
    }

    async fn select_all(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        match self.scope {
            SelectScope::UnreadOnly => {
                select_unread(doc, &self.locator, &SCOPE_MENU, &self.timings).await
            }
            SelectScope::FullHistory => {
                select_full_history(doc, &self.locator, &BANNER, &BULK_DIALOG, &self.timings).await
            }
        }
    }

    async fn mark_as_read(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        mark_read(doc, &MARK_READ, &self.timings).await
    }

    async fn deselect_all(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        deselect_via_menu(doc, &self.locator, &SCOPE_MENU, &self.timings).await
    }
}

#[cfg(test)]
#[path = "gmail_tests.rs"]
mod tests;
