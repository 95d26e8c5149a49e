//! Mail provider catalog.
//!
//! Each variant drives one webmail client. Shared fallback chains live in
//! [`strategy`]; the variants only carry their selectors and pick a chain.

mod gmail;
mod outlook;
pub mod strategy;
mod yahoo;

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use readall_protocols::{AutomationError, Document, MailProvider};

pub use gmail::GmailProvider;
pub use outlook::OutlookProvider;
pub use yahoo::YahooProvider;

/// Which messages a scoped select-all should pick up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectScope {
    /// Only unread conversations (via the selection-scope menu).
    #[default]
    UnreadOnly,
    /// Every conversation in the folder, across pages.
    FullHistory,
}

impl SelectScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectScope::UnreadOnly => "unread-only",
            SelectScope::FullHistory => "full-history",
        }
    }
}

impl fmt::Display for SelectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SelectScope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unread-only" | "unread" => Ok(SelectScope::UnreadOnly),
            "full-history" | "all" => Ok(SelectScope::FullHistory),
            other => Err(format!("unknown select scope: {other}")),
        }
    }
}

/// Whether the page host contains any of `fragments`.
pub(crate) fn host_matches(location: &Url, fragments: &[&str]) -> bool {
    location
        .host_str()
        .is_some_and(|host| fragments.iter().any(|fragment| host.contains(fragment)))
}

/// A supported webmail client.
#[derive(Debug, Clone)]
pub enum Provider {
    Gmail(GmailProvider),
    Outlook(OutlookProvider),
    Yahoo(YahooProvider),
}

impl Provider {
    pub fn hosts(&self) -> &'static [&'static str] {
        match self {
            Provider::Gmail(p) => p.hosts(),
            Provider::Outlook(p) => p.hosts(),
            Provider::Yahoo(p) => p.hosts(),
        }
    }

    fn inner(&self) -> &dyn MailProvider {
        match self {
            Provider::Gmail(p) => p,
            Provider::Outlook(p) => p,
            Provider::Yahoo(p) => p,
        }
    }
}

impl From<GmailProvider> for Provider {
    fn from(p: GmailProvider) -> Self {
        Provider::Gmail(p)
    }
}

impl From<OutlookProvider> for Provider {
    fn from(p: OutlookProvider) -> Self {
        Provider::Outlook(p)
    }
}

impl From<YahooProvider> for Provider {
    fn from(p: YahooProvider) -> Self {
        Provider::Yahoo(p)
    }
}

#[async_trait]
impl MailProvider for Provider {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn is_applicable(&self, location: &Url) -> bool {
        self.inner().is_applicable(location)
    }

    async fn is_ready(&self, doc: &dyn Document) -> Result<bool, AutomationError> {
        self.inner().is_ready(doc).await
    }

    async fn select_all(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        self.inner().select_all(doc).await
    }

    async fn mark_as_read(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        self.inner().mark_as_read(doc).await
    }

    async fn deselect_all(&self, doc: &dyn Document) -> Result<(), AutomationError> {
        self.inner().deselect_all(doc).await
    }
}
