//! Provider registry.

use tracing::debug;
use url::Url;

use readall_protocols::MailProvider;

use crate::providers::{GmailProvider, OutlookProvider, Provider, SelectScope, YahooProvider};
use crate::timing::Timings;

/// Ordered, fixed list of providers.
#[derive(Debug, Clone, Default)]
pub struct ProviderRegistry {
    providers: Vec<Provider>,
}

impl ProviderRegistry {
    /// Create a registry resolving in the given order.
    pub fn new(providers: Vec<Provider>) -> Self {
        Self { providers }
    }

    /// Gmail, Outlook and Yahoo with shared timings.
    pub fn with_defaults(timings: Timings) -> Self {
        Self::new(vec![
            GmailProvider::new(timings.clone(), SelectScope::default()).into(),
            OutlookProvider::new(timings.clone()).into(),
            YahooProvider::new(timings).into(),
        ])
    }

    /// First provider applicable to `location`. Order is the tie-break.
    pub fn resolve(&self, location: &Url) -> Option<&Provider> {
        let found = self.providers.iter().find(|p| p.is_applicable(location));
        match found {
            Some(provider) => debug!("Resolved {} for {}", provider.name(), location),
            None => debug!("No provider for {}", location),
        }
        found
    }

    /// Providers in resolution order.
    pub fn providers(&self) -> &[Provider] {
        &self.providers
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_registry_default_is_empty() {
        let registry = ProviderRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.resolve(&url("https://mail.google.com/")).is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let registry = ProviderRegistry::with_defaults(Timings::default());
        assert_eq!(registry.len(), 3);

        let cases = [
            ("https://mail.google.com/mail/u/0/#inbox", Some("Gmail")),
            ("https://outlook.office.com/mail/", Some("Outlook")),
            ("https://mail.yahoo.com/d/folders/1", Some("Yahoo")),
            ("https://example.com/", None),
        ];
        for (location, expected) in cases {
            let resolved = registry.resolve(&url(location)).map(|p| p.name());
            assert_eq!(resolved, expected, "{location}");
        }
    }

    #[test]
    fn test_first_match_wins() {
        let registry = ProviderRegistry::new(vec![
            GmailProvider::new(Timings::default(), SelectScope::FullHistory).into(),
            GmailProvider::default().into(),
        ]);
        let Some(Provider::Gmail(gmail)) = registry.resolve(&url("https://mail.google.com/")) else {
            panic!("expected Gmail");
        };
        assert_eq!(gmail.scope(), SelectScope::FullHistory);
    }
}
