//! Provider registration for ReadAll.

use tracing::{debug, info};

use readall_config::{Config, KNOWN_PROVIDERS};
use readall_core::{GmailProvider, OutlookProvider, Provider, ProviderRegistry, YahooProvider};

/// Build the registry in catalog order, skipping providers the config disables.
pub(crate) fn build_registry(config: &Config) -> ProviderRegistry {
    let timings = config.timing.to_timings();
    let mut providers: Vec<Provider> = Vec::with_capacity(KNOWN_PROVIDERS.len());

    for name in KNOWN_PROVIDERS {
        let settings = config.provider(name);
        if !settings.enabled {
            info!("Provider {} disabled by configuration", name);
            continue;
        }

        let provider: Provider = match *name {
            "gmail" => {
                GmailProvider::new(timings.clone(), settings.select_scope.unwrap_or_default()).into()
            }
            "outlook" => OutlookProvider::new(timings.clone()).into(),
            "yahoo" => YahooProvider::new(timings.clone()).into(),
            _ => continue,
        };
        debug!("Registered provider {}", name);
        providers.push(provider);
    }

    ProviderRegistry::new(providers)
}
