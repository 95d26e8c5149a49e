//! Commands that talk to the browser.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::{info, warn};
use url::Url;

use readall_config::Config;
use readall_core::{Automation, Provider, ProviderRegistry, WorkflowOutcome};
use readall_dom_cdp::{CdpClient, CdpDocument, PageInfo};
use readall_protocols::MailProvider;

use crate::adapters::{ConsoleNotifier, ConsoleTrigger};

/// The provider `page` resolves to, if any.
fn provider_for<'a>(registry: &'a ProviderRegistry, page: &PageInfo) -> Option<&'a Provider> {
    let url = Url::parse(&page.url).ok()?;
    registry.resolve(&url)
}

/// First tab a provider answers to, narrowed to URLs containing `target`
/// when one is given.
pub(crate) fn select_page<'a>(
    pages: &'a [PageInfo],
    registry: &ProviderRegistry,
    target: &str,
) -> Option<&'a PageInfo> {
    pages
        .iter()
        .filter(|p| p.is_page())
        .filter(|p| target.is_empty() || p.url.contains(target))
        .find(|p| provider_for(registry, p).is_some())
}

async fn connect(config: &Config) -> Result<CdpClient> {
    let client = CdpClient::connect(&config.browser.endpoint)
        .await
        .with_context(|| format!("Failed to connect to {}", config.browser.endpoint))?;
    info!("Connected to {}", client.browser());
    Ok(client)
}

/// Attach to the matching tab and run the workflow once.
pub(crate) async fn run(config: &Config, registry: ProviderRegistry) -> Result<ExitCode> {
    let client = connect(config).await?;
    let pages = client.list_pages().await.context("Failed to list tabs")?;

    let Some(page) = select_page(&pages, &registry, &config.browser.target) else {
        if config.browser.target.is_empty() {
            bail!("No open tab belongs to a supported webmail provider");
        }
        bail!(
            "No supported webmail tab matches \"{}\"",
            config.browser.target
        );
    };
    info!("Driving tab \"{}\" ({})", page.title, page.url);

    let session = client.attach_page(&page.id).await?;
    let doc = CdpDocument::attach(session).await?;

    let automation = Automation::new(
        registry,
        config.timing.to_timings(),
        Arc::new(ConsoleTrigger::default()),
        Arc::new(ConsoleNotifier),
    );

    let Some(provider) = automation.initialize(&doc).await? else {
        return Ok(ExitCode::SUCCESS);
    };

    let report = automation.run(provider, &doc).await;
    info!(transitions = ?report.transitions, "Workflow finished");

    Ok(match report.outcome {
        WorkflowOutcome::Completed => ExitCode::SUCCESS,
        WorkflowOutcome::Failed(_) => ExitCode::FAILURE,
        WorkflowOutcome::AlreadyRunning => {
            warn!("A run was already in flight");
            ExitCode::FAILURE
        }
    })
}

/// List tabs with their provider and readiness.
pub(crate) async fn detect(config: &Config, registry: &ProviderRegistry) -> Result<()> {
    let client = connect(config).await?;
    let pages = client.list_pages().await.context("Failed to list tabs")?;
    let target = &config.browser.target;

    println!("{:<10} {:<10} URL", "PROVIDER", "STATUS");
    for page in pages.iter().filter(|p| p.is_page()) {
        if !target.is_empty() && !page.url.contains(target.as_str()) {
            continue;
        }

        let Some(provider) = provider_for(registry, page) else {
            println!("{:<10} {:<10} {}", "-", "-", page.url);
            continue;
        };

        let status = match check_ready(&client, &page.id, provider).await {
            Ok(true) => "ready".to_string(),
            Ok(false) => "not ready".to_string(),
            Err(e) => {
                warn!("Readiness lookup failed for {}: {:#}", page.url, e);
                "error".to_string()
            }
        };
        println!("{:<10} {:<10} {}", provider.name(), status, page.url);
    }

    Ok(())
}

async fn check_ready(client: &CdpClient, target_id: &str, provider: &Provider) -> Result<bool> {
    let session = client.attach_page(target_id).await?;
    let doc = CdpDocument::attach(session).await?;
    Ok(provider.is_ready(&doc).await?)
}

/// Print registry order and host fragments.
pub(crate) fn print_providers(registry: &ProviderRegistry) {
    if registry.is_empty() {
        println!("No providers enabled.");
        return;
    }
    for (i, provider) in registry.providers().iter().enumerate() {
        println!("{}. {:<8} {}", i + 1, provider.name(), provider.hosts().join(", "));
    }
}

#[cfg(test)]
mod tests {
    use readall_core::Timings;

    use super::*;

    fn page(id: &str, kind: &str, url: &str) -> PageInfo {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "type": kind,
            "title": id,
            "url": url,
        }))
        .unwrap()
    }

    fn tabs() -> Vec<PageInfo> {
        vec![
            page("sw", "service_worker", "https://mail.google.com/sw.js"),
            page("news", "page", "https://news.example.com/"),
            page("outlook", "page", "https://outlook.live.com/mail/0/inbox"),
            page("gmail", "page", "https://mail.google.com/mail/u/0/#inbox"),
        ]
    }

    #[test]
    fn test_first_supported_tab_wins() {
        let registry = ProviderRegistry::with_defaults(Timings::default());
        let pages = tabs();
        let chosen = select_page(&pages, &registry, "").unwrap();
        assert_eq!(chosen.id, "outlook");
    }

    #[test]
    fn test_target_narrows_selection() {
        let registry = ProviderRegistry::with_defaults(Timings::default());
        let pages = tabs();
        assert_eq!(select_page(&pages, &registry, "google").unwrap().id, "gmail");
        assert!(select_page(&pages, &registry, "news").is_none());
        assert!(select_page(&pages, &registry, "yahoo").is_none());
    }

    #[test]
    fn test_no_supported_tab() {
        let registry = ProviderRegistry::with_defaults(Timings::default());
        let pages = vec![page("news", "page", "https://news.example.com/")];
        assert!(select_page(&pages, &registry, "").is_none());
    }
}
