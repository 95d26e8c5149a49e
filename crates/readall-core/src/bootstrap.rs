//! Page bootstrap: pick the provider for the current page and wait for it.

use std::sync::Arc;

use tracing::{info, warn};

use readall_protocols::{AutomationError, Document, MailProvider, Notifier, TriggerControl};

use crate::orchestrator::{Orchestrator, WorkflowReport};
use crate::providers::Provider;
use crate::registry::ProviderRegistry;
use crate::timing::Timings;

/// Registry and orchestrator wired to the same sinks.
pub struct Automation {
    registry: ProviderRegistry,
    orchestrator: Orchestrator,
    notifier: Arc<dyn Notifier>,
}

impl Automation {
    pub fn new(
        registry: ProviderRegistry,
        timings: Timings,
        trigger: Arc<dyn TriggerControl>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            registry,
            orchestrator: Orchestrator::new(timings, trigger, notifier.clone()),
            notifier,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Resolve the provider for `doc` and wait until its list has rendered.
    ///
    /// `Ok(None)` means "do nothing": either no provider answers to this page
    /// or its readiness marker never showed up. Only the location is read
    /// when no provider matches.
    pub async fn initialize(
        &self,
        doc: &dyn Document,
    ) -> Result<Option<&Provider>, AutomationError> {
        let location = doc.location().await?;
        let Some(provider) = self.registry.resolve(&location) else {
            info!("No provider for {}", location);
            self.notifier.info("No matching provider found for this page.");
            return Ok(None);
        };

        self.notifier
            .info(&format!("Initializing for {}...", provider.name()));
        if !provider.is_ready(doc).await? {
            warn!("{} did not become ready", provider.name());
            self.notifier.info("Timeout waiting for provider to be ready.");
            return Ok(None);
        }

        info!("{} ready", provider.name());
        Ok(Some(provider))
    }

    /// Run the workflow with an already initialized provider.
    pub async fn run(&self, provider: &Provider, doc: &dyn Document) -> WorkflowReport {
        self.orchestrator.run(provider, doc).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::*;
    use crate::dom::{element, MemoryDocument};
    use crate::notify::{RecordingNotifier, RecordingTrigger};

    fn automation() -> (Automation, Arc<RecordingNotifier>) {
        let notifier = Arc::new(RecordingNotifier::new());
        let automation = Automation::new(
            ProviderRegistry::with_defaults(Timings::default()),
            Timings::default(),
            Arc::new(RecordingTrigger::new()),
            notifier.clone(),
        );
        (automation, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn test_unmatched_page_reads_location_only() {
        let (automation, notifier) = automation();
        let doc = MemoryDocument::at("https://example.com/inbox").unwrap();
        let before = doc.mutation_count();

        let provider = automation.initialize(&doc).await.unwrap();

        assert!(provider.is_none());
        assert_eq!(notifier.messages(), vec!["No matching provider found for this page."]);
        assert_eq!(doc.mutation_count(), before);
        assert_eq!(doc.observer_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ready_provider_is_returned() {
        let (automation, notifier) = automation();
        let doc = MemoryDocument::at("https://mail.yahoo.com/d/folders/1").unwrap();
        doc.append_to_body(element("div").attr("data-test-id", "virtual-list"));

        let provider = automation.initialize(&doc).await.unwrap();

        assert_eq!(provider.map(|p| p.name()), Some("Yahoo"));
        assert_eq!(notifier.messages(), vec!["Initializing for Yahoo..."]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_readiness_timeout_is_not_an_error() {
        let (automation, notifier) = automation();
        let doc = MemoryDocument::at("https://mail.google.com/mail/u/0/").unwrap();
        let start = Instant::now();

        let provider = automation.initialize(&doc).await.unwrap();

        assert!(provider.is_none());
        assert_eq!(start.elapsed(), Duration::from_millis(5000));
        assert_eq!(
            notifier.messages(),
            vec![
                "Initializing for Gmail...",
                "Timeout waiting for provider to be ready."
            ]
        );
    }
}
