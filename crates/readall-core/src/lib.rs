//! # ReadAll Core
//!
//! Automation engine that selects, marks read and deselects every message in
//! a webmail tab.
//!
//! ## Components
//!
//! - [`wait_for`] / [`simulate_click`] - DOM readiness and synthetic input
//! - [`ToolbarLocator`] - Finds the master checkbox among row checkboxes
//! - [`Provider`] - Gmail, Outlook and Yahoo strategies
//! - [`ProviderRegistry`] - Resolves the provider for a page
//! - [`Orchestrator`] - Runs select → mark read → deselect
//! - [`Automation`] - Bootstrap tying registry and orchestrator together
//!
//! [`MemoryDocument`] stands in for a real page in tests.

pub mod bootstrap;
pub mod click;
pub mod controls;
pub mod dom;
pub mod locator;
pub mod notify;
pub mod orchestrator;
pub mod providers;
pub mod registry;
pub mod timing;
pub mod wait;

pub use bootstrap::Automation;
pub use click::simulate_click;
pub use dom::{element, MemoryDocument, MemoryTree};
pub use locator::ToolbarLocator;
pub use notify::{NoticeLevel, RecordingNotifier, RecordingTrigger, TracingNotifier};
pub use orchestrator::{Orchestrator, WorkflowOutcome, WorkflowReport, WorkflowState};
pub use providers::{GmailProvider, OutlookProvider, Provider, SelectScope, YahooProvider};
pub use registry::ProviderRegistry;
pub use timing::Timings;
pub use wait::{poll_until, wait_for};
