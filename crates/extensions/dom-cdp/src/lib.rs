//! # ReadAll DOM over CDP
//!
//! Drives a webmail tab in the user's own Chrome through the DevTools
//! protocol.
//!
//! ## Usage
//!
//! ```text
//! chrome --remote-debugging-port=9222
//! ```
//!
//! ```ignore
//! let client = CdpClient::connect("http://127.0.0.1:9222").await?;
//! let page = client.list_pages().await?.into_iter().find(|p| p.is_page()).unwrap();
//! let doc = CdpDocument::attach(client.attach_page(&page.id).await?).await?;
//! ```

pub mod cdp;
mod document;

pub use cdp::{CdpClient, CdpError, PageInfo, PageSession};
pub use document::CdpDocument;
