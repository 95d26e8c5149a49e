//! Chrome DevTools Protocol (CDP) client.
//!
//! Talks to the user's own Chrome over the remote-debugging WebSocket so the
//! automation runs inside an already logged-in webmail tab.
//!
//! ```bash
//! chrome --remote-debugging-port=9222
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::PageSession;
