//! Interactive merchant-facing connect flow: prompts, console views,
//! and the browser launcher that opens the authorization URL.

pub mod flow;
pub mod launcher;
pub mod prompts;
pub mod view;

pub use flow::{run_connect, watch_sync_status};
pub use launcher::BrowserLauncher;
