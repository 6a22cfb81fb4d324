use std::process::{Command, Stdio};

use anyhow::{Context, Result};

use crate::wizard::AuthLauncher;

/// Opens URLs through the OS default browser. The spawned opener is
/// fire-and-forget; the wizard only learns about the authorization
/// outcome through the backend callback exchange.
pub struct BrowserLauncher;

#[cfg(target_os = "macos")]
const OPENER: &[&str] = &["open"];
#[cfg(target_os = "windows")]
const OPENER: &[&str] = &["cmd", "/C", "start", ""];
#[cfg(not(any(target_os = "macos", target_os = "windows")))]
const OPENER: &[&str] = &["xdg-open"];

impl AuthLauncher for BrowserLauncher {
    fn open(&self, url: &str) -> Result<()> {
        let (bin, args) = OPENER
            .split_first()
            .context("no opener configured for this platform")?;

        Command::new(bin)
            .args(args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("Failed to run `{bin}`"))?;
        Ok(())
    }
}
