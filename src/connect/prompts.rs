use anyhow::{Context, Result};
use dialoguer::{Confirm, Input, MultiSelect, Select};

use super::view::print_bullet;
use crate::api::AdAccount;
use crate::catalog::{self, Platform};
use crate::wizard::BackfillRange;

pub fn select_platform() -> Result<Platform> {
    let platforms = catalog::catalog();
    let labels: Vec<String> = platforms
        .iter()
        .map(|p| format!("{}  ({})", p.display_name, p.category))
        .collect();

    let index = Select::new()
        .with_prompt("  Which platform do you want to connect?")
        .items(&labels)
        .default(0)
        .interact()
        .context("Failed to read platform choice")?;

    Ok(platforms[index].clone())
}

pub fn confirm_intro(platform: &Platform) -> Result<bool> {
    print_bullet(&format!(
        "You are about to connect {} to your analytics workspace.",
        platform.display_name
    ));
    print_bullet("You will be sent to the platform to authorize access.");
    println!();

    Confirm::new()
        .with_prompt("  Continue?")
        .default(true)
        .interact()
        .context("Failed to read confirmation")
}

/// The provider redirects to the backend, which shows the merchant a
/// code/state pair to paste back here.
pub fn prompt_oauth_callback() -> Result<(String, String)> {
    print_bullet("After authorizing, copy the code and state shown on the redirect page.");
    println!();

    let code: String = Input::new()
        .with_prompt("  Authorization code")
        .interact_text()
        .context("Failed to read authorization code")?;

    let state: String = Input::new()
        .with_prompt("  State")
        .interact_text()
        .context("Failed to read state")?;

    Ok((code.trim().to_string(), state.trim().to_string()))
}

pub fn confirm_retry(action: &str) -> Result<bool> {
    Confirm::new()
        .with_prompt(format!("  {action} failed. Try again?"))
        .default(true)
        .interact()
        .context("Failed to read confirmation")
}

/// Returns the ids of the chosen accounts. Pre-checks the current
/// selection so the backend's default-enabled accounts start checked.
pub fn select_accounts(accounts: &[AdAccount], selected: &[String]) -> Result<Vec<String>> {
    if accounts.is_empty() {
        print_bullet("No ad accounts were found for this connection yet.");
        print_bullet("You can still proceed; accounts can be enabled later.");
        return Ok(Vec::new());
    }

    let labels: Vec<String> = accounts
        .iter()
        .map(|a| format!("{}  ({})", a.name, a.external_id))
        .collect();
    let defaults: Vec<bool> = accounts
        .iter()
        .map(|a| selected.contains(&a.id))
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt("  Which ad accounts should sync? (space toggles, enter confirms)")
        .items(&labels)
        .defaults(&defaults)
        .interact()
        .context("Failed to read account selection")?;

    Ok(chosen.into_iter().map(|i| accounts[i].id.clone()).collect())
}

const BACKFILL_CHOICES: [(BackfillRange, &str); 4] = [
    (BackfillRange::Last30Days, "Last 30 days"),
    (BackfillRange::Last90Days, "Last 90 days (recommended)"),
    (BackfillRange::Last180Days, "Last 180 days"),
    (BackfillRange::Last365Days, "Last 365 days"),
];

pub fn select_backfill() -> Result<BackfillRange> {
    let labels: Vec<&str> = BACKFILL_CHOICES.iter().map(|(_, label)| *label).collect();
    let index = Select::new()
        .with_prompt("  How much history should the first sync import?")
        .items(&labels)
        .default(1)
        .interact()
        .context("Failed to read backfill choice")?;
    Ok(BACKFILL_CHOICES[index].0)
}

pub fn select_frequency() -> Result<String> {
    let labels = ["Hourly", "Daily (recommended)", "Weekly"];
    let values = ["hourly", "daily", "weekly"];
    let index = Select::new()
        .with_prompt("  How often should data sync after that?")
        .items(&labels)
        .default(1)
        .interact()
        .context("Failed to read frequency choice")?;
    Ok(values[index].to_string())
}
