use console::style;

use crate::wizard::{SyncProgress, WizardState};

pub fn print_welcome_banner() {
    println!();
    println!("  {}", style("sourcesync — connect a data source").white().bold());
    println!(
        "  {}",
        style("Link your storefront, ad, and messaging platforms to analytics.").dim()
    );
    println!();
}

pub fn print_step(current: u8, total: u8, title: &str) {
    println!();
    println!(
        "  {} {}",
        style(format!("[{current}/{total}]")).cyan().bold(),
        style(title).white().bold()
    );
    println!("  {}", style("─".repeat(50)).dim());
}

pub fn print_bullet(text: &str) {
    println!("  {} {}", style("›").cyan(), text);
}

pub fn print_error(message: &str) {
    println!("  {} {}", style("✗").red().bold(), style(message).red());
}

pub fn print_success(text: &str) {
    println!("  {} {}", style("✓").green().bold(), text);
}

pub fn print_progress(progress: &SyncProgress) {
    let stream = progress
        .current_stream
        .as_deref()
        .map(|s| format!(" ({s})"))
        .unwrap_or_default();
    println!(
        "  {} {:>5.1}% {}{}",
        style("⟳").cyan(),
        progress.percent_complete,
        progress.status,
        style(stream).dim()
    );
}

pub fn print_summary(state: &WizardState) {
    println!();
    println!(
        "  {}",
        style("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━").cyan()
    );
    println!("  ◆  {}", style("Connection ready").white().bold());
    println!(
        "  {}",
        style("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━").cyan()
    );
    println!();

    if let Some(platform) = &state.platform {
        println!("    › Platform:   {}", platform.display_name);
    }
    if let Some(connection_id) = &state.connection_id {
        println!("    › Connection: {connection_id}");
    }
    if !state.selected_account_ids.is_empty() {
        println!(
            "    › Accounts:   {} selected",
            state.selected_account_ids.len()
        );
    }
    println!("    › Backfill:   {}", state.sync_settings.backfill);
    println!("    › Frequency:  {}", state.sync_settings.frequency);
    println!();
    println!(
        "  {}",
        style("First sync complete. Dashboards will populate shortly.").green()
    );
    println!();
}
