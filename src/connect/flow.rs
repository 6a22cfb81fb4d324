use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};

use super::launcher::BrowserLauncher;
use super::prompts::{
    confirm_intro, confirm_retry, prompt_oauth_callback, select_accounts, select_backfill,
    select_frequency, select_platform,
};
use super::view::{
    print_bullet, print_error, print_progress, print_step, print_success, print_summary,
    print_welcome_banner,
};
use crate::api::{ConnectApi, HttpConnectApi};
use crate::catalog;
use crate::config::Config;
use crate::wizard::{SyncSettingsUpdate, WizardController, WizardStep};

const TOTAL_STEPS: u8 = 4;

fn build_api(config: &Config) -> Result<Arc<HttpConnectApi>> {
    if config.api_token.is_none() {
        bail!(
            "No API token configured. Set SOURCESYNC_API_TOKEN or add api_token to {}",
            config.config_path.display()
        );
    }
    Ok(Arc::new(HttpConnectApi::new(
        &config.api_base_url,
        config.api_token.as_deref(),
    )?))
}

/// Drive the connection wizard end to end in the terminal.
pub async fn run_connect(config: &Config, platform_id: Option<&str>) -> Result<()> {
    let platform = match platform_id {
        Some(id) => catalog::find(id)
            .ok_or_else(|| anyhow::anyhow!("Unknown platform '{id}'. Run `sourcesync platforms`."))?,
        None => {
            print_welcome_banner();
            select_platform()?
        }
    };

    let api = build_api(config)?;
    let mut controller = WizardController::new(api, Arc::new(BrowserLauncher))
        .with_poll_interval(config.poll_interval());
    controller.initialize(platform.clone());

    // ── Intro ─────────────────────────────────────────────────────
    print_step(1, TOTAL_STEPS, &format!("Connect {}", platform.display_name));
    if !confirm_intro(&platform)? {
        return Ok(());
    }
    controller.proceed_from_intro();

    // ── Authorization ─────────────────────────────────────────────
    loop {
        controller.start_oauth().await;
        if let Some(error) = controller.state().error {
            print_error(&error);
            if confirm_retry("Authorization")? {
                continue;
            }
            return Ok(());
        }

        print_success("Authorization window opened.");
        let (code, state) = prompt_oauth_callback()?;
        controller.handle_oauth_complete(&code, &state).await;
        match controller.state().error {
            Some(error) => {
                print_error(&error);
                if !confirm_retry("Authorization")? {
                    return Ok(());
                }
            }
            None => break,
        }
    }

    // ── Account selection (ads platforms only) ────────────────────
    if controller.state().step == WizardStep::Accounts {
        print_step(2, TOTAL_STEPS, "Select ad accounts");
        loop {
            let state = controller.state();
            let chosen = select_accounts(&state.accounts, &state.selected_account_ids)?;
            controller.deselect_all_accounts();
            for id in &chosen {
                controller.toggle_account(id);
            }

            controller.confirm_accounts().await;
            match controller.state().error {
                Some(error) => {
                    print_error(&error);
                    if !confirm_retry("Saving the selection")? {
                        return Ok(());
                    }
                }
                None => break,
            }
        }
    }

    // ── Sync configuration ────────────────────────────────────────
    print_step(3, TOTAL_STEPS, "Sync settings");
    controller.update_sync_config(SyncSettingsUpdate {
        backfill: Some(select_backfill()?),
        frequency: Some(select_frequency()?),
        enabled_metrics: None,
    });
    controller.confirm_sync_config().await;
    if let Some(error) = controller.state().error {
        print_error(&error);
        bail!("Could not start the first sync");
    }

    // ── First sync ────────────────────────────────────────────────
    print_step(4, TOTAL_STEPS, "First sync");
    print_bullet("Importing historical data. This can take a few minutes.");
    println!();

    let mut last_reported = -1.0_f32;
    loop {
        let state = controller.state();

        if let Some(progress) = &state.progress {
            if (progress.percent_complete - last_reported).abs() > f32::EPSILON {
                print_progress(progress);
                last_reported = progress.percent_complete;
            }
        }

        if state.step == WizardStep::Success {
            print_summary(&state);
            return Ok(());
        }
        if let Some(error) = state.error {
            print_error(&error);
            bail!("First sync did not complete");
        }

        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

/// Print the sync state of an existing connection, optionally watching
/// until the run reaches a terminal status.
pub async fn watch_sync_status(config: &Config, connection_id: &str, watch: bool) -> Result<()> {
    let api = build_api(config)?;

    loop {
        let snapshot = api.sync_state(connection_id).await?;
        let percent = snapshot.percent_complete.unwrap_or(0.0);
        let last_run = snapshot.last_sync_status.as_deref().unwrap_or("-");
        println!(
            "{:<12} {:>5.1}%  stream: {:<20} last run: {}",
            snapshot.status,
            percent,
            snapshot.current_stream.as_deref().unwrap_or("-"),
            last_run
        );
        if let Some(message) = &snapshot.message {
            println!("  {message}");
        }

        let terminal = matches!(snapshot.status.as_str(), "completed" | "failed")
            || matches!(last_run, "succeeded" | "failed");
        if !watch || terminal {
            return Ok(());
        }
        tokio::time::sleep(config.poll_interval()).await;
    }
}
