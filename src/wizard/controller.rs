use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::api::ConnectApi;
use crate::catalog::Platform;
use crate::error::{SyncError, WizardError};

use super::poller::{self, PollerHandle};
use super::state::{SyncSettingsUpdate, WizardState, WizardStep, map_frequency};

/// How often the sync poller asks the backend for status.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

// Fixed fallback messages, used when a transport failure leaves us with
// nothing user-presentable.
const FALLBACK_START_AUTH: &str = "Failed to start authorization";
const FALLBACK_COMPLETE_AUTH: &str = "Authorization failed";
const FALLBACK_SAVE_ACCOUNTS: &str = "Failed to save account selection";
const FALLBACK_SAVE_SYNC_CONFIG: &str = "Failed to save sync configuration";
const FALLBACK_TRIGGER_SYNC: &str = "Failed to start sync";

/// Opens the platform's authorization URL in an external browser
/// context. A blocked or failed launch is recoverable: the wizard stays
/// on the oauth step and the user retries.
pub trait AuthLauncher: Send + Sync {
    fn open(&self, url: &str) -> anyhow::Result<()>;
}

/// Owns [`WizardState`] and drives every transition of the connection
/// flow. No method propagates an error to the caller; failures are
/// recorded in `state.error`, scoped to the current step, and cleared
/// at the start of the next attempted transition.
pub struct WizardController {
    state: Arc<Mutex<WizardState>>,
    api: Arc<dyn ConnectApi>,
    launcher: Arc<dyn AuthLauncher>,
    poll_interval: Duration,
    poller: Option<PollerHandle>,
}

impl WizardController {
    pub fn new(api: Arc<dyn ConnectApi>, launcher: Arc<dyn AuthLauncher>) -> Self {
        Self {
            state: Arc::new(Mutex::new(WizardState::default())),
            api,
            launcher,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poller: None,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Cloned snapshot of the current state, for rendering.
    pub fn state(&self) -> WizardState {
        super::lock(&self.state).clone()
    }

    // ── Session lifecycle ─────────────────────────────────────────

    /// Begin a fresh session for `platform`. Fully replaces any prior
    /// state; the step is the intro.
    pub fn initialize(&mut self, platform: Platform) {
        self.stop_polling();
        *super::lock(&self.state) = WizardState::for_platform(platform);
    }

    /// Cancel any active polling and restore the initial empty state.
    pub fn reset(&mut self) {
        self.stop_polling();
        *super::lock(&self.state) = WizardState::default();
    }

    // ── Forward transitions ───────────────────────────────────────

    /// `intro → oauth`. Pure; no backend call.
    pub fn proceed_from_intro(&self) {
        let mut state = super::lock(&self.state);
        state.error = None;
        if state.step == WizardStep::Intro {
            state.step = WizardStep::Oauth;
        }
    }

    /// Request an authorization URL and CSRF token from the backend and
    /// open the URL externally. The step does not advance; the flow
    /// resumes when the provider redirects back and
    /// [`handle_oauth_complete`](Self::handle_oauth_complete) is called.
    pub async fn start_oauth(&self) {
        let platform_id = {
            let mut state = super::lock(&self.state);
            state.error = None;
            let Some(platform_id) = state.platform.as_ref().map(|p| p.id.clone()) else {
                state.error = Some(WizardError::NoPlatform.to_string());
                return;
            };
            state.loading = true;
            platform_id
        };

        match self.start_oauth_inner(&platform_id).await {
            Ok(()) => super::lock(&self.state).loading = false,
            Err(e) => self.fail(&e, FALLBACK_START_AUTH),
        }
    }

    async fn start_oauth_inner(&self, platform_id: &str) -> Result<(), SyncError> {
        let initiation = self.api.initiate_oauth(platform_id).await?;

        // Store the CSRF token before launching: the user can still
        // complete manually if the window fails to open.
        super::lock(&self.state).oauth_state = Some(initiation.state);

        self.launcher
            .open(&initiation.authorization_url)
            .map_err(|e| WizardError::LaunchFailed(e.to_string()))?;
        Ok(())
    }

    /// Exchange the authorization code and CSRF token for a connection.
    /// Advances to the accounts step for account-bearing platforms,
    /// straight to sync configuration otherwise.
    pub async fn handle_oauth_complete(&self, code: &str, returned_state: &str) {
        {
            let mut state = super::lock(&self.state);
            state.error = None;
            state.loading = true;
        }

        let outcome = match self.api.complete_oauth(code, returned_state).await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.fail(&e.into(), FALLBACK_COMPLETE_AUTH);
                return;
            }
        };

        let connection_id = match (outcome.success, outcome.connection_id) {
            (true, Some(id)) => id,
            (_, _) => {
                let mut state = super::lock(&self.state);
                state.loading = false;
                state.error =
                    Some(outcome.error.unwrap_or_else(|| FALLBACK_COMPLETE_AUTH.into()));
                return;
            }
        };

        let account_bearing = {
            let mut state = super::lock(&self.state);
            let account_bearing = state.account_bearing();
            state.connection_id = Some(connection_id.clone());
            state.step = WizardStep::next_after_auth(account_bearing);
            state.loading = false;
            account_bearing
        };

        if account_bearing {
            // A failed account fetch does not block progression; the
            // accounts step renders empty and the user can proceed.
            match self.api.list_accounts(&connection_id).await {
                Ok(accounts) => {
                    let mut state = super::lock(&self.state);
                    state.selected_account_ids = accounts
                        .iter()
                        .filter(|a| a.is_enabled)
                        .map(|a| a.id.clone())
                        .collect();
                    state.accounts = accounts;
                }
                Err(e) => {
                    tracing::warn!(error = %e, %connection_id, "failed to load ad accounts");
                }
            }
        }
    }

    // ── Account selection (pure local mutations) ──────────────────

    pub fn toggle_account(&self, account_id: &str) {
        let mut state = super::lock(&self.state);
        state.error = None;
        if let Some(pos) = state
            .selected_account_ids
            .iter()
            .position(|id| id == account_id)
        {
            state.selected_account_ids.remove(pos);
        } else {
            state.selected_account_ids.push(account_id.to_string());
        }
    }

    pub fn select_all_accounts(&self) {
        let mut state = super::lock(&self.state);
        state.error = None;
        state.selected_account_ids = state.accounts.iter().map(|a| a.id.clone()).collect();
    }

    pub fn deselect_all_accounts(&self) {
        let mut state = super::lock(&self.state);
        state.error = None;
        state.selected_account_ids.clear();
    }

    /// Persist the selected accounts for the connection, then advance to
    /// sync configuration.
    pub async fn confirm_accounts(&self) {
        let (connection_id, account_ids) = {
            let mut state = super::lock(&self.state);
            state.error = None;
            let Some(connection_id) = state.connection_id.clone() else {
                state.error = Some(WizardError::MissingConnection.to_string());
                return;
            };
            state.loading = true;
            (connection_id, state.selected_account_ids.clone())
        };

        match self
            .api
            .update_selected_accounts(&connection_id, &account_ids)
            .await
        {
            Ok(()) => {
                let mut state = super::lock(&self.state);
                state.loading = false;
                state.step = WizardStep::SyncConfig;
            }
            Err(e) => self.fail(&e.into(), FALLBACK_SAVE_ACCOUNTS),
        }
    }

    /// Merge a partial update into the sync settings. Pure; no backend call.
    pub fn update_sync_config(&self, update: SyncSettingsUpdate) {
        let mut state = super::lock(&self.state);
        state.error = None;
        if let Some(backfill) = update.backfill {
            state.sync_settings.backfill = backfill;
        }
        if let Some(frequency) = update.frequency {
            state.sync_settings.frequency = frequency;
        }
        if let Some(metrics) = update.enabled_metrics {
            state.sync_settings.enabled_metrics = metrics;
        }
    }

    /// Submit the sync configuration, trigger the first sync run, advance
    /// to the syncing step and start polling. Either backend call failing
    /// aborts the transition.
    pub async fn confirm_sync_config(&mut self) {
        let (connection_id, frequency) = {
            let mut state = super::lock(&self.state);
            state.error = None;
            let Some(connection_id) = state.connection_id.clone() else {
                state.error = Some(WizardError::MissingConnection.to_string());
                return;
            };
            state.loading = true;
            (connection_id, map_frequency(&state.sync_settings.frequency))
        };

        if let Err(e) = self.api.update_sync_config(&connection_id, frequency).await {
            self.fail(&e.into(), FALLBACK_SAVE_SYNC_CONFIG);
            return;
        }

        if let Err(e) = self.api.trigger_sync(&connection_id).await {
            self.fail(&e.into(), FALLBACK_TRIGGER_SYNC);
            return;
        }

        {
            let mut state = super::lock(&self.state);
            state.loading = false;
            state.progress = None;
            state.step = WizardStep::Syncing;
        }
        self.start_polling(connection_id);
    }

    // ── Backward transition ───────────────────────────────────────

    /// Move to the preceding step, skipping the accounts step for
    /// platforms without account selection. No-op at the intro. The
    /// poller follows the step: stopped when leaving `Syncing`, started
    /// again when stepping back into it.
    pub fn go_back(&mut self) {
        let (was_syncing, resume_polling) = {
            let mut state = super::lock(&self.state);
            state.error = None;
            let was_syncing = state.step == WizardStep::Syncing;
            state.step = state.step.previous(state.account_bearing());
            let resume_polling = (state.step == WizardStep::Syncing)
                .then(|| state.connection_id.clone())
                .flatten();
            (was_syncing, resume_polling)
        };
        if let Some(connection_id) = resume_polling {
            self.start_polling(connection_id);
        } else if was_syncing {
            self.stop_polling();
        }
    }

    // ── Polling lifecycle ─────────────────────────────────────────

    fn start_polling(&mut self, connection_id: String) {
        self.stop_polling();
        self.poller = Some(poller::spawn(
            Arc::clone(&self.state),
            Arc::clone(&self.api),
            connection_id,
            self.poll_interval,
        ));
    }

    fn stop_polling(&mut self) {
        if let Some(handle) = self.poller.take() {
            handle.cancel();
        }
    }

    // ── Failure surfacing ─────────────────────────────────────────

    /// Record a failure in `state.error`. Backend rejections and
    /// transport failures surface the caught error's message; local
    /// precondition and launcher failures are already user-facing text;
    /// the per-action fallback covers errors with no message of their own.
    fn fail(&self, err: &SyncError, fallback: &str) {
        tracing::warn!(error = %err, "wizard transition failed");
        let message = match err {
            SyncError::Api(api) => {
                let text = api.to_string();
                if text.is_empty() { fallback.to_string() } else { text }
            }
            SyncError::Wizard(w) => w.to_string(),
            _ => fallback.to_string(),
        };
        let mut state = super::lock(&self.state);
        state.loading = false;
        state.error = Some(message);
    }
}

impl Drop for WizardController {
    fn drop(&mut self) {
        // Teardown must not leave an orphaned poller behind.
        self.stop_polling();
    }
}
