//! Sync progress poller, active only while the wizard sits on the
//! syncing step.
//!
//! One immediate status request, then a fixed cadence. Transient
//! request failures are swallowed (the next tick retries); an explicit
//! failed status from the backend is terminal and stops the loop. Any
//! step change or reset cancels the task through its token.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::{ConnectApi, SyncStatusSnapshot};

use super::state::{SyncProgress, WizardState, WizardStep};

/// Fixed user-facing message for a sync run the backend reports as failed.
pub const SYNC_FAILED_MESSAGE: &str = "Sync failed. Check the connection and try again.";

/// Handle tied 1:1 to a running poll task. Cancelling is idempotent.
pub(super) struct PollerHandle {
    token: CancellationToken,
    #[allow(dead_code)]
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub(super) fn cancel(&self) {
        self.token.cancel();
    }
}

pub(super) fn spawn(
    state: Arc<Mutex<WizardState>>,
    api: Arc<dyn ConnectApi>,
    connection_id: String,
    period: Duration,
) -> PollerHandle {
    let token = CancellationToken::new();
    let task = tokio::spawn(run(state, api, connection_id, period, token.clone()));
    PollerHandle { token, task }
}

enum PollVerdict {
    Completed,
    Failed,
    InProgress,
}

fn classify(snapshot: &SyncStatusSnapshot) -> PollVerdict {
    let last_run = snapshot.last_sync_status.as_deref().unwrap_or_default();
    if snapshot.status == "completed" || last_run == "succeeded" {
        PollVerdict::Completed
    } else if snapshot.status == "failed" || last_run == "failed" {
        PollVerdict::Failed
    } else {
        PollVerdict::InProgress
    }
}

async fn run(
    state: Arc<Mutex<WizardState>>,
    api: Arc<dyn ConnectApi>,
    connection_id: String,
    period: Duration,
    token: CancellationToken,
) {
    // The first tick fires immediately, giving the one up-front request.
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            () = token.cancelled() => break,
            _ = ticker.tick() => {}
        }
        if token.is_cancelled() {
            break;
        }

        {
            let state = super::lock(&state);
            if state.step != WizardStep::Syncing {
                break;
            }
        }

        let snapshot = match api.sync_state(&connection_id).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::debug!(error = %e, %connection_id, "sync status poll failed; retrying");
                continue;
            }
        };

        let mut state = super::lock(&state);
        if state.step != WizardStep::Syncing {
            // Step changed while the request was in flight.
            break;
        }

        match classify(&snapshot) {
            PollVerdict::Completed => {
                let mut progress = SyncProgress::from(snapshot);
                progress.percent_complete = 100.0;
                state.progress = Some(progress);
                state.loading = false;
                state.error = None;
                state.step = WizardStep::Success;
                break;
            }
            PollVerdict::Failed => {
                state.progress = Some(SyncProgress::from(snapshot));
                state.loading = false;
                state.error = Some(SYNC_FAILED_MESSAGE.into());
                break;
            }
            PollVerdict::InProgress => {
                state.progress = Some(SyncProgress::from(snapshot));
            }
        }
    }
}
