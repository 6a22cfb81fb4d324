//! The connection wizard: a six-step flow that takes a merchant from
//! "connect Google Ads" to a first completed sync.
//!
//! [`WizardController`] owns the state machine and exposes one method
//! per user-initiated transition; [`poller`] watches the first sync run
//! while the wizard sits on the syncing step.

mod controller;
mod poller;
mod state;


pub use controller::{AuthLauncher, DEFAULT_POLL_INTERVAL, WizardController};
pub use poller::SYNC_FAILED_MESSAGE;
pub use state::{
    ACCEPTED_FREQUENCIES, BackfillRange, DEFAULT_FREQUENCY, SyncProgress, SyncSettings,
    SyncSettingsUpdate, WizardState, WizardStep, map_frequency,
};

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock the shared state, recovering from poisoning: the state is plain
/// data and every writer leaves it internally consistent.
pub(crate) fn lock(state: &Mutex<WizardState>) -> MutexGuard<'_, WizardState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}
