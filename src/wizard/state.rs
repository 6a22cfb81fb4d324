//! Wizard state: the step machine and everything it carries.
//!
//! The six steps form a fixed linear order with one conditional skip:
//! platforms without ad-account selection jump straight from
//! authorization to sync configuration, and going back over that gap
//! skips the accounts step again.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::api::{AdAccount, SyncStatusSnapshot};
use crate::catalog::Platform;

// ── Steps ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Intro,
    Oauth,
    Accounts,
    SyncConfig,
    Syncing,
    Success,
}

impl WizardStep {
    /// Step reached after a successful authorization: account-bearing
    /// platforms get the account picker, everything else skips it.
    pub fn next_after_auth(account_bearing: bool) -> Self {
        if account_bearing {
            Self::Accounts
        } else {
            Self::SyncConfig
        }
    }

    /// Predecessor in the fixed ordering, skipping `Accounts` when the
    /// active platform has no account selection. `Intro` is a fixed point.
    pub fn previous(self, account_bearing: bool) -> Self {
        let prev = match self {
            Self::Intro | Self::Oauth => Self::Intro,
            Self::Accounts => Self::Oauth,
            Self::SyncConfig => Self::Accounts,
            Self::Syncing => Self::SyncConfig,
            Self::Success => Self::Syncing,
        };
        if prev == Self::Accounts && !account_bearing {
            Self::Oauth
        } else {
            prev
        }
    }
}

// ── Sync settings ─────────────────────────────────────────────────

/// Historical window to backfill on first sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BackfillRange {
    Last30Days,
    Last90Days,
    Last180Days,
    Last365Days,
}

impl Default for BackfillRange {
    fn default() -> Self {
        Self::Last90Days
    }
}

/// Sync frequencies the backend accepts.
pub const ACCEPTED_FREQUENCIES: [&str; 3] = ["hourly", "daily", "weekly"];

pub const DEFAULT_FREQUENCY: &str = "daily";

/// Map a requested frequency onto the backend's accepted enumeration.
/// Anything unrecognized falls back to daily.
pub fn map_frequency(requested: &str) -> &'static str {
    ACCEPTED_FREQUENCIES
        .iter()
        .find(|f| **f == requested)
        .copied()
        .unwrap_or(DEFAULT_FREQUENCY)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    pub backfill: BackfillRange,
    pub frequency: String,
    /// Reserved: per-metric opt-in is not exposed by the backend yet.
    pub enabled_metrics: Vec<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            backfill: BackfillRange::default(),
            frequency: DEFAULT_FREQUENCY.into(),
            enabled_metrics: Vec::new(),
        }
    }
}

/// Partial update merged into [`SyncSettings`] by the sync-config step.
#[derive(Debug, Clone, Default)]
pub struct SyncSettingsUpdate {
    pub backfill: Option<BackfillRange>,
    pub frequency: Option<String>,
    pub enabled_metrics: Option<Vec<String>>,
}

// ── Progress ──────────────────────────────────────────────────────

/// Last-polled view of the first sync run, kept for display.
#[derive(Debug, Clone, Default)]
pub struct SyncProgress {
    pub status: String,
    pub percent_complete: f32,
    pub current_stream: Option<String>,
    pub message: Option<String>,
}

impl From<SyncStatusSnapshot> for SyncProgress {
    fn from(snapshot: SyncStatusSnapshot) -> Self {
        Self {
            status: snapshot.status,
            percent_complete: snapshot.percent_complete.unwrap_or(0.0),
            current_stream: snapshot.current_stream,
            message: snapshot.message,
        }
    }
}

// ── The state itself ──────────────────────────────────────────────

/// The sole stateful entity of the wizard. Created fresh per session,
/// discarded on reset; nothing persists across sessions.
///
/// Invariant: `connection_id` is `Some` at every step at or past
/// `Accounts`. Invariant: `step` only advances forward except through
/// an explicit go-back.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    pub step: WizardStep,
    pub platform: Option<Platform>,
    pub connection_id: Option<String>,
    /// CSRF correlation token for the in-flight authorization attempt;
    /// regenerated every time authorization is (re)initiated.
    pub oauth_state: Option<String>,
    pub accounts: Vec<AdAccount>,
    pub selected_account_ids: Vec<String>,
    pub sync_settings: SyncSettings,
    pub progress: Option<SyncProgress>,
    pub error: Option<String>,
    pub loading: bool,
}

impl WizardState {
    /// Fresh session state for the given platform, positioned at the intro.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            platform: Some(platform),
            ..Self::default()
        }
    }

    pub fn account_bearing(&self) -> bool {
        self.platform
            .as_ref()
            .is_some_and(Platform::has_account_selection)
    }
}
