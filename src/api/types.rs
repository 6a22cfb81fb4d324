use serde::{Deserialize, Serialize};

// ── Responses ─────────────────────────────────────────────────────

/// Response to an OAuth initiation request. `state` is the opaque CSRF
/// correlation token the backend expects back on the callback.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthInitiation {
    pub authorization_url: String,
    pub state: String,
}

/// Outcome of exchanging an authorization code for a connection.
#[derive(Debug, Clone, Deserialize)]
pub struct OAuthCallbackOutcome {
    pub success: bool,
    #[serde(default)]
    pub connection_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// One discoverable sub-account of an ads connection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdAccount {
    pub id: String,
    #[serde(default)]
    pub external_id: String,
    #[serde(default)]
    pub name: String,
    /// Whether the backend recommends syncing this account by default.
    #[serde(default)]
    pub is_enabled: bool,
}

/// Last-polled snapshot of a connection's sync run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SyncStatusSnapshot {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub percent_complete: Option<f32>,
    #[serde(default)]
    pub current_stream: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub last_sync_status: Option<String>,
}

// ── Request bodies ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub(super) struct OAuthCallbackRequest<'a> {
    pub code: &'a str,
    pub state: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct AccountSelectionRequest<'a> {
    pub account_ids: &'a [String],
}

#[derive(Debug, Serialize)]
pub(super) struct SyncConfigRequest<'a> {
    pub sync_frequency: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_outcome_tolerates_missing_optional_fields() {
        let outcome: OAuthCallbackOutcome =
            serde_json::from_str(r#"{"success": true, "connection_id": "conn-1"}"#).unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.connection_id.as_deref(), Some("conn-1"));
        assert!(outcome.error.is_none());
    }

    #[test]
    fn ad_account_defaults_is_enabled_to_false() {
        let account: AdAccount =
            serde_json::from_str(r#"{"id": "a1", "external_id": "123", "name": "Brand"}"#).unwrap();
        assert!(!account.is_enabled);
    }

    #[test]
    fn sync_snapshot_parses_partial_payload() {
        let snap: SyncStatusSnapshot =
            serde_json::from_str(r#"{"status": "running", "percent_complete": 42.5}"#).unwrap();
        assert_eq!(snap.status, "running");
        assert_eq!(snap.percent_complete, Some(42.5));
        assert!(snap.last_sync_status.is_none());
    }
}
