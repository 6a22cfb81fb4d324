use thiserror::Error;

// ─── Top-level error hierarchy ───────────────────────────────────────────────

/// Structured error hierarchy for `sourcesync`.
///
/// Each subsystem defines its own error variant. Library callers can match on
/// these to decide recovery strategy; the CLI boundary continues to use
/// `anyhow::Result` for ad-hoc context chains.
#[derive(Debug, Error)]
pub enum SyncError {
    // ── Config ───────────────────────────────────────────────────────────
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    // ── Backend API ─────────────────────────────────────────────────────
    #[error("api: {0}")]
    Api(#[from] ApiError),

    // ── Wizard preconditions ────────────────────────────────────────────
    #[error("{0}")]
    Wizard(#[from] WizardError),

    // ── Generic fallthrough (wraps anyhow for interop) ──────────────────
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ─── Config errors ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(String),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

// ─── Backend API errors ─────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport-level failure (connection refused, timeout, TLS).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response. `message` carries the backend-supplied error body
    /// when one was present, otherwise the HTTP status line.
    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("invalid response body: {0}")]
    Decode(String),

    #[error("invalid base url: {0}")]
    BaseUrl(String),
}

// ─── Wizard precondition errors ─────────────────────────────────────────────

/// Local validation failures detected before any network call, plus
/// environment failures (the authorization window could not be opened).
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("No platform selected")]
    NoPlatform,

    #[error("No active connection")]
    MissingConnection,

    #[error("Could not open the authorization window: {0}")]
    LaunchFailed(String),
}

// ─── Convenience re-exports ─────────────────────────────────────────────────

/// Shorthand result type for the crate.
pub type Result<T> = std::result::Result<T, SyncError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_displays_correctly() {
        let err = SyncError::Config(ConfigError::Validation("missing api token".into()));
        assert!(err.to_string().contains("validation failed"));
        assert!(err.to_string().contains("missing api token"));
    }

    #[test]
    fn status_error_displays_backend_message_only() {
        let err = SyncError::Api(ApiError::Status {
            status: 422,
            message: "Invalid OAuth state".into(),
        });
        assert_eq!(err.to_string(), "api: Invalid OAuth state");
    }

    #[test]
    fn wizard_error_is_user_facing_text() {
        let err = SyncError::Wizard(WizardError::NoPlatform);
        assert_eq!(err.to_string(), "No platform selected");
    }

    #[test]
    fn anyhow_interop() {
        let anyhow_err = anyhow::anyhow!("something went wrong");
        let sync_err: SyncError = anyhow_err.into();
        assert!(sync_err.to_string().contains("something went wrong"));
    }
}
