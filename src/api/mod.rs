//! REST client for the analytics backend's source-connection endpoints.
//!
//! The backend speaks snake_case JSON; serde on the types in
//! [`types`] is the normalization boundary between the wire and the
//! wizard's internal state.

mod client;
mod types;

pub use client::HttpConnectApi;
pub use types::{AdAccount, OAuthCallbackOutcome, OAuthInitiation, SyncStatusSnapshot};

use crate::error::ApiError;
use async_trait::async_trait;

/// Seam between the wizard controller and the backend. The production
/// implementation is [`HttpConnectApi`]; tests script responses through
/// their own impls.
#[async_trait]
pub trait ConnectApi: Send + Sync {
    /// `POST /api/sources/{platform}/oauth/initiate`
    async fn initiate_oauth(&self, platform_id: &str) -> Result<OAuthInitiation, ApiError>;

    /// `POST /api/sources/oauth/callback`
    async fn complete_oauth(
        &self,
        code: &str,
        state: &str,
    ) -> Result<OAuthCallbackOutcome, ApiError>;

    /// `GET /api/ad-platform-ingestion/connections/{id}/accounts`
    async fn list_accounts(&self, connection_id: &str) -> Result<Vec<AdAccount>, ApiError>;

    /// `PUT /api/ad-platform-ingestion/connections/{id}/accounts`
    async fn update_selected_accounts(
        &self,
        connection_id: &str,
        account_ids: &[String],
    ) -> Result<(), ApiError>;

    /// `PATCH /api/sources/{id}/config`
    async fn update_sync_config(
        &self,
        connection_id: &str,
        sync_frequency: &str,
    ) -> Result<(), ApiError>;

    /// `POST /api/sync/trigger/{id}`
    async fn trigger_sync(&self, connection_id: &str) -> Result<(), ApiError>;

    /// `GET /api/sync/state/{id}`
    async fn sync_state(&self, connection_id: &str) -> Result<SyncStatusSnapshot, ApiError>;
}
