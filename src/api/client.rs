use reqwest::{Client, Method, RequestBuilder, Response, header};
use std::time::Duration;
use url::Url;

use super::types::{AccountSelectionRequest, OAuthCallbackRequest, SyncConfigRequest};
use super::{AdAccount, ConnectApi, OAuthCallbackOutcome, OAuthInitiation, SyncStatusSnapshot};
use crate::error::ApiError;
use async_trait::async_trait;

/// reqwest-backed implementation of [`ConnectApi`].
#[derive(Debug)]
pub struct HttpConnectApi {
    base_url: String,
    /// Pre-computed `"Bearer <token>"` header value (avoids `format!` per request).
    cached_auth_header: Option<String>,
    client: Client,
}

fn build_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| Client::new())
}

impl HttpConnectApi {
    pub fn new(base_url: &str, api_token: Option<&str>) -> Result<Self, ApiError> {
        let trimmed = base_url.trim_end_matches('/');
        Url::parse(trimmed).map_err(|e| ApiError::BaseUrl(format!("{base_url}: {e}")))?;

        Ok(Self {
            base_url: trimmed.to_string(),
            cached_auth_header: api_token.map(|t| format!("Bearer {t}")),
            client: build_client(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut request = self
            .client
            .request(method, format!("{}{path}", self.base_url));
        if let Some(auth) = &self.cached_auth_header {
            request = request.header(header::AUTHORIZATION, auth);
        }
        request
    }
}

/// Convert a non-2xx response into an [`ApiError::Status`], preferring the
/// backend-supplied error body over the bare status line.
async fn expect_ok(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message =
        extract_error_message(&body).unwrap_or_else(|| format!("HTTP {status}"));
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message", "detail"]
        .iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()))
        .map(str::to_string)
}

async fn decode<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Decode(e.to_string()))
}

#[async_trait]
impl ConnectApi for HttpConnectApi {
    async fn initiate_oauth(&self, platform_id: &str) -> Result<OAuthInitiation, ApiError> {
        tracing::debug!(platform = platform_id, "initiating oauth");
        let response = self
            .request(
                Method::POST,
                &format!("/api/sources/{platform_id}/oauth/initiate"),
            )
            .send()
            .await?;
        decode(expect_ok(response).await?).await
    }

    async fn complete_oauth(
        &self,
        code: &str,
        state: &str,
    ) -> Result<OAuthCallbackOutcome, ApiError> {
        let response = self
            .request(Method::POST, "/api/sources/oauth/callback")
            .json(&OAuthCallbackRequest { code, state })
            .send()
            .await?;
        decode(expect_ok(response).await?).await
    }

    async fn list_accounts(&self, connection_id: &str) -> Result<Vec<AdAccount>, ApiError> {
        let response = self
            .request(
                Method::GET,
                &format!("/api/ad-platform-ingestion/connections/{connection_id}/accounts"),
            )
            .send()
            .await?;
        decode(expect_ok(response).await?).await
    }

    async fn update_selected_accounts(
        &self,
        connection_id: &str,
        account_ids: &[String],
    ) -> Result<(), ApiError> {
        let response = self
            .request(
                Method::PUT,
                &format!("/api/ad-platform-ingestion/connections/{connection_id}/accounts"),
            )
            .json(&AccountSelectionRequest { account_ids })
            .send()
            .await?;
        expect_ok(response).await?;
        Ok(())
    }

    async fn update_sync_config(
        &self,
        connection_id: &str,
        sync_frequency: &str,
    ) -> Result<(), ApiError> {
        let response = self
            .request(Method::PATCH, &format!("/api/sources/{connection_id}/config"))
            .json(&SyncConfigRequest { sync_frequency })
            .send()
            .await?;
        expect_ok(response).await?;
        Ok(())
    }

    async fn trigger_sync(&self, connection_id: &str) -> Result<(), ApiError> {
        let response = self
            .request(Method::POST, &format!("/api/sync/trigger/{connection_id}"))
            .send()
            .await?;
        expect_ok(response).await?;
        Ok(())
    }

    async fn sync_state(&self, connection_id: &str) -> Result<SyncStatusSnapshot, ApiError> {
        let response = self
            .request(Method::GET, &format!("/api/sync/state/{connection_id}"))
            .send()
            .await?;
        decode(expect_ok(response).await?).await
    }
}
