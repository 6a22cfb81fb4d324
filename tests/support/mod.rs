//! Shared fixtures for wiremock-backed integration tests.
#![allow(dead_code)] // not every binary uses every fixture

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sourcesync::api::HttpConnectApi;
use sourcesync::wizard::{AuthLauncher, WizardController};

pub struct NoopLauncher;

impl AuthLauncher for NoopLauncher {
    fn open(&self, _url: &str) -> anyhow::Result<()> {
        Ok(())
    }
}

pub fn api_for(server: &MockServer) -> Arc<HttpConnectApi> {
    Arc::new(HttpConnectApi::new(&server.uri(), Some("test-token")).unwrap())
}

pub fn controller_for(server: &MockServer) -> WizardController {
    WizardController::new(api_for(server), Arc::new(NoopLauncher))
        .with_poll_interval(Duration::from_millis(25))
}

/// Mount the two OAuth endpoints for a happy-path authorization.
pub async fn mount_oauth(server: &MockServer, platform_id: &str, connection_id: &str) {
    Mock::given(method("POST"))
        .and(path(format!("/api/sources/{platform_id}/oauth/initiate")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authorization_url": "https://auth.example.test/grant",
            "state": "csrf-1",
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/sources/oauth/callback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "connection_id": connection_id,
        })))
        .mount(server)
        .await;
}
