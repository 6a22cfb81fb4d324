//! End-to-end wizard flows against a wiremock backend.

mod support;

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use sourcesync::catalog;
use sourcesync::wizard::{SyncSettingsUpdate, WizardStep};

use support::{controller_for, mount_oauth};

#[tokio::test]
async fn ads_platform_authorization_lands_on_accounts_with_defaults() {
    let server = MockServer::start().await;
    mount_oauth(&server, "google_ads", "conn-1").await;
    Mock::given(method("GET"))
        .and(path("/api/ad-platform-ingestion/connections/conn-1/accounts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a1", "external_id": "123-456", "name": "Brand", "is_enabled": true},
            {"id": "a2", "external_id": "789-012", "name": "Retargeting", "is_enabled": false},
        ])))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.initialize(catalog::find("google_ads").unwrap());
    controller.proceed_from_intro();
    controller.start_oauth().await;

    let state = controller.state();
    assert_eq!(state.step, WizardStep::Oauth);
    assert_eq!(state.oauth_state.as_deref(), Some("csrf-1"));

    controller.handle_oauth_complete("c", "csrf-1").await;

    let state = controller.state();
    assert_eq!(state.step, WizardStep::Accounts);
    assert_eq!(state.connection_id.as_deref(), Some("conn-1"));
    assert_eq!(state.selected_account_ids, vec!["a1"]);
    assert_eq!(state.accounts.len(), 2);
}

#[tokio::test]
async fn storefront_platform_goes_straight_to_sync_config() {
    let server = MockServer::start().await;
    mount_oauth(&server, "shopify", "conn-2").await;

    let mut controller = controller_for(&server);
    controller.initialize(catalog::find("shopify").unwrap());
    controller.proceed_from_intro();
    controller.start_oauth().await;
    controller.handle_oauth_complete("c", "csrf-1").await;

    let state = controller.state();
    assert_eq!(state.step, WizardStep::SyncConfig);
    assert_eq!(state.connection_id.as_deref(), Some("conn-2"));
}

#[tokio::test]
async fn backend_rejection_surfaces_its_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/sources/oauth/callback"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": "State mismatch",
        })))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.initialize(catalog::find("shopify").unwrap());
    controller.proceed_from_intro();
    controller.handle_oauth_complete("c", "csrf-stale").await;

    let state = controller.state();
    assert_eq!(state.step, WizardStep::Oauth);
    assert_eq!(state.error.as_deref(), Some("State mismatch"));
}

#[tokio::test]
async fn unknown_frequency_is_submitted_as_daily() {
    let server = MockServer::start().await;
    mount_oauth(&server, "shopify", "conn-3").await;

    // The config mock only matches the mapped payload; an unmapped
    // `six_hourly` would 404 and fail the transition.
    Mock::given(method("PATCH"))
        .and(path("/api/sources/conn-3/config"))
        .and(body_json(json!({"sync_frequency": "daily"})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sync/trigger/conn-3"))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sync/state/conn-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "running", "percent_complete": 5.0,
        })))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.initialize(catalog::find("shopify").unwrap());
    controller.proceed_from_intro();
    controller.start_oauth().await;
    controller.handle_oauth_complete("c", "csrf-1").await;

    controller.update_sync_config(SyncSettingsUpdate {
        frequency: Some("six_hourly".into()),
        ..SyncSettingsUpdate::default()
    });
    controller.confirm_sync_config().await;

    let state = controller.state();
    assert!(state.error.is_none());
    assert_eq!(state.step, WizardStep::Syncing);
    controller.reset();
}

#[tokio::test]
async fn poll_sequence_drives_the_wizard_to_success() {
    let server = MockServer::start().await;
    mount_oauth(&server, "shopify", "conn-4").await;
    Mock::given(method("PATCH"))
        .and(path("/api/sources/conn-4/config"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/sync/trigger/conn-4"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    // Scripted status sequence: running(50) → running(75) → completed.
    Mock::given(method("GET"))
        .and(path("/api/sync/state/conn-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "running", "percent_complete": 50.0, "current_stream": "orders",
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sync/state/conn-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "running", "percent_complete": 75.0, "current_stream": "customers",
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/sync/state/conn-4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "completed", "percent_complete": 100.0, "last_sync_status": "succeeded",
        })))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.initialize(catalog::find("shopify").unwrap());
    controller.proceed_from_intro();
    controller.start_oauth().await;
    controller.handle_oauth_complete("c", "csrf-1").await;
    controller.confirm_sync_config().await;
    assert_eq!(controller.state().step, WizardStep::Syncing);

    // 25ms poll cadence: three polls finish comfortably within a second.
    let mut state = controller.state();
    for _ in 0..40 {
        if state.step == WizardStep::Success {
            break;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
        state = controller.state();
    }

    assert_eq!(state.step, WizardStep::Success);
    let progress = state.progress.unwrap();
    assert!((progress.percent_complete - 100.0).abs() < f32::EPSILON);
    assert!(state.error.is_none());
}

#[tokio::test]
async fn account_fetch_failure_still_reaches_accounts_step() {
    let server = MockServer::start().await;
    mount_oauth(&server, "meta_ads", "conn-5").await;
    Mock::given(method("GET"))
        .and(path("/api/ad-platform-ingestion/connections/conn-5/accounts"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "error": "ingestion service unavailable",
        })))
        .mount(&server)
        .await;

    let mut controller = controller_for(&server);
    controller.initialize(catalog::find("meta_ads").unwrap());
    controller.proceed_from_intro();
    controller.start_oauth().await;
    controller.handle_oauth_complete("c", "csrf-1").await;

    let state = controller.state();
    assert_eq!(state.step, WizardStep::Accounts);
    assert!(state.accounts.is_empty());
    assert!(state.selected_account_ids.is_empty());
    assert!(state.error.is_none());
}
