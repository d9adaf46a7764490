mod common;

use assert_matches::assert_matches;
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

use scheduling_cell::{
    AvailabilitySlot, AvailabilityState, BookingOutcome, BookingSession, HttpSchedulingApi,
    SchedulingApi,
};
use shared_api::ApiClient;
use shared_config::{AppConfig, DatePickerBehavior};

use common::{date, test_user};

fn config_for(server: &MockServer) -> AppConfig {
    AppConfig {
        api_base_url: server.uri(),
        date_picker_behavior: DatePickerBehavior::DismissOnPick,
        ..AppConfig::default()
    }
}

fn api_for(server: &MockServer) -> HttpSchedulingApi {
    let client = ApiClient::new(&config_for(server)).expect("client should build");
    HttpSchedulingApi::new(client.with_token("token-123"))
}

async fn mount_providers(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/providers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "provider-1", "name": "Ann", "avatar_url": "https://cdn.example.com/ann.png" },
            { "id": "provider-2", "name": "Bob", "avatar_url": null }
        ])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_list_providers_preserves_order() {
    let mock_server = MockServer::start().await;
    mount_providers(&mock_server).await;

    let providers = api_for(&mock_server).list_providers().await.unwrap();

    assert_eq!(providers.len(), 2);
    assert_eq!(providers[0].id, "provider-1");
    assert_eq!(providers[1].display_name, "Bob");
    assert_eq!(providers[1].avatar_url, None);
}

#[tokio::test]
async fn test_day_availability_uses_one_based_month() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/providers/provider-1/day-availability"))
        .and(query_param("year", "2024"))
        .and(query_param("month", "3"))
        .and(query_param("day", "15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "hour": 8, "available": false },
            { "hour": 9, "available": true }
        ])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let slots = api_for(&mock_server)
        .fetch_day_availability("provider-1", date(2024, 3, 15))
        .await
        .unwrap();

    assert_eq!(slots, vec![AvailabilitySlot::new(8, false), AvailabilitySlot::new(9, true)]);
}

#[tokio::test]
async fn test_full_booking_flow_over_http() {
    let mock_server = MockServer::start().await;
    mount_providers(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/providers/provider-1/day-availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "hour": 9, "available": true },
            { "hour": 14, "available": true }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .and(body_partial_json(json!({ "provider_id": "provider-1" })))
        .respond_with(|request: &Request| {
            let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap_or_default();
            ResponseTemplate::new(200).set_body_json(json!({
                "id": "appointment-42",
                "provider_id": "provider-1",
                "date": body["date"].clone()
            }))
        })
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let api = Arc::new(api_for(&mock_server));
    let mut session =
        BookingSession::new(test_user(), api, &config, "provider-1", date(2024, 3, 15));

    session.open().await.unwrap();
    assert_eq!(session.providers().len(), 2);
    assert!(session.providers()[1]
        .avatar_url
        .as_deref()
        .unwrap_or_default()
        .ends_with("/Bob"));

    let schedule = session.schedule();
    assert_eq!(schedule.morning[0].display_label, "09:00");
    assert_eq!(schedule.afternoon[0].display_label, "14:00");

    session.select_hour(14);
    let outcome = session.submit().await.unwrap();

    assert_matches!(
        outcome,
        BookingOutcome::Created { appointment_id: Some(ref id), .. } if id == "appointment-42"
    );

    let requests = mock_server.received_requests().await.unwrap_or_default();
    let post = requests
        .iter()
        .find(|r| r.method.as_str() == "POST")
        .expect("create request sent");
    let body: serde_json::Value = serde_json::from_slice(&post.body).unwrap();
    assert!(body["date"].as_str().unwrap().starts_with("2024-03-15T14:00:00"));
}

#[tokio::test]
async fn test_server_rejection_becomes_failed_outcome() {
    let mock_server = MockServer::start().await;
    mount_providers(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/providers/provider-1/day-availability"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "hour": 10, "available": true }
        ])))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "status": "error",
            "message": "This appointment is already booked"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let mut session = BookingSession::new(
        test_user(),
        Arc::new(api_for(&mock_server)),
        &config,
        "provider-1",
        date(2024, 3, 15),
    );
    session.open().await.unwrap();
    session.select_hour(10);

    let outcome = session.submit().await.unwrap();
    assert_matches!(outcome, BookingOutcome::Failed { .. });
    assert_eq!(session.selection().hour(), Some(10));
}

#[tokio::test]
async fn test_availability_error_marks_state_failed() {
    let mock_server = MockServer::start().await;
    mount_providers(&mock_server).await;

    Mock::given(method("GET"))
        .and(path("/providers/provider-1/day-availability"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = config_for(&mock_server);
    let mut session = BookingSession::new(
        test_user(),
        Arc::new(api_for(&mock_server)),
        &config,
        "provider-1",
        date(2024, 3, 15),
    );
    session.open().await.unwrap();

    assert_matches!(session.availability(), AvailabilityState::Failed(_));
    assert!(session.schedule().is_empty());
}
