//! Harvest client against a mock Harvest API.

use pretty_assertions::assert_eq;
use serde_json::json;
use tally_config::HarvestConfig;
use tally_core::{TaskSource, TimeEntrySource};
use tally_sources::{HarvestClient, SourceError};
use wiremock::matchers::{basic_auth, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(server: &MockServer) -> HarvestConfig {
    HarvestConfig {
        base_url: server.uri(),
        email: "pm@acme.test".into(),
        password: "hunter2".into(),
        project_id: 7,
        from: "20160101".into(),
        to: "20161231".into(),
        ..Default::default()
    }
}

#[tokio::test]
async fn fetches_assigned_tasks_with_estimates() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/7/task_assignments"))
        .and(basic_auth("pm@acme.test", "hunter2"))
        .and(header("accept", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"task_assignment": {"task_id": 2, "estimate": 12.5}},
            {"task_assignment": {"task_id": 1, "estimate": null}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tasks"))
        .and(basic_auth("pm@acme.test", "hunter2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"task": {"id": 1, "name": "Build API"}},
            {"task": {"id": 2, "name": "Design"}},
            {"task": {"id": 3, "name": "Other project"}}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HarvestClient::from_config(&config(&server), "tally-test").unwrap();
    let tasks = client.fetch_tasks().await.unwrap();

    let summary: Vec<_> = tasks
        .iter()
        .map(|t| (t.id, t.name.as_str(), t.estimate))
        .collect();
    assert_eq!(
        summary,
        vec![(1, "Build API", None), (2, "Design", Some(12.5))]
    );
}

#[tokio::test]
async fn fetches_time_entries_for_configured_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/7/entries"))
        .and(query_param("from", "20160101"))
        .and(query_param("to", "20161231"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"day_entry": {
                "id": 100, "task_id": 1, "user_id": 9, "hours": 2.0,
                "created_at": "2016-05-04T07:30:00Z", "notes": "#12: login"
            }}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = HarvestClient::from_config(&config(&server), "tally-test").unwrap();
    let entries = client.fetch_time_entries().await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].id, 100);
    assert_eq!(entries[0].user_id, 9);
    assert_eq!(entries[0].notes.as_deref(), Some("#12: login"));
}

#[tokio::test]
async fn rejected_credentials_surface_as_api_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .mount(&server)
        .await;

    let client = HarvestClient::from_config(&config(&server), "tally-test").unwrap();
    let err = client.fetch_tasks().await.unwrap_err();
    match err {
        SourceError::Api { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Unauthorized");
        }
        other => panic!("expected API error, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/projects/7/entries"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let client = HarvestClient::from_config(&config(&server), "tally-test").unwrap();
    let err = client.fetch_time_entries().await.unwrap_err();
    assert!(matches!(err, SourceError::Parse(_)));
}
