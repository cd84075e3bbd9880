use crate::suite::{Level, TestExecutor};
use httpmock::prelude::*;
use outbound_call::prelude::{FaultKind, NoAuth, Outcome};
use reqwest::StatusCode;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;

#[derive(Serialize)]
struct NewItem<'a> {
    name: &'a str,
    quantity: u32,
}

#[tokio::test]
async fn post_with_body_sends_json_payload() {
    // Arrange
    let application = TestExecutor::spawn(NoAuth).await;
    let mock = application
        .server()
        .mock_async(|when, then| {
            when.method(POST)
                .path("/items")
                .json_body(json!({"name": "widget", "quantity": 2}));
            then.status(201).body(r#"{"id":7}"#);
        })
        .await;
    let body = NewItem {
        name: "widget",
        quantity: 2,
    };
    // Act
    let outcome = application
        .executor()
        .post_with_body("create_item", "/items", &body, None)
        .await;
    // Assert
    mock.assert_async().await;
    assert!(matches!(outcome, Outcome::Success { .. }));
    assert_eq!(StatusCode::CREATED, outcome.status_code());
}

#[tokio::test]
async fn put_with_body_sends_json_payload() {
    // Arrange
    let application = TestExecutor::spawn(NoAuth).await;
    let mock = application
        .server()
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/items/7")
                .json_body(json!({"name": "gadget", "quantity": 5}));
            then.status(200);
        })
        .await;
    // Act
    let outcome = application
        .executor()
        .put_with_body(
            "replace_item",
            "/items/7",
            &json!({"name": "gadget", "quantity": 5}),
            None,
        )
        .await;
    // Assert
    mock.assert_async().await;
    assert!(outcome.is_successful());
}

#[tokio::test]
async fn bodyless_verbs_use_their_methods() {
    // Arrange
    let application = TestExecutor::spawn(NoAuth).await;
    let server = application.server();
    let post = server
        .mock_async(|when, then| {
            when.method(POST).path("/jobs/1/run");
            then.status(202);
        })
        .await;
    let put = server
        .mock_async(|when, then| {
            when.method(PUT).path("/jobs/1/lock");
            then.status(200);
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/jobs/1");
            then.status(204);
        })
        .await;
    let executor = application.executor();
    // Act
    let posted = executor.post("run_job", "/jobs/1/run", None).await;
    let put_outcome = executor.put("lock_job", "/jobs/1/lock", None).await;
    let deleted = executor.delete("delete_job", "/jobs/1", None).await;
    // Assert
    post.assert_async().await;
    put.assert_async().await;
    delete.assert_async().await;
    assert_eq!(StatusCode::ACCEPTED, posted.status_code());
    assert_eq!(StatusCode::OK, put_outcome.status_code());
    assert!(matches!(deleted, Outcome::Success { .. }));
    assert_eq!(StatusCode::NO_CONTENT, deleted.status_code());
    assert_eq!(6, application.logger().count(Level::Information));
}

#[tokio::test]
async fn unserializable_body_yields_serialization_exception() {
    // Arrange
    let application = TestExecutor::spawn(NoAuth).await;
    let body = BTreeMap::from([((1u8, 2u8), "tuple keys are not valid JSON")]);
    // Act
    let outcome = application
        .executor()
        .post_with_body("create_item", "/items", &body, None)
        .await;
    // Assert
    assert!(matches!(outcome, Outcome::Exception { .. }));
    assert_eq!(
        FaultKind::Serialization,
        outcome.exception().expect("Failed to get exception").kind()
    );
    assert_eq!(
        vec![Level::Information, Level::Fatal],
        application.logger().levels()
    );
    let fatal = &application.logger().events()[1];
    assert!(fatal
        .message
        .contains("TestClient::post_with_body(operation: &str, url: &str, body: &B, cancel: Option<&CancellationToken>)"));
}
