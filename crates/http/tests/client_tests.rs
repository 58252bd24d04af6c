//! Integration tests for the PlumbConnect HTTP client

use plumb_core::{KeyValueStore, MemoryStore};
use plumb_http::client::{ClientError, PlumbClient};
use plumb_http::types::{LikeState, NotificationFilter, NotificationKind, PasswordChange};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_json(id: i64) -> serde_json::Value {
    json!({
        "id": id,
        "name": "Fatima Al-Sabah",
        "email": "fatima@example.com",
        "role": "client",
        "status": "active",
        "location": { "id": 2, "city": "Hawally" }
    })
}

fn signed_in(server: &MockServer) -> (PlumbClient, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    store.set("access_token", "A1").unwrap();
    store.set("refresh_token", "R1").unwrap();
    let client = PlumbClient::builder()
        .base_url(server.uri())
        .store(store.clone())
        .build()
        .unwrap();
    (client, store)
}

async fn refresh_never_called(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })))
        .expect(0)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_client_builder() {
    let client = PlumbClient::builder()
        .base_url("http://localhost:8001/api/")
        .timeout(Duration::from_secs(10))
        .build();

    assert!(client.is_ok());
    let client = client.unwrap();
    assert_eq!(client.base_url(), "http://localhost:8001/api");
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_client_builder_requires_base_url() {
    let result = PlumbClient::builder().build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));

    let result = PlumbClient::new("not a url");
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_login_stores_tokens_and_profile() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/"))
        .and(body_json(json!({ "email": "fatima@example.com", "password": "secret" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access": "A1", "refresh": "R1" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/me/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json(7)))
        .expect(1)
        .mount(&server)
        .await;

    let client = PlumbClient::new(server.uri()).unwrap();
    let user = client.login("fatima@example.com", "secret").await.unwrap();

    assert_eq!(user.id, 7);
    assert!(client.is_authenticated());
    assert_eq!(client.storage().refresh_token().as_deref(), Some("R1"));
    assert_eq!(client.storage().current_user().map(|u| u.id), Some(7));

    client.logout().unwrap();
    assert!(!client.is_authenticated());
    assert!(client.storage().current_user().is_none());
}

#[tokio::test]
async fn test_login_failure_surfaces_backend_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .mount(&server)
        .await;

    let client = PlumbClient::new(server.uri()).unwrap();
    let err = client.login("nobody@example.com", "wrong").await.unwrap_err();

    match err {
        ClientError::AuthenticationFailed(message) => {
            assert_eq!(message, "No active account found with the given credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!client.is_authenticated());
}

#[tokio::test]
async fn test_public_endpoints_send_no_credentials() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/locations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": 1, "city": "Kuwait City" },
            { "id": 2, "city": "Hawally" }
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/users/plumbers/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{ "id": 9, "name": "Khaled", "role": "plumber" }]
        })))
        .mount(&server)
        .await;

    let (client, _) = signed_in(&server);
    let locations = client.locations().await.unwrap();
    let plumbers = client.plumbers().await.unwrap();

    assert_eq!(locations.len(), 2);
    assert_eq!(plumbers[0].name, "Khaled");

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests
            .iter()
            .all(|request| !request.headers.contains_key("authorization"))
    );
}

#[tokio::test]
async fn test_register_validation_errors_are_kept() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "email": ["user with this email already exists."]
        })))
        .mount(&server)
        .await;

    let client = PlumbClient::new(server.uri()).unwrap();
    let registration = plumb_http::types::RegisterRequest {
        name: "Fatima".into(),
        email: "fatima@example.com".into(),
        phone: "+96550000000".into(),
        password: "secret".into(),
        location_id: 2,
        role: plumb_http::types::UserRole::Client,
    };

    match client.register(&registration).await.unwrap_err() {
        ClientError::BadRequest { message, errors } => {
            assert_eq!(message, "user with this email already exists.");
            assert!(errors.unwrap().get("email").is_some());
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_missing_token_fails_without_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = PlumbClient::new(server.uri()).unwrap();
    let err = client.posts().await.unwrap_err();

    assert!(matches!(err, ClientError::Unauthenticated));
    assert!(err.is_auth_expired());
}

#[tokio::test]
async fn test_not_found_is_returned_without_refresh() {
    let server = MockServer::start().await;
    refresh_never_called(&server).await;

    Mock::given(method("GET"))
        .and(path("/posts/404/"))
        .and(header("authorization", "Bearer A1"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "detail": "Not found." })))
        .expect(1)
        .mount(&server)
        .await;

    let (client, store) = signed_in(&server);
    let err = client.post(404).await.unwrap_err();

    match err {
        ClientError::NotFound(message) => assert_eq!(message, "Not found."),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(store.get("access_token").as_deref(), Some("A1"));
}

#[tokio::test]
async fn test_server_error_is_returned_without_refresh() {
    let server = MockServer::start().await;
    refresh_never_called(&server).await;

    Mock::given(method("GET"))
        .and(path("/articles/"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<h1>Server Error</h1>"))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in(&server);
    let err = client.articles().await.unwrap_err();

    match err {
        ClientError::ServerError { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "HTTP error! status: 500");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn test_toggle_like_reads_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posts/3/like/"))
        .respond_with(ResponseTemplate::new(201))
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/posts/3/like/"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;

    let (client, _) = signed_in(&server);

    assert_eq!(client.toggle_like(3).await.unwrap(), LikeState::Liked);
    assert_eq!(client.toggle_like(3).await.unwrap(), LikeState::Unliked);
}

#[tokio::test]
async fn test_notification_filters_become_query_params() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/notifications/"))
        .and(query_param("is_read", "false"))
        .and(query_param("notification_type", "new_message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/notifications/stats/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total_notifications": 10,
            "unread_notifications": 4,
            "important_notifications": 1,
            "notifications_by_type": { "new_message": 6 }
        })))
        .mount(&server)
        .await;

    let (client, _) = signed_in(&server);
    let filter = NotificationFilter {
        is_read: Some(false),
        kind: Some(NotificationKind::NewMessage),
        is_important: None,
    };

    assert!(client.notifications(&filter).await.unwrap().is_empty());
    assert_eq!(client.unread_notification_count().await.unwrap(), 4);
}

#[tokio::test]
async fn test_complaint_targets_keep_active_users() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                { "id": 1, "name": "Active", "role": "plumber", "status": "active" },
                { "id": 2, "name": "Blocked", "role": "client", "status": "blocked" }
            ]
        })))
        .mount(&server)
        .await;

    let (client, _) = signed_in(&server);
    let targets = client.complaint_targets().await.unwrap();

    assert_eq!(targets.len(), 1);
    assert_eq!(targets[0].id, 1);
}

#[tokio::test]
async fn test_change_password_times_out() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/users/me/"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(8)))
        .mount(&server)
        .await;

    let (client, _) = signed_in(&server);
    let change = PasswordChange {
        old_password: "old".into(),
        new_password: "new".into(),
    };

    let err = client.change_password(&change).await.unwrap_err();
    assert!(matches!(err, ClientError::Timeout(d) if d == Duration::from_secs(5)));
}
