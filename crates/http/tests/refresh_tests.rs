//! Token refresh behavior of the authenticated gateway

use futures::future::join_all;
use plumb_core::{KeyValueStore, MemoryStore};
use plumb_http::client::{ClientError, PlumbClient, RefreshError, SessionNavigator};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

struct Harness {
    client: PlumbClient,
    store: Arc<MemoryStore>,
    visits: Arc<Mutex<Vec<String>>>,
}

fn harness(server: &MockServer, refresh_token: Option<&str>) -> Harness {
    harness_for(server.uri(), refresh_token, None)
}

fn harness_for(base_url: String, refresh_token: Option<&str>, timeout: Option<Duration>) -> Harness {
    let store = Arc::new(MemoryStore::new());
    store.set("access_token", "A1").unwrap();
    if let Some(refresh) = refresh_token {
        store.set("refresh_token", refresh).unwrap();
    }

    let visits = Arc::new(Mutex::new(Vec::new()));
    let recorded = visits.clone();
    let navigator: Arc<dyn SessionNavigator> = Arc::new(move |path: &str| {
        recorded.lock().unwrap().push(path.to_string());
    });

    let mut builder = PlumbClient::builder()
        .base_url(base_url)
        .store(store.clone())
        .navigator(navigator);
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    let client = builder.build().unwrap();

    Harness {
        client,
        store,
        visits,
    }
}

fn user_json() -> serde_json::Value {
    json!({ "id": 1, "name": "Ahmad", "role": "client" })
}

async fn mount_expiring(server: &MockServer, route: &str, body: serde_json::Value) {
    mount_expiring_after(server, route, body, Duration::ZERO).await;
}

/// Reject `Bearer A1` on `route` after `delay`, accept `Bearer A2`
async fn mount_expiring_after(
    server: &MockServer,
    route: &str,
    body: serde_json::Value,
    delay: Duration,
) {
    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", "Bearer A1"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({
                    "detail": "Given token not valid for any token type",
                    "code": "token_not_valid"
                }))
                .set_delay(delay),
        )
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(route))
        .and(header("authorization", "Bearer A2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_expired_token_is_refreshed_once_for_parallel_calls() {
    let server = MockServer::start().await;
    mount_expiring(&server, "/posts/", json!([])).await;
    mount_expiring(&server, "/users/me/", user_json()).await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .and(body_json(json!({ "refresh": "R1" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": "A2" }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("R1"));
    let (posts, me) = tokio::join!(h.client.posts(), h.client.current_user());

    assert!(posts.unwrap().is_empty());
    assert_eq!(me.unwrap().id, 1);
    assert_eq!(h.store.get("access_token").as_deref(), Some("A2"));
    assert_eq!(h.store.get("refresh_token").as_deref(), Some("R1"));
    assert!(h.visits.lock().unwrap().is_empty());
    assert!(!h.client.is_refreshing());
}

#[tokio::test]
async fn test_many_contending_calls_share_one_refresh() {
    let server = MockServer::start().await;
    mount_expiring(&server, "/users/me/", user_json()).await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": "A2" }))
                .set_delay(Duration::from_millis(100)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("R1"));
    let results = join_all((0..8).map(|_| h.client.current_user())).await;

    assert!(results.iter().all(Result::is_ok));

    let retried = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| {
            request
                .headers
                .get("authorization")
                .is_some_and(|value| value == "Bearer A2")
        })
        .count();
    assert_eq!(retried, 8);
}

#[tokio::test]
async fn test_refresh_failure_ends_session_for_every_caller() {
    let server = MockServer::start().await;
    mount_expiring(&server, "/posts/", json!([])).await;
    mount_expiring(&server, "/users/me/", user_json()).await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "detail": "Token is invalid or expired" }))
                .set_delay(Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("R1"));
    let (posts, me) = tokio::join!(h.client.posts(), h.client.current_user());

    let expected = RefreshError::Rejected {
        status: 400,
        message: "Token is invalid or expired".to_string(),
    };
    for err in [posts.unwrap_err(), me.unwrap_err()] {
        match err {
            ClientError::RefreshFailed(reason) => assert_eq!(reason, expected),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    assert!(h.store.get("access_token").is_none());
    assert!(h.store.get("refresh_token").is_none());
    assert!(h.store.get("user_data").is_none());
    assert_eq!(*h.visits.lock().unwrap(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_rotated_refresh_token_is_persisted() {
    let server = MockServer::start().await;
    mount_expiring(&server, "/users/me/", user_json()).await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access": "A2", "refresh": "R2" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("R1"));
    h.client.current_user().await.unwrap();

    assert_eq!(h.store.get("access_token").as_deref(), Some("A2"));
    assert_eq!(h.store.get("refresh_token").as_deref(), Some("R2"));
}

#[tokio::test]
async fn test_missing_refresh_token_is_a_refresh_failure() {
    let server = MockServer::start().await;
    mount_expiring(&server, "/users/me/", user_json()).await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })))
        .expect(0)
        .mount(&server)
        .await;

    let h = harness(&server, None);
    let err = h.client.current_user().await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::RefreshFailed(RefreshError::MissingRefreshToken)
    ));
    assert!(!h.client.is_authenticated());
    assert_eq!(h.visits.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_retry_rejection_is_not_refreshed_again() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/users/me/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "User is inactive"
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("R1"));
    let err = h.client.current_user().await.unwrap_err();

    match err {
        ClientError::AuthenticationFailed(message) => assert_eq!(message, "User is inactive"),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(h.store.get("access_token").as_deref(), Some("A2"));
    assert!(h.visits.lock().unwrap().is_empty());
}

fn bearer(request: &Request) -> Option<&str> {
    request
        .headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
}

async fn refresh_calls(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|request| request.url.path() == "/token/refresh/")
        .count()
}

#[tokio::test]
async fn test_transport_error_is_returned_without_refresh() {
    // Bind and release a port so nothing is listening on it
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let h = harness_for(format!("http://{address}"), Some("R1"), None);
    let err = h.client.current_user().await.unwrap_err();

    assert!(matches!(err, ClientError::Request(_)));
    assert!(!h.client.is_refreshing());
    assert_eq!(h.store.get("access_token").as_deref(), Some("A1"));
    assert_eq!(h.store.get("refresh_token").as_deref(), Some("R1"));
    assert!(h.visits.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_transport_error_ends_session() {
    let server = MockServer::start().await;
    mount_expiring(&server, "/users/me/", user_json()).await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": "A2" }))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let h = harness_for(server.uri(), Some("R1"), Some(Duration::from_millis(500)));
    let err = h.client.current_user().await.unwrap_err();

    assert!(matches!(
        err,
        ClientError::RefreshFailed(RefreshError::Transport(_))
    ));
    assert!(h.store.get("access_token").is_none());
    assert!(h.store.get("refresh_token").is_none());
    assert_eq!(*h.visits.lock().unwrap(), vec!["/login".to_string()]);
}

#[tokio::test]
async fn test_late_rejection_reuses_settled_refresh() {
    let server = MockServer::start().await;
    mount_expiring(&server, "/users/me/", user_json()).await;
    // This 401 arrives well after the refresh for the same token finished
    mount_expiring_after(&server, "/posts/", json!([]), Duration::from_millis(500)).await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": "A2" })))
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("R1"));
    let (posts, me) = tokio::join!(h.client.posts(), h.client.current_user());

    assert!(posts.unwrap().is_empty());
    assert_eq!(me.unwrap().id, 1);
    assert_eq!(h.store.get("access_token").as_deref(), Some("A2"));

    let posts_replays = server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|request| request.url.path() == "/posts/" && bearer(request) == Some("Bearer A2"))
        .count();
    assert_eq!(posts_replays, 1);
}

#[tokio::test]
async fn test_cancelled_refresh_is_taken_over_by_waiter() {
    let server = MockServer::start().await;
    mount_expiring(&server, "/users/me/", user_json()).await;
    // Queues behind the refresh started for /users/me/
    mount_expiring_after(&server, "/posts/", json!([]), Duration::from_millis(50)).await;

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": "A2" }))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&server)
        .await;

    let h = harness(&server, Some("R1"));
    let leader = tokio::time::timeout(Duration::from_millis(150), h.client.current_user());
    let (leader, posts) = tokio::join!(leader, h.client.posts());

    assert!(leader.is_err(), "leader should have been cancelled");
    assert!(posts.unwrap().is_empty());
    assert_eq!(refresh_calls(&server).await, 2);
    assert_eq!(h.store.get("access_token").as_deref(), Some("A2"));
    assert!(h.visits.lock().unwrap().is_empty());
    assert!(!h.client.is_refreshing());
}

#[tokio::test]
async fn test_queued_requests_replay_after_refresh_with_new_token() {
    let server = MockServer::start().await;
    mount_expiring(&server, "/users/me/", user_json()).await;
    for (index, delay) in [(1, 20), (2, 40), (3, 60)] {
        mount_expiring_after(
            &server,
            &format!("/posts/{index}/"),
            json!({
                "id": index,
                "statement": "Leaking pipe under the sink",
                "author": user_json(),
                "created_at": "2025-01-05T10:00:00Z",
                "updated_at": "2025-01-05T10:00:00Z"
            }),
            Duration::from_millis(delay),
        )
        .await;
    }

    Mock::given(method("POST"))
        .and(path("/token/refresh/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "access": "A2" }))
                .set_delay(Duration::from_millis(300)),
        )
        .expect(1)
        .mount(&server)
        .await;

    let h = harness(&server, Some("R1"));
    let (me, first, second, third) = tokio::join!(
        h.client.current_user(),
        h.client.post(1),
        h.client.post(2),
        h.client.post(3)
    );

    assert!(me.is_ok());
    assert_eq!(
        [first.unwrap().id, second.unwrap().id, third.unwrap().id],
        [1, 2, 3]
    );

    let requests = server.received_requests().await.unwrap();
    let refresh_at = requests
        .iter()
        .position(|request| request.url.path() == "/token/refresh/")
        .unwrap();

    // Every rejected request was seen before the refresh, every replay after it
    assert!(
        requests[..refresh_at]
            .iter()
            .all(|request| bearer(request) == Some("Bearer A1"))
    );
    assert_eq!(refresh_at, 4);
    let replays = &requests[refresh_at + 1..];
    assert_eq!(replays.len(), 4);
    assert!(
        replays
            .iter()
            .all(|request| bearer(request) == Some("Bearer A2"))
    );
}
