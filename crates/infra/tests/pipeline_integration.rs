//! End-to-end flows through the session, the authenticated pipeline and the
//! façades, against a mock backend.

mod support;

use std::sync::Arc;

use maintrack_common::auth::{FileTokenStore, MemoryTokenStore};
use maintrack_common::{CredentialPair, TokenStore};
use maintrack_domain::{LoginCredentials, RequestFilter, RequestStatus};
use maintrack_infra::{ApiError, SessionEvent};
use serde_json::json;
use support::{request_json, LogCapture, TestStack};
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ACCESS_1: &str = "access-credential-one";
const ACCESS_2: &str = "access-credential-two";
const REFRESH: &str = "refresh-credential";

async fn mount_login(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/token/"))
        .and(body_json(json!({ "username": "joao", "password": "senha-forte" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "access": ACCESS_1, "refresh": REFRESH })),
        )
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn login_then_list_then_transparent_refresh() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/requisicoes/"))
        .and(header("Authorization", format!("Bearer {ACCESS_1}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([request_json(1, "pendente")])))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    // The access credential expires between the two calls.
    Mock::given(method("GET"))
        .and(path("/api/requisicoes/1/"))
        .and(header("Authorization", format!("Bearer {ACCESS_1}").as_str()))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "code": "token_not_valid" })),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .and(body_json(json!({ "refresh": REFRESH })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": ACCESS_2 })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/requisicoes/1/"))
        .and(header("Authorization", format!("Bearer {ACCESS_2}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(request_json(1, "em_andamento")))
        .expect(1)
        .mount(&server)
        .await;

    let stack = TestStack::new(&server, Arc::new(MemoryTokenStore::new()));
    let mut events = stack.session.subscribe();

    stack.auth.login(&LoginCredentials::new("joao", "senha-forte")).await.unwrap();
    let listed = stack.requests.list(&RequestFilter::new()).await.unwrap();
    assert_eq!(listed.len(), 1);

    let fetched = stack.requests.get(1).await.unwrap();
    assert_eq!(fetched.status, RequestStatus::InProgress);

    assert_eq!(events.recv().await.unwrap(), SessionEvent::LoggedIn);
    assert_eq!(events.recv().await.unwrap(), SessionEvent::Refreshed);
    assert_eq!(
        stack.session.store().load().await.unwrap(),
        Some(CredentialPair::new(ACCESS_2, REFRESH))
    );
}

#[tokio::test]
async fn expired_refresh_ends_session_for_every_caller() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/requisicoes/pendentes/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(
            json!({ "detail": "Token is invalid or expired", "code": "token_not_valid" }),
        ))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(MemoryTokenStore::with_pair(&CredentialPair::new(ACCESS_1, REFRESH)));
    let stack = TestStack::new(&server, store.clone());
    let mut events = stack.session.subscribe();

    let err = stack.requests.pending().await.unwrap_err();

    assert!(matches!(err, ApiError::SessionExpired(_)), "got {err:?}");
    assert!(store.load().await.unwrap().is_none());
    assert!(!stack.auth.is_authenticated().await.unwrap());
    assert!(matches!(events.recv().await.unwrap(), SessionEvent::Expired { .. }));
}

#[tokio::test]
async fn file_store_survives_a_restart() {
    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(path("/api/requisicoes/minhas_requisicoes/"))
        .and(header("Authorization", format!("Bearer {ACCESS_1}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let credentials = dir.path().join("credentials.json");

    {
        let stack = TestStack::new(&server, Arc::new(FileTokenStore::new(&credentials)));
        stack.auth.login(&LoginCredentials::new("joao", "senha-forte")).await.unwrap();
    }

    let restarted = TestStack::new(&server, Arc::new(FileTokenStore::new(&credentials)));
    assert!(restarted.auth.is_authenticated().await.unwrap());
    assert!(restarted.requests.mine().await.unwrap().is_empty());

    restarted.auth.logout().await.unwrap();
    let after_logout = FileTokenStore::new(&credentials);
    assert!(after_logout.load().await.unwrap().is_none());
}

#[tokio::test]
async fn credentials_never_reach_the_logs() {
    let logs = LogCapture::default();
    let _guard = logs.install();

    let server = MockServer::start().await;
    mount_login(&server).await;
    Mock::given(method("GET"))
        .and(header("Authorization", format!("Bearer {ACCESS_1}").as_str()))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/token/refresh/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "access": ACCESS_2 })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(header("Authorization", format!("Bearer {ACCESS_2}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let stack = TestStack::new(&server, Arc::new(MemoryTokenStore::new()));
    stack.auth.login(&LoginCredentials::new("joao", "senha-forte")).await.unwrap();
    stack.requests.list(&RequestFilter::new()).await.unwrap();

    let output = logs.contents();
    assert!(output.contains("login succeeded"), "expected login log, got:\n{output}");
    assert!(output.contains("access credential refreshed"));
    for secret in [ACCESS_1, ACCESS_2, REFRESH, "senha-forte"] {
        assert!(!output.contains(secret), "{secret} leaked into logs:\n{output}");
    }
}
