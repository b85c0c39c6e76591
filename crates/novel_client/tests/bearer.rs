use std::sync::Arc;

use novel_client::{
    ApiClient, ClientSettings, FailureKind, MemorySessionStore, Method, RequestOptions,
    SessionKey, SessionStore,
};
use serde_json::json;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn open_server() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;
    server
}

fn client_with_token(server: &MockServer) -> ApiClient {
    let store = Arc::new(MemorySessionStore::new());
    store.set(SessionKey::AccessToken, "tok-1").unwrap();
    let settings = ClientSettings::with_base_url(format!("{}/api", server.uri()));
    ApiClient::new(settings, store).expect("client")
}

/// Sends GET `path` and reports the Authorization header the server saw.
async fn authorization_for(path: &str, options: &RequestOptions) -> Option<String> {
    let server = open_server().await;
    let client = client_with_token(&server);
    client
        .request(Method::GET, path, None, options)
        .await
        .expect("request succeeds");

    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    requests[0]
        .headers
        .get("authorization")
        .map(|value| value.to_str().expect("ascii header").to_string())
}

#[tokio::test]
async fn public_reads_are_sent_anonymously() {
    let options = RequestOptions::default();
    assert_eq!(authorization_for("/novels/42", &options).await, None);
    assert_eq!(
        authorization_for("/novels/64f0c2a9e1/chapters/7", &options).await,
        None
    );
    assert_eq!(authorization_for("/chapters/9", &options).await, None);
}

#[tokio::test]
async fn private_endpoints_carry_the_token() {
    let options = RequestOptions::default();
    let expected = Some("Bearer tok-1".to_string());
    assert_eq!(authorization_for("/users/profile", &options).await, expected);
    assert_eq!(authorization_for("/novels/popular", &options).await, expected);
    assert_eq!(authorization_for("/novels", &options).await, expected);
}

#[tokio::test]
async fn author_namespace_always_carries_the_token() {
    let options = RequestOptions::default();
    let expected = Some("Bearer tok-1".to_string());
    assert_eq!(authorization_for("/author/novels/42", &options).await, expected);
    assert_eq!(
        authorization_for("/author/novels/42/chapters/3", &options).await,
        expected
    );
}

#[tokio::test]
async fn skip_auth_suppresses_the_token() {
    let options = RequestOptions {
        skip_auth: true,
        ..RequestOptions::default()
    };
    assert_eq!(authorization_for("/users/profile", &options).await, None);
}

#[tokio::test]
async fn skip_auth_401_is_final_and_stays_anonymous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "accessToken": "new", "refreshToken": "new-refresh" }
        })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/novels/popular"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "success": false })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/novels/popular"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let store = Arc::new(MemorySessionStore::new());
    store.set(SessionKey::AccessToken, "tok-1").unwrap();
    store.set(SessionKey::RefreshToken, "ref-1").unwrap();
    let settings = ClientSettings::with_base_url(format!("{}/api", server.uri()));
    let client = ApiClient::new(settings, store.clone()).expect("client");
    let options = RequestOptions {
        skip_auth: true,
        ..RequestOptions::default()
    };

    let err = client
        .request(Method::GET, "/novels/popular", None, &options)
        .await
        .unwrap_err();

    assert_eq!(err.kind, FailureKind::Unauthorized);
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    assert!(requests[0].headers.get("authorization").is_none());
    assert_eq!(store.get(SessionKey::AccessToken).as_deref(), Some("tok-1"));
}

#[tokio::test]
async fn no_token_means_no_header() {
    let server = open_server().await;
    let settings = ClientSettings::with_base_url(format!("{}/api", server.uri()));
    let client = ApiClient::new(settings, Arc::new(MemorySessionStore::new())).expect("client");

    client
        .request(Method::GET, "/users/profile", None, &RequestOptions::default())
        .await
        .expect("request succeeds");

    let requests = server.received_requests().await.expect("recording enabled");
    assert!(requests[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn query_pairs_are_appended_to_the_url() {
    let server = open_server().await;
    let client = client_with_token(&server);
    let options = RequestOptions::with_query([("keyword", "星 河"), ("page", "2")]);

    client
        .request(Method::GET, "/novels/search", None, &options)
        .await
        .expect("request succeeds");

    let requests = server.received_requests().await.expect("recording enabled");
    let url = &requests[0].url;
    assert_eq!(url.path(), "/api/novels/search");
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
    assert_eq!(
        pairs,
        vec![
            ("keyword".to_string(), "星 河".to_string()),
            ("page".to_string(), "2".to_string()),
        ]
    );
}
