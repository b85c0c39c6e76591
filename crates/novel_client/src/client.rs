//! HTTP client with bearer attachment and single-retry token refresh.
//!
//! A request goes `Initial -> done`, or on a 401 from a token-protected endpoint
//! `Initial -> refresh -> Retry -> done`. The retry is never refreshed again.
//! Refreshes are serialized behind one async lock and counted by a generation
//! number; a request that saw 401 with a token older than the current generation
//! simply retries, so N parallel 401s cost one refresh call.
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use novel_core::{extract_message, normalize, ApiResponse};
use novel_logging::{novel_debug, novel_info, novel_warn, redact};
use reqwest::{Method, Url};
use serde_json::{json, Value};
use tokio::sync::Mutex;

use crate::session::{SessionGrant, SessionKey, SessionStore};
use crate::transport::{OutgoingRequest, ReqwestTransport, Transport};
use crate::{ClientError, ClientSettings, FailureKind, RawResponse};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Never send the bearer token, whatever the path.
    pub skip_auth: bool,
    /// Extra query-string pairs, appended in order.
    pub query: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn with_query<K: Into<String>, V: ToString>(
        pairs: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self {
            query: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.to_string()))
                .collect(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    /// Re-issue after a refresh. A 401 here is final.
    Retry,
}

struct PreparedCall {
    method: Method,
    path: String,
    url: Url,
    body: Option<Vec<u8>>,
    skip_auth: bool,
}

#[derive(Default)]
struct RefreshGate {
    lock: Mutex<()>,
    generation: AtomicU64,
}

impl RefreshGate {
    fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }
}

#[derive(Clone)]
pub struct ApiClient {
    settings: Arc<ClientSettings>,
    transport: Arc<dyn Transport>,
    store: Arc<dyn SessionStore>,
    refresh: Arc<RefreshGate>,
}

impl ApiClient {
    pub fn new(
        settings: ClientSettings,
        store: Arc<dyn SessionStore>,
    ) -> Result<Self, ClientError> {
        let transport = Arc::new(ReqwestTransport::new(&settings)?);
        Ok(Self::with_transport(settings, transport, store))
    }

    pub fn with_transport(
        settings: ClientSettings,
        transport: Arc<dyn Transport>,
        store: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            transport,
            store,
            refresh: Arc::new(RefreshGate::default()),
        }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    pub fn store(&self) -> &dyn SessionStore {
        self.store.as_ref()
    }

    /// Issues a request and returns the raw JSON body of a 2xx reply.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<Value, ClientError> {
        let call = self.prepare(method, path, body, options)?;
        self.execute(&call, Attempt::Initial).await
    }

    /// Like [`ApiClient::request`] but never fails: the reply is normalized and
    /// errors become `success: false` responses carrying a displayable message.
    pub async fn call(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> ApiResponse {
        match self.request(method.clone(), path, body, options).await {
            Ok(value) => normalize(value),
            Err(err) => {
                novel_warn!("{} {} failed: {}", method, path, err);
                ApiResponse::failure(err.user_message())
            }
        }
    }

    pub async fn get(&self, path: &str) -> ApiResponse {
        self.call(Method::GET, path, None, &RequestOptions::default())
            .await
    }

    pub async fn get_with(&self, path: &str, options: &RequestOptions) -> ApiResponse {
        self.call(Method::GET, path, None, options).await
    }

    pub async fn post(&self, path: &str, body: &Value) -> ApiResponse {
        self.call(Method::POST, path, Some(body), &RequestOptions::default())
            .await
    }

    pub async fn put(&self, path: &str, body: &Value) -> ApiResponse {
        self.call(Method::PUT, path, Some(body), &RequestOptions::default())
            .await
    }

    pub async fn delete(&self, path: &str) -> ApiResponse {
        self.call(Method::DELETE, path, None, &RequestOptions::default())
            .await
    }

    /// Drops tokens, cached user and any pending verification marker.
    pub fn clear_session(&self) {
        if let Err(err) = self.store.clear() {
            novel_warn!("Failed to clear session store: {}", err);
        }
    }

    /// Drops tokens and the cached user. A pending verification survives.
    pub fn clear_credentials(&self) {
        for key in [
            SessionKey::AccessToken,
            SessionKey::RefreshToken,
            SessionKey::User,
        ] {
            if let Err(err) = self.store.remove(key) {
                novel_warn!("Failed to remove {:?} from session store: {}", key, err);
            }
        }
    }

    fn prepare(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        options: &RequestOptions,
    ) -> Result<PreparedCall, ClientError> {
        let url = self.url_for(path, &options.query)?;
        let body = body
            .map(serde_json::to_vec)
            .transpose()
            .map_err(|err| ClientError::new(FailureKind::Decode, err.to_string()))?;
        Ok(PreparedCall {
            method,
            path: path.to_string(),
            url,
            body,
            skip_auth: options.skip_auth,
        })
    }

    fn url_for(&self, path: &str, query: &[(String, String)]) -> Result<Url, ClientError> {
        let joined = format!(
            "{}/{}",
            self.settings.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        let mut url = Url::parse(&joined)
            .map_err(|err| ClientError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn bearer_for(&self, call: &PreparedCall) -> Option<String> {
        if call.skip_auth || !self.settings.auth.should_attach_bearer(&call.path) {
            return None;
        }
        self.store.get(SessionKey::AccessToken)
    }

    async fn execute(&self, call: &PreparedCall, attempt: Attempt) -> Result<Value, ClientError> {
        let mut attempt = attempt;
        loop {
            let generation = self.refresh.generation();
            let bearer = match attempt {
                Attempt::Initial => self.bearer_for(call),
                // The retry carries the fresh token, whatever the path.
                Attempt::Retry if !call.skip_auth => self.store.get(SessionKey::AccessToken),
                Attempt::Retry => None,
            };

            match self.send_once(call, bearer).await {
                Ok(value) => return Ok(value),
                // A call that never sends a token gains nothing from a refresh.
                Err(err)
                    if attempt == Attempt::Initial && !call.skip_auth && err.is_unauthorized() =>
                {
                    novel_debug!("{} {} got 401, refreshing session", call.method, call.path);
                    self.refresh_session(generation).await.map_err(|_| err)?;
                    attempt = Attempt::Retry;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once(
        &self,
        call: &PreparedCall,
        bearer: Option<String>,
    ) -> Result<Value, ClientError> {
        let response = self
            .transport
            .send(OutgoingRequest {
                method: call.method.clone(),
                url: call.url.clone(),
                bearer,
                body: call.body.clone(),
            })
            .await?;
        self.interpret(&call.path, response)
    }

    fn interpret(&self, path: &str, response: RawResponse) -> Result<Value, ClientError> {
        let body = parse_body(&response.body);
        let status = response.status;
        if (200..300).contains(&status) {
            return Ok(body);
        }

        let message = extract_message(&body).unwrap_or_else(|| format!("HTTP {status}"));
        let kind = match status {
            401 if self.settings.auth.is_auth_flow(path) => FailureKind::Validation(401),
            401 => FailureKind::Unauthorized,
            400..=499 => FailureKind::Validation(status),
            _ => FailureKind::Server(status),
        };
        Err(ClientError::new(kind, message))
    }

    /// Ensures a refresh newer than `observed` has happened. On failure the
    /// credentials are cleared; a pending verification is kept.
    async fn refresh_session(&self, observed: u64) -> Result<(), ClientError> {
        let _guard = self.refresh.lock.lock().await;
        if self.refresh.generation() != observed {
            novel_debug!("Session already refreshed by a concurrent request");
            return Ok(());
        }

        let Some(refresh_token) = self.store.get(SessionKey::RefreshToken) else {
            novel_warn!("Access token rejected and no refresh token stored; clearing credentials");
            self.clear_credentials();
            return Err(ClientError::new(
                FailureKind::Unauthorized,
                "no refresh token stored",
            ));
        };

        match self.request_new_tokens(&refresh_token).await {
            Ok(grant) => {
                if let Err(err) = grant.persist(self.store.as_ref()) {
                    novel_warn!("Refreshed tokens could not be persisted: {}", err);
                }
                self.refresh.generation.fetch_add(1, Ordering::AcqRel);
                novel_info!("Session refreshed, access token {}", redact(&grant.access_token));
                Ok(())
            }
            Err(err) => {
                novel_warn!("Token refresh failed: {}; clearing credentials", err);
                self.clear_credentials();
                Err(err)
            }
        }
    }

    async fn request_new_tokens(&self, refresh_token: &str) -> Result<SessionGrant, ClientError> {
        let path = self.settings.auth.refresh_path.clone();
        let body = json!({ "refreshToken": refresh_token });
        let options = RequestOptions {
            skip_auth: true,
            ..RequestOptions::default()
        };
        let call = self.prepare(Method::POST, &path, Some(&body), &options)?;
        let value = self.send_once(&call, None).await?;

        let response = normalize(value);
        if !response.success {
            return Err(ClientError::new(
                FailureKind::Unauthorized,
                if response.message.is_empty() {
                    "token refresh rejected".to_string()
                } else {
                    response.message
                },
            ));
        }
        SessionGrant::from_data(&response.data).ok_or_else(|| {
            ClientError::new(FailureKind::Decode, "refresh reply carried no access token")
        })
    }
}

/// Empty bodies become `null`, non-JSON bodies a JSON string.
fn parse_body(bytes: &[u8]) -> Value {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::parse_body;
    use serde_json::{json, Value};

    #[test]
    fn body_parsing_is_total() {
        assert_eq!(parse_body(b""), Value::Null);
        assert_eq!(parse_body(b" \n"), Value::Null);
        assert_eq!(parse_body(br#"{"a":1}"#), json!({ "a": 1 }));
        assert_eq!(parse_body(b"<html>oops</html>"), json!("<html>oops</html>"));
    }
}
