use novel_core::ApiResponse;
use novel_logging::{novel_info, novel_warn};
use serde::Serialize;
use serde_json::{json, Value};

use crate::session::{stored_user, SessionGrant, SessionKey};
use crate::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Login, registration and email verification. Successful replies that carry
/// tokens start a session in the client's store.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// `identifier` is an email address or a username.
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResponse {
        let field = if identifier.contains('@') { "email" } else { "username" };
        let body = json!({ field: identifier, "password": password });
        let response = self.client.post("/auth/login", &body).await;
        if response.success {
            self.adopt(&response.data);
        }
        response
    }

    /// On success without tokens the email is remembered as pending verification.
    pub async fn register(&self, form: &RegisterForm) -> ApiResponse {
        let response = self
            .client
            .send_json(reqwest::Method::POST, "/auth/register", form)
            .await;
        if !response.success {
            return response;
        }

        if needs_verification(&response.data) || !self.adopt(&response.data) {
            if let Err(err) = self
                .client
                .store()
                .set(SessionKey::PendingVerification, &form.email)
            {
                novel_warn!("Could not remember pending verification: {}", err);
            }
        }
        response
    }

    pub async fn verify_email(&self, email: &str, code: &str) -> ApiResponse {
        let body = json!({ "email": email, "code": code });
        let response = self.client.post("/auth/verify-email", &body).await;
        if response.success {
            self.adopt(&response.data);
            if let Err(err) = self.client.store().remove(SessionKey::PendingVerification) {
                novel_warn!("Could not clear pending verification: {}", err);
            }
        }
        response
    }

    /// Ends the session locally. The backend keeps no server-side session to revoke.
    pub fn logout(&self) {
        self.client.clear_session();
        novel_info!("Logged out");
    }

    pub fn current_user(&self) -> Option<Value> {
        stored_user(self.client.store())
    }

    pub fn pending_verification(&self) -> Option<String> {
        self.client.store().get(SessionKey::PendingVerification)
    }

    pub fn is_authenticated(&self) -> bool {
        self.client.store().get(SessionKey::AccessToken).is_some()
    }

    /// Persists tokens found in `data`; returns whether there were any.
    fn adopt(&self, data: &Value) -> bool {
        let Some(grant) = SessionGrant::from_data(data) else {
            return false;
        };
        if let Err(err) = grant.persist(self.client.store()) {
            novel_warn!("Could not persist session: {}", err);
        }
        true
    }
}

fn needs_verification(data: &Value) -> bool {
    ["requiresVerification", "needVerification", "needsVerification"]
        .iter()
        .any(|key| data.get(*key).and_then(Value::as_bool) == Some(true))
}
