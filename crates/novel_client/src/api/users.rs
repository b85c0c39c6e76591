use novel_core::ApiResponse;
use novel_logging::{novel_debug, novel_warn};
use reqwest::Method;
use serde::Serialize;
use serde_json::json;

use super::segment;
use crate::session::SessionKey;
use crate::{ApiClient, RequestOptions};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pen_name: Option<String>,
}

pub struct UsersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> UsersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn profile(&self) -> ApiResponse {
        let response = self.client.get("/users/profile").await;
        if response.success && response.data.is_object() {
            self.cache_user(&response);
        }
        response
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResponse {
        let response = self
            .client
            .send_json(Method::PUT, "/users/profile", update)
            .await;
        if response.success && response.data.is_object() {
            self.cache_user(&response);
        }
        response
    }

    pub async fn change_password(&self, current: &str, new: &str) -> ApiResponse {
        let body = json!({ "currentPassword": current, "newPassword": new });
        self.client.put("/users/password", &body).await
    }

    /// Deletes the account; the local session goes with it.
    pub async fn delete_account(&self, password: &str) -> ApiResponse {
        let body = json!({ "password": password });
        let response = self
            .client
            .call(
                Method::DELETE,
                "/users/account",
                Some(&body),
                &RequestOptions::default(),
            )
            .await;
        if response.success {
            self.client.clear_session();
        }
        response
    }

    pub async fn reading_history(&self, page: u32) -> ApiResponse {
        let options = RequestOptions::with_query([("page", page)]);
        self.client
            .get_with("/users/reading-history", &options)
            .await
    }

    /// Best effort: a failure is logged and otherwise ignored.
    pub async fn record_reading(&self, novel_id: &str, chapter_id: &str) {
        let body = json!({ "novelId": novel_id, "chapterId": chapter_id });
        let response = self.client.post("/users/reading-history", &body).await;
        if response.success {
            novel_debug!("Recorded reading of {}/{}", novel_id, chapter_id);
        } else {
            novel_warn!("Reading history not recorded: {}", response.message);
        }
    }

    pub async fn favorites(&self) -> ApiResponse {
        self.client.get("/users/favorites").await
    }

    pub async fn add_favorite(&self, novel_id: &str, group_id: Option<&str>) -> ApiResponse {
        let body = json!({ "novelId": novel_id, "groupId": group_id });
        self.client.post("/users/favorites", &body).await
    }

    pub async fn remove_favorite(&self, novel_id: &str) -> ApiResponse {
        self.client
            .delete(&format!("/users/favorites/{}", segment(novel_id)))
            .await
    }

    pub async fn favorite_groups(&self) -> ApiResponse {
        self.client.get("/users/favorite-groups").await
    }

    pub async fn create_favorite_group(&self, name: &str) -> ApiResponse {
        let body = json!({ "name": name });
        self.client.post("/users/favorite-groups", &body).await
    }

    fn cache_user(&self, response: &ApiResponse) {
        if let Err(err) = self
            .client
            .store()
            .set(SessionKey::User, &response.data.to_string())
        {
            novel_warn!("Could not cache user profile: {}", err);
        }
    }
}
