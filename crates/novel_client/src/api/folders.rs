use novel_core::ApiResponse;
use serde_json::json;

use super::segment;
use crate::ApiClient;

/// User-defined folders that group favorited novels.
pub struct FoldersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> FoldersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> ApiResponse {
        self.client.get("/folders").await
    }

    pub async fn create(&self, name: &str, description: &str) -> ApiResponse {
        let body = json!({ "name": name, "description": description });
        self.client.post("/folders", &body).await
    }

    pub async fn update(&self, folder_id: &str, name: &str, description: &str) -> ApiResponse {
        let body = json!({ "name": name, "description": description });
        self.client.put(&folder_path(folder_id), &body).await
    }

    pub async fn delete(&self, folder_id: &str) -> ApiResponse {
        self.client.delete(&folder_path(folder_id)).await
    }

    pub async fn favorites(&self, folder_id: &str) -> ApiResponse {
        self.client
            .get(&format!("{}/favorites", folder_path(folder_id)))
            .await
    }

    pub async fn add_favorite(&self, folder_id: &str, novel_id: &str) -> ApiResponse {
        let body = json!({ "novelId": novel_id });
        self.client
            .post(&format!("{}/favorites", folder_path(folder_id)), &body)
            .await
    }

    pub async fn remove_favorite(&self, folder_id: &str, novel_id: &str) -> ApiResponse {
        self.client
            .delete(&format!(
                "{}/favorites/{}",
                folder_path(folder_id),
                segment(novel_id)
            ))
            .await
    }
}

fn folder_path(folder_id: &str) -> String {
    format!("/folders/{}", segment(folder_id))
}
