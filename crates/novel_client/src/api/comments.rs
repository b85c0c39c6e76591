use novel_core::ApiResponse;
use serde_json::json;

use super::segment;
use crate::{ApiClient, RequestOptions};

pub struct CommentsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CommentsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn for_novel(&self, novel_id: &str, page: u32) -> ApiResponse {
        let options = RequestOptions::with_query([("page", page)]);
        self.client
            .get_with(&format!("/comments/novel/{}", segment(novel_id)), &options)
            .await
    }

    /// `chapter_id` scopes the comment to one chapter instead of the whole novel.
    pub async fn create(
        &self,
        novel_id: &str,
        chapter_id: Option<&str>,
        content: &str,
    ) -> ApiResponse {
        let body = json!({
            "novelId": novel_id,
            "chapterId": chapter_id,
            "content": content,
        });
        self.client.post("/comments", &body).await
    }

    pub async fn delete(&self, comment_id: &str) -> ApiResponse {
        self.client
            .delete(&format!("/comments/{}", segment(comment_id)))
            .await
    }

    pub async fn like(&self, comment_id: &str) -> ApiResponse {
        self.client
            .post(&format!("/comments/{}/like", segment(comment_id)), &json!({}))
            .await
    }

    pub async fn reply(&self, comment_id: &str, content: &str) -> ApiResponse {
        let body = json!({ "content": content });
        self.client
            .post(&format!("/comments/{}/reply", segment(comment_id)), &body)
            .await
    }
}
