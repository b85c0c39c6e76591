use novel_core::{ApiResponse, NovelStatus};
use reqwest::Method;
use serde::Serialize;

use super::segment;
use crate::ApiClient;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NovelDraft {
    pub title: String,
    pub description: String,
    pub categories: Vec<String>,
    pub tags: Vec<String>,
    pub status: NovelStatus,
    /// Path of an already uploaded cover image.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterDraft {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chapter_number: Option<u32>,
}

/// Author dashboard. Everything here lives under `/author` and always carries
/// the bearer token.
pub struct AuthorApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthorApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn dashboard_stats(&self) -> ApiResponse {
        self.client.get("/author/dashboard/stats").await
    }

    pub async fn novels(&self) -> ApiResponse {
        self.client.get("/author/novels").await
    }

    pub async fn novel(&self, novel_id: &str) -> ApiResponse {
        self.client.get(&novel_path(novel_id)).await
    }

    pub async fn create_novel(&self, draft: &NovelDraft) -> ApiResponse {
        self.client
            .send_json(Method::POST, "/author/novels", draft)
            .await
    }

    pub async fn update_novel(&self, novel_id: &str, draft: &NovelDraft) -> ApiResponse {
        self.client
            .send_json(Method::PUT, &novel_path(novel_id), draft)
            .await
    }

    pub async fn delete_novel(&self, novel_id: &str) -> ApiResponse {
        self.client.delete(&novel_path(novel_id)).await
    }

    pub async fn chapters(&self, novel_id: &str) -> ApiResponse {
        self.client
            .get(&format!("{}/chapters", novel_path(novel_id)))
            .await
    }

    pub async fn create_chapter(&self, novel_id: &str, draft: &ChapterDraft) -> ApiResponse {
        self.client
            .send_json(
                Method::POST,
                &format!("{}/chapters", novel_path(novel_id)),
                draft,
            )
            .await
    }

    pub async fn update_chapter(
        &self,
        novel_id: &str,
        chapter_id: &str,
        draft: &ChapterDraft,
    ) -> ApiResponse {
        self.client
            .send_json(Method::PUT, &chapter_path(novel_id, chapter_id), draft)
            .await
    }

    pub async fn delete_chapter(&self, novel_id: &str, chapter_id: &str) -> ApiResponse {
        self.client
            .delete(&chapter_path(novel_id, chapter_id))
            .await
    }
}

fn novel_path(novel_id: &str) -> String {
    format!("/author/novels/{}", segment(novel_id))
}

fn chapter_path(novel_id: &str, chapter_id: &str) -> String {
    format!("{}/chapters/{}", novel_path(novel_id), segment(chapter_id))
}
