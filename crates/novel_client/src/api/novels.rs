use futures_util::stream::{self, StreamExt};
use novel_core::{ApiResponse, NovelRecord};
use novel_logging::{novel_debug, novel_warn};
use serde_json::Value;

use super::segment;
use crate::{ApiClient, RequestOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovelListQuery {
    pub page: u32,
    pub limit: u32,
    pub category: Option<String>,
    /// Backend sort field, e.g. `updatedAt` or `collections`.
    pub sort: Option<String>,
}

impl Default for NovelListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            category: None,
            sort: None,
        }
    }
}

impl NovelListQuery {
    fn options(&self) -> RequestOptions {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(category) = &self.category {
            pairs.push(("category".to_string(), category.clone()));
        }
        if let Some(sort) = &self.sort {
            pairs.push(("sort".to_string(), sort.clone()));
        }
        RequestOptions::with_query(pairs)
    }
}

pub struct NovelsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> NovelsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub async fn list(&self, query: &NovelListQuery) -> ApiResponse {
        self.client.get_with("/novels", &query.options()).await
    }

    pub async fn detail(&self, novel_id: &str) -> ApiResponse {
        self.client
            .get(&format!("/novels/{}", segment(novel_id)))
            .await
    }

    pub async fn chapters(&self, novel_id: &str) -> ApiResponse {
        self.client
            .get(&format!("/novels/{}/chapters", segment(novel_id)))
            .await
    }

    pub async fn chapter(&self, novel_id: &str, chapter_id: &str) -> ApiResponse {
        self.client
            .get(&format!(
                "/novels/{}/chapters/{}",
                segment(novel_id),
                segment(chapter_id)
            ))
            .await
    }

    pub async fn search(&self, keyword: &str, page: u32, limit: u32) -> ApiResponse {
        let options = RequestOptions::with_query([
            ("keyword", keyword.to_string()),
            ("page", page.to_string()),
            ("limit", limit.to_string()),
        ]);
        self.client.get_with("/novels/search", &options).await
    }

    pub async fn popular(&self, limit: u32) -> ApiResponse {
        let options = RequestOptions::with_query([("limit", limit)]);
        self.client.get_with("/novels/popular", &options).await
    }

    pub async fn latest(&self, limit: u32) -> ApiResponse {
        let options = RequestOptions::with_query([("limit", limit)]);
        self.client.get_with("/novels/latest", &options).await
    }

    pub async fn by_author(&self, author: &str) -> ApiResponse {
        self.client
            .get(&format!("/novels/author/{}", segment(author)))
            .await
    }

    /// Fetches several details concurrently, at most `fanout_limit` at a time.
    /// Results come back in the order of `novel_ids`.
    pub async fn details_for(&self, novel_ids: &[String]) -> Vec<ApiResponse> {
        let limit = self.client.settings().fanout_limit.max(1);
        novel_debug!("Fetching {} novel details, {} at a time", novel_ids.len(), limit);
        stream::iter(novel_ids)
            .map(|id| self.detail(id))
            .buffered(limit)
            .collect()
            .await
    }

    /// Loads one page of the listing as records for local filtering.
    pub async fn load_records(&self, query: &NovelListQuery) -> Result<Vec<NovelRecord>, String> {
        let response = self.list(query).await;
        if response.success {
            Ok(novel_records(&response.data))
        } else {
            Err(response.message)
        }
    }
}

/// Extracts novel records from a listing payload: either a bare array or an
/// object holding the array under a conventional key. Entries that do not
/// parse are skipped.
pub fn novel_records(data: &Value) -> Vec<NovelRecord> {
    let items = match data {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => ["novels", "items", "list", "rows", "data"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_array))
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<NovelRecord>(item.clone()) {
            Ok(record) => Some(record),
            Err(err) => {
                novel_warn!("Skipping unparseable novel entry: {}", err);
                None
            }
        })
        .collect()
}
