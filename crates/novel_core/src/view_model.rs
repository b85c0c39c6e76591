use crate::search::TagFacet;
use crate::{NovelRecord, TagMatchMode};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchViewModel {
    pub cards: Vec<NovelCard>,
    pub page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub total_count: usize,
    pub facets: Vec<TagFacet>,
    pub selected_tags: Vec<String>,
    pub tag_mode: TagMatchMode,
    pub loading: bool,
    pub error: Option<String>,
    pub dirty: bool,
}

/// One result tile with its display fields precomputed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NovelCard {
    pub id: String,
    pub title: String,
    pub author: String,
    pub cover: String,
    pub status_label: &'static str,
    pub word_count: String,
    pub collections: u64,
    pub readers: u64,
    pub tags: Vec<String>,
}

impl NovelCard {
    pub fn from_record(record: &NovelRecord) -> Self {
        Self {
            id: record.id.clone(),
            title: record.title.clone(),
            author: record.author.clone(),
            cover: record.cover.clone(),
            status_label: record.status_label(),
            word_count: record.word_count_display(),
            collections: record.collections,
            readers: record.readers,
            tags: record.effective_tags(),
        }
    }
}
