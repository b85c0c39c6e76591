use std::collections::BTreeSet;

use crate::NovelStatus;

pub const DEFAULT_PAGE_SIZE: usize = 9;

/// Inclusive word-count range offered by the search page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordCountBucket {
    pub label: &'static str,
    pub min: u64,
    pub max: u64,
}

impl WordCountBucket {
    pub fn contains(&self, words: u64) -> bool {
        self.min <= words && words <= self.max
    }
}

/// Index 0 is the unrestricted bucket. Neighbouring buckets share their
/// boundary value, so e.g. exactly 100 000 words falls into both 1 and 2.
pub const WORD_COUNT_BUCKETS: [WordCountBucket; 6] = [
    WordCountBucket {
        label: "全部",
        min: 0,
        max: u64::MAX,
    },
    WordCountBucket {
        label: "10万以下",
        min: 0,
        max: 100_000,
    },
    WordCountBucket {
        label: "10万-30万",
        min: 100_000,
        max: 300_000,
    },
    WordCountBucket {
        label: "30万-50万",
        min: 300_000,
        max: 500_000,
    },
    WordCountBucket {
        label: "50万-100万",
        min: 500_000,
        max: 1_000_000,
    },
    WordCountBucket {
        label: "100万以上",
        min: 1_000_000,
        max: u64::MAX,
    },
];

/// Unknown indices behave like the "all" bucket.
pub fn word_count_bucket(index: usize) -> &'static WordCountBucket {
    WORD_COUNT_BUCKETS
        .get(index)
        .unwrap_or(&WORD_COUNT_BUCKETS[0])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TagMatchMode {
    /// Every selected tag must be present.
    All,
    /// At least one selected tag must be present.
    #[default]
    Any,
}

impl TagMatchMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::All => Self::Any,
            Self::Any => Self::All,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    UpdatedAt,
    Collections,
    Readers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    Asc,
    #[default]
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterQuery {
    pub keyword: String,
    pub author: String,
    pub status: Option<NovelStatus>,
    pub word_count_bucket: usize,
    pub tags: BTreeSet<String>,
    pub tag_mode: TagMatchMode,
    pub sort_key: SortKey,
    pub sort_direction: SortDirection,
    /// 1-based.
    pub page: usize,
    pub page_size: usize,
}

impl Default for FilterQuery {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            author: String::new(),
            status: None,
            word_count_bucket: 0,
            tags: BTreeSet::new(),
            tag_mode: TagMatchMode::default(),
            sort_key: SortKey::default(),
            sort_direction: SortDirection::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl FilterQuery {
    /// Clears every filter but keeps the page size.
    pub fn reset_filters(&mut self) {
        *self = Self {
            page_size: self.page_size,
            ..Self::default()
        };
    }
}
