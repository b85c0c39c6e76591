use crate::{NovelRecord, NovelStatus, SortKey};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User asked for (re)loading the novel list.
    Refresh,
    /// Backend reply for a `FetchNovels` effect.
    NovelsLoaded {
        generation: u64,
        result: Result<Vec<NovelRecord>, String>,
    },
    /// Search box edited.
    KeywordChanged(String),
    /// Author filter edited.
    AuthorChanged(String),
    StatusSelected(Option<NovelStatus>),
    /// Index into `WORD_COUNT_BUCKETS`.
    WordCountBucketSelected(usize),
    /// Tag chip clicked: selects or deselects it.
    TagToggled(String),
    TagsCleared,
    /// Switch between ALL-of and ANY-of tag matching.
    TagModeToggled,
    SortKeySelected(SortKey),
    SortDirectionToggled,
    /// Pager clicked. Filters are kept.
    PageSelected(usize),
    /// "Reset filters" button.
    FiltersReset,
    /// Fallback for placeholder wiring.
    NoOp,
}

