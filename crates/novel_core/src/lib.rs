//! Novel core: pure search state machine, filtering engine and response normalizer.
mod effect;
mod msg;
mod normalize;
mod query;
mod record;
pub mod search;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use normalize::{
    extract_message, normalize, ApiResponse, ResponseShape, DEFAULT_SUCCESS_MESSAGE,
};
pub use query::{
    word_count_bucket, FilterQuery, SortDirection, SortKey, TagMatchMode, WordCountBucket,
    DEFAULT_PAGE_SIZE, WORD_COUNT_BUCKETS,
};
pub use record::{
    format_word_count, is_other_category, NovelRecord, NovelStatus, OTHER_CATEGORY,
    UNKNOWN_STATUS_LABEL,
};
pub use search::{SearchPage, TagFacet};
pub use state::SearchState;
pub use update::update;
pub use view_model::{NovelCard, SearchViewModel};
