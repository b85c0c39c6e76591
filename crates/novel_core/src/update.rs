use crate::{Effect, Msg, SearchState};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: SearchState, msg: Msg) -> (SearchState, Vec<Effect>) {
    let effects = match msg {
        Msg::Refresh => {
            let generation = state.begin_load();
            vec![Effect::FetchNovels { generation }]
        }
        Msg::NovelsLoaded { generation, result } => {
            // A stale reply is dropped silently; the newer load will land later.
            let _ = state.finish_load(generation, result);
            Vec::new()
        }
        Msg::KeywordChanged(keyword) => {
            state.edit_filters(|q| q.keyword = keyword);
            Vec::new()
        }
        Msg::AuthorChanged(author) => {
            state.edit_filters(|q| q.author = author);
            Vec::new()
        }
        Msg::StatusSelected(status) => {
            state.edit_filters(|q| q.status = status);
            Vec::new()
        }
        Msg::WordCountBucketSelected(index) => {
            state.edit_filters(|q| q.word_count_bucket = index);
            Vec::new()
        }
        Msg::TagToggled(tag) => {
            state.edit_filters(|q| {
                if !q.tags.remove(&tag) {
                    q.tags.insert(tag);
                }
            });
            Vec::new()
        }
        Msg::TagsCleared => {
            state.edit_filters(|q| q.tags.clear());
            Vec::new()
        }
        Msg::TagModeToggled => {
            state.edit_filters(|q| q.tag_mode = q.tag_mode.toggled());
            Vec::new()
        }
        Msg::SortKeySelected(key) => {
            state.edit_filters(|q| q.sort_key = key);
            Vec::new()
        }
        Msg::SortDirectionToggled => {
            state.edit_filters(|q| q.sort_direction = q.sort_direction.toggled());
            Vec::new()
        }
        Msg::PageSelected(page) => {
            state.select_page(page);
            Vec::new()
        }
        Msg::FiltersReset => {
            state.edit_filters(|q| q.reset_filters());
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
