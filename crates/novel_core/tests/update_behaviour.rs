use std::sync::Once;

use novel_core::{update, Effect, Msg, NovelRecord, SearchState, SortKey, TagMatchMode};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(novel_logging::initialize_for_tests);
}

fn novels(count: usize) -> Vec<NovelRecord> {
    (0..count)
        .map(|i| NovelRecord {
            id: i.to_string(),
            title: format!("novel {i}"),
            tags: if i % 2 == 0 { vec!["even".into()] } else { vec![] },
            ..NovelRecord::default()
        })
        .collect()
}

fn loaded(count: usize) -> SearchState {
    let (state, effects) = update(SearchState::new(), Msg::Refresh);
    let generation = match effects.as_slice() {
        [Effect::FetchNovels { generation }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::NovelsLoaded {
            generation,
            result: Ok(novels(count)),
        },
    );
    state
}

#[test]
fn refresh_emits_fetch_and_marks_loading() {
    init_logging();
    let (state, effects) = update(SearchState::new(), Msg::Refresh);

    assert_eq!(effects, vec![Effect::FetchNovels { generation: 1 }]);
    assert!(state.view().loading);
}

#[test]
fn stale_load_results_are_ignored() {
    init_logging();
    let (state, _) = update(SearchState::new(), Msg::Refresh);
    let (state, _) = update(state, Msg::Refresh);
    assert_eq!(state.generation(), 2);

    let (state, _) = update(
        state,
        Msg::NovelsLoaded {
            generation: 1,
            result: Ok(novels(3)),
        },
    );
    assert_eq!(state.view().total_count, 0);
    assert!(state.view().loading);

    let (state, _) = update(
        state,
        Msg::NovelsLoaded {
            generation: 2,
            result: Ok(novels(5)),
        },
    );
    let view = state.view();
    assert_eq!(view.total_count, 5);
    assert!(!view.loading);
}

#[test]
fn load_failure_is_reported_and_keeps_previous_records() {
    init_logging();
    let state = loaded(4);
    let (state, effects) = update(state, Msg::Refresh);
    let generation = match effects.as_slice() {
        [Effect::FetchNovels { generation }] => *generation,
        other => panic!("unexpected effects {other:?}"),
    };
    let (state, _) = update(
        state,
        Msg::NovelsLoaded {
            generation,
            result: Err("network down".into()),
        },
    );

    let view = state.view();
    assert_eq!(view.error.as_deref(), Some("network down"));
    assert_eq!(view.total_count, 4);
}

#[test]
fn page_selection_keeps_filters_and_clamps() {
    init_logging();
    let state = loaded(25);
    let (state, _) = update(state, Msg::KeywordChanged("novel".into()));
    let (state, _) = update(state, Msg::PageSelected(3));

    let view = state.view();
    assert_eq!(view.page, 3);
    assert_eq!(view.cards.len(), 7);
    assert_eq!(state.query().keyword, "novel");

    let (state, _) = update(state, Msg::PageSelected(99));
    assert_eq!(state.view().page, 3);

    let (state, _) = update(state, Msg::PageSelected(0));
    assert_eq!(state.view().page, 1);
}

#[test]
fn filter_changes_reset_page() {
    init_logging();
    let filter_msgs = vec![
        Msg::KeywordChanged("novel 1".into()),
        Msg::AuthorChanged("x".into()),
        Msg::WordCountBucketSelected(1),
        Msg::TagToggled("even".into()),
        Msg::TagModeToggled,
        Msg::SortKeySelected(SortKey::Readers),
        Msg::SortDirectionToggled,
        Msg::FiltersReset,
    ];

    for msg in filter_msgs {
        let (state, _) = update(loaded(25), Msg::PageSelected(2));
        assert_eq!(state.view().page, 2);
        let (state, _) = update(state, msg.clone());
        assert_eq!(state.view().page, 1, "{msg:?}");
    }
}

#[test]
fn tag_toggle_selects_and_deselects() {
    init_logging();
    let state = loaded(10);
    let (state, _) = update(state, Msg::TagToggled("even".into()));
    let view = state.view();
    assert_eq!(view.selected_tags, vec!["even".to_string()]);
    assert_eq!(view.filtered_count, 5);

    let (state, _) = update(state, Msg::TagModeToggled);
    assert_eq!(state.view().tag_mode, TagMatchMode::All);

    let (state, _) = update(state, Msg::TagToggled("even".into()));
    assert!(state.view().selected_tags.is_empty());
    assert_eq!(state.view().filtered_count, 10);
}

#[test]
fn unchanged_filter_does_not_mark_dirty() {
    init_logging();
    let mut state = loaded(3);
    assert!(state.consume_dirty());

    let (mut state, _) = update(state, Msg::KeywordChanged(String::new()));
    assert!(!state.consume_dirty());

    let (mut state, _) = update(state, Msg::KeywordChanged("novel".into()));
    assert!(state.consume_dirty());
}

#[test]
fn cards_carry_display_fields() {
    init_logging();
    let state = loaded(2);
    let view = state.view();
    assert_eq!(view.cards[0].status_label, "未知");
    assert_eq!(view.cards[0].word_count, "0字");
    assert_eq!(view.cards[1].tags, vec!["其他".to_string()]);
}
