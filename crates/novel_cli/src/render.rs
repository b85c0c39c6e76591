//! Plain-text rendering of view models and backend payloads.
use std::fmt::Write;

use novel_core::{NovelCard, NovelRecord, SearchViewModel, TagMatchMode};
use serde_json::Value;

pub fn search_view(view: &SearchViewModel, with_facets: bool) -> String {
    let mut out = String::new();
    if let Some(error) = &view.error {
        let _ = writeln!(out, "error: {error}");
    }
    if view.filtered_count == 0 {
        let _ = writeln!(out, "No novels match ({} loaded).", view.total_count);
    } else {
        let _ = writeln!(
            out,
            "{} of {} novels match, page {}/{}",
            view.filtered_count, view.total_count, view.page, view.total_pages
        );
    }
    if !view.selected_tags.is_empty() {
        let mode = match view.tag_mode {
            TagMatchMode::All => "all of",
            TagMatchMode::Any => "any of",
        };
        let _ = writeln!(out, "tags ({mode}): {}", view.selected_tags.join(", "));
    }

    for card in &view.cards {
        out.push('\n');
        out.push_str(&card_block(card));
    }

    if with_facets && !view.facets.is_empty() {
        out.push_str("\nTags:\n");
        for facet in &view.facets {
            let _ = writeln!(out, "  {} ({})", facet.tag, facet.count);
        }
    }
    out
}

fn card_block(card: &NovelCard) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "[{}] {}  by {}",
        card.id,
        card.title,
        author_or_unknown(&card.author)
    );
    let _ = writeln!(
        out,
        "    {} | {} | {} collections | {} readers",
        card.status_label, card.word_count, card.collections, card.readers
    );
    if !card.tags.is_empty() {
        let _ = writeln!(out, "    {}", card.tags.join(" / "));
    }
    out
}

/// Novel detail followed by the chapter list, when there is one.
pub fn novel_detail(record: &NovelRecord, chapters: &Value) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", record.title);
    let _ = writeln!(out, "by {}", author_or_unknown(&record.author));
    let _ = writeln!(
        out,
        "{} | {} | {} collections | {} readers",
        record.status_label(),
        record.word_count_display(),
        record.collections,
        record.readers
    );
    let tags = record.effective_tags();
    let _ = writeln!(out, "tags: {}", tags.join(", "));
    if let Some(updated) = record.updated_at {
        let _ = writeln!(out, "updated {}", updated.format("%Y-%m-%d %H:%M"));
    }
    if !record.description.is_empty() {
        let _ = writeln!(out, "\n{}", record.description);
    }

    let entries = chapter_entries(chapters);
    if !entries.is_empty() {
        let _ = writeln!(out, "\nChapters ({}):", entries.len());
        for (id, title) in entries {
            let _ = writeln!(out, "  [{id}] {title}");
        }
    }
    out
}

pub fn chapter(data: &Value) -> String {
    let chapter = data.get("chapter").unwrap_or(data);
    let title = text(chapter, "title");
    let content = text(chapter, "content");
    let mut out = String::new();
    if !title.is_empty() {
        let _ = writeln!(out, "{title}\n");
    }
    let _ = writeln!(out, "{content}");
    out
}

/// Finds the novel object in a detail payload, which is either the record
/// itself or `{ novel: { .. } }`.
pub fn novel_payload(data: &Value) -> &Value {
    data.get("novel").filter(|v| v.is_object()).unwrap_or(data)
}

pub fn user_line(user: &Value) -> String {
    let name = ["penName", "username", "name"]
        .iter()
        .map(|key| text(user, key))
        .find(|s| !s.is_empty())
        .unwrap_or_default();
    let email = text(user, "email");
    match (name.is_empty(), email.is_empty()) {
        (false, false) => format!("{name} <{email}>"),
        (false, true) => name,
        (true, false) => email,
        (true, true) => user.to_string(),
    }
}

fn chapter_entries(chapters: &Value) -> Vec<(String, String)> {
    let items = match chapters {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => map
            .get("chapters")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };
    items
        .iter()
        .map(|item| {
            let id = ["id", "_id"]
                .iter()
                .map(|key| scalar(item, key))
                .find(|s| !s.is_empty())
                .unwrap_or_default();
            (id, text(item, "title"))
        })
        .collect()
}

fn author_or_unknown(author: &str) -> &str {
    if author.is_empty() {
        "unknown author"
    } else {
        author
    }
}

fn text(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn scalar(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use novel_core::{update, Msg, SearchState};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record(id: &str, title: &str, tags: &[&str]) -> NovelRecord {
        NovelRecord {
            id: id.to_string(),
            title: title.to_string(),
            author: "青山".to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            word_count: 123_456,
            ..NovelRecord::default()
        }
    }

    fn loaded(records: Vec<NovelRecord>) -> SearchState {
        let (state, _) = update(SearchState::new(), Msg::Refresh);
        let generation = state.generation();
        let (state, _) = update(
            state,
            Msg::NovelsLoaded {
                generation,
                result: Ok(records),
            },
        );
        state
    }

    #[test]
    fn search_view_lists_cards_and_summary() {
        let state = loaded(vec![
            record("1", "星河", &["科幻"]),
            record("2", "雾港", &["悬疑"]),
        ]);
        let text = search_view(&state.view(), false);

        assert!(text.starts_with("2 of 2 novels match, page 1/1\n"));
        assert!(text.contains("[1] 星河  by 青山"));
        assert!(text.contains("12.3万字"));
        assert!(!text.contains("Tags:"));
    }

    #[test]
    fn empty_result_is_reported() {
        let state = loaded(vec![record("1", "星河", &["科幻"])]);
        let (state, _) = update(state, Msg::KeywordChanged("不存在".to_string()));
        let text = search_view(&state.view(), false);
        assert_eq!(text, "No novels match (1 loaded).\n");
    }

    #[test]
    fn facets_are_optional() {
        let state = loaded(vec![record("1", "星河", &["科幻"])]);
        let text = search_view(&state.view(), true);
        assert!(text.ends_with("Tags:\n  科幻 (1)\n"));
    }

    #[test]
    fn detail_includes_chapters() {
        let novel = record("1", "星河", &[]);
        let chapters = json!({
            "chapters": [{ "_id": "c1", "title": "序章" }, { "id": 2, "title": "启航" }]
        });
        let text = novel_detail(&novel, &chapters);
        assert!(text.contains("tags: 其他"));
        assert!(text.contains("Chapters (2):\n  [c1] 序章\n  [2] 启航\n"));
    }

    #[test]
    fn payload_helpers_unwrap_nesting() {
        let nested = json!({ "novel": { "title": "星河" } });
        assert_eq!(novel_payload(&nested), &json!({ "title": "星河" }));
        let nested_chapter = json!({ "chapter": { "title": "序章", "content": "夜。" } });
        assert_eq!(chapter(&nested_chapter), "序章\n\n夜。\n");
        assert_eq!(
            user_line(&json!({ "username": "lin", "email": "l@x.y" })),
            "lin <l@x.y>"
        );
    }
}
