use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Category the backend uses for uncategorised novels.
pub const OTHER_CATEGORY: &str = "其他";
const OTHER_CATEGORY_EN: &str = "Other";

/// Label shown for a record whose status is missing or unrecognised.
pub const UNKNOWN_STATUS_LABEL: &str = "未知";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NovelStatus {
    Ongoing,
    Completed,
    Paused,
}

impl NovelStatus {
    /// Accepts both the API codes and the display labels.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ongoing" | "serializing" | "连载中" | "连载" => Some(Self::Ongoing),
            "completed" | "finished" | "已完结" | "完结" => Some(Self::Completed),
            "paused" | "hiatus" | "暂停" | "已暂停" => Some(Self::Paused),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Ongoing => "连载中",
            Self::Completed => "已完结",
            Self::Paused => "暂停",
        }
    }
}

/// A novel as listed by the backend. Read-only on the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct NovelRecord {
    #[serde(alias = "_id", deserialize_with = "lenient_id", default)]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(deserialize_with = "lenient_author", default)]
    pub author: String,
    #[serde(deserialize_with = "lenient_text", default)]
    pub description: String,
    #[serde(alias = "coverImage", deserialize_with = "lenient_text", default)]
    pub cover: String,
    #[serde(alias = "category", deserialize_with = "string_list", default)]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "string_list", default)]
    pub tags: Vec<String>,
    /// `None` when the backend sent no status or one we do not know.
    #[serde(deserialize_with = "lenient_status", default)]
    pub status: Option<NovelStatus>,
    #[serde(deserialize_with = "lenient_count", default)]
    pub word_count: u64,
    #[serde(
        alias = "favoriteCount",
        alias = "collectionCount",
        deserialize_with = "lenient_count",
        default
    )]
    pub collections: u64,
    #[serde(alias = "readCount", deserialize_with = "lenient_count", default)]
    pub readers: u64,
    #[serde(
        alias = "updateTime",
        alias = "updated_at",
        deserialize_with = "lenient_timestamp",
        default
    )]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NovelRecord {
    pub fn status_label(&self) -> &'static str {
        self.status.map_or(UNKNOWN_STATUS_LABEL, NovelStatus::label)
    }

    /// Union of categories (minus the "other" sentinel) and tags, in first-seen
    /// order. Falls back to the sentinel alone when nothing is left.
    pub fn effective_tags(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let categories = self
            .categories
            .iter()
            .filter(|c| !is_other_category(c));
        for tag in categories.chain(self.tags.iter()) {
            let tag = tag.trim();
            if !tag.is_empty() && !out.iter().any(|t| t == tag) {
                out.push(tag.to_string());
            }
        }
        if out.is_empty() {
            out.push(OTHER_CATEGORY.to_string());
        }
        out
    }

    pub fn word_count_display(&self) -> String {
        format_word_count(self.word_count)
    }
}

pub fn is_other_category(name: &str) -> bool {
    let name = name.trim();
    name == OTHER_CATEGORY || name.eq_ignore_ascii_case(OTHER_CATEGORY_EN)
}

/// `9800` -> `9800字`, `123456` -> `12.3万字`.
pub fn format_word_count(words: u64) -> String {
    if words < 10_000 {
        format!("{words}字")
    } else {
        format!("{:.1}万字", words as f64 / 10_000.0)
    }
}

fn lenient_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

fn lenient_status<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NovelStatus>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().and_then(NovelStatus::parse))
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        _ => String::new(),
    })
}

// Some endpoints embed the author as `{ "username": .. }`.
fn lenient_author<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Object(map) => ["penName", "username", "name"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .unwrap_or_default()
            .to_string(),
        _ => String::new(),
    })
}

fn string_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |s: &str| {
        let s = s.trim();
        if !s.is_empty() && !out.iter().any(|t| t == s) {
            out.push(s.to_string());
        }
    };
    match Value::deserialize(deserializer)? {
        Value::String(s) => push(&s),
        Value::Array(items) => {
            for item in items {
                if let Some(s) = item.as_str() {
                    push(s);
                }
            }
        }
        _ => {}
    }
    Ok(out)
}

fn lenient_count<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_loose_backend_shapes() {
        let record: NovelRecord = serde_json::from_value(json!({
            "_id": 42,
            "title": "长夜",
            "author": { "username": "lin" },
            "category": "玄幻",
            "tags": ["热血", "热血", " "],
            "status": "已完结",
            "wordCount": "120000",
            "favoriteCount": 7,
            "updateTime": "2024-03-01T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(record.id, "42");
        assert_eq!(record.author, "lin");
        assert_eq!(record.categories, vec!["玄幻"]);
        assert_eq!(record.tags, vec!["热血"]);
        assert_eq!(record.status, Some(NovelStatus::Completed));
        assert_eq!(record.status_label(), "已完结");
        assert_eq!(record.word_count, 120_000);
        assert_eq!(record.collections, 7);
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn unknown_or_missing_status_stays_unknown() {
        let draft: NovelRecord =
            serde_json::from_value(json!({ "title": "x", "status": "draft" })).unwrap();
        assert_eq!(draft.status, None);
        assert_eq!(draft.status_label(), UNKNOWN_STATUS_LABEL);

        let bare: NovelRecord = serde_json::from_value(json!({ "title": "y" })).unwrap();
        assert_eq!(bare.status, None);
    }

    #[test]
    fn effective_tags_drop_other_and_fall_back_to_it() {
        let record = NovelRecord {
            categories: vec!["其他".into(), "科幻".into()],
            tags: vec!["科幻".into(), "硬核".into()],
            ..NovelRecord::default()
        };
        assert_eq!(record.effective_tags(), vec!["科幻", "硬核"]);

        let bare = NovelRecord {
            categories: vec!["Other".into()],
            ..NovelRecord::default()
        };
        assert_eq!(bare.effective_tags(), vec![OTHER_CATEGORY]);
    }

    #[test]
    fn word_count_display() {
        assert_eq!(format_word_count(9_800), "9800字");
        assert_eq!(format_word_count(123_456), "12.3万字");
    }
}
