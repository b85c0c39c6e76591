use chrono::{TimeZone, Utc};
use novel_core::search::{filter_records, paginate, run, sort_records, tag_facets, total_pages};
use novel_core::{
    FilterQuery, NovelRecord, NovelStatus, SortDirection, SortKey, TagFacet, TagMatchMode,
    OTHER_CATEGORY,
};
use pretty_assertions::assert_eq;

fn novel(id: &str) -> NovelRecord {
    NovelRecord {
        id: id.to_string(),
        title: format!("title {id}"),
        ..NovelRecord::default()
    }
}

fn tagged(id: &str, tags: &[&str]) -> NovelRecord {
    NovelRecord {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        ..novel(id)
    }
}

fn ids(records: &[&NovelRecord]) -> Vec<String> {
    records.iter().map(|r| r.id.clone()).collect()
}

fn query_with_tags(tags: &[&str], mode: TagMatchMode) -> FilterQuery {
    FilterQuery {
        tags: tags.iter().map(|t| t.to_string()).collect(),
        tag_mode: mode,
        ..FilterQuery::default()
    }
}

#[test]
fn any_and_all_tag_modes_differ() {
    let records = vec![
        tagged("A", &["x", "y"]),
        tagged("B", &["x"]),
        tagged("C", &["y"]),
    ];

    let any = filter_records(&records, &query_with_tags(&["x", "y"], TagMatchMode::Any));
    assert_eq!(ids(&any), vec!["A", "B", "C"]);

    let all = filter_records(&records, &query_with_tags(&["x", "y"], TagMatchMode::All));
    assert_eq!(ids(&all), vec!["A"]);
}

#[test]
fn empty_tag_selection_passes_everything() {
    let records = vec![tagged("A", &["x"]), novel("B")];
    let hits = filter_records(&records, &query_with_tags(&[], TagMatchMode::All));
    assert_eq!(hits.len(), 2);
}

#[test]
fn other_sentinel_only_matches_when_selected() {
    let records = vec![
        NovelRecord {
            categories: vec![OTHER_CATEGORY.to_string()],
            ..novel("plain")
        },
        tagged("fantasy", &["玄幻"]),
    ];

    let hits = filter_records(&records, &query_with_tags(&[OTHER_CATEGORY], TagMatchMode::Any));
    assert_eq!(ids(&hits), vec!["plain"]);

    let hits = filter_records(&records, &query_with_tags(&["玄幻"], TagMatchMode::Any));
    assert_eq!(ids(&hits), vec!["fantasy"]);
}

#[test]
fn categories_count_as_tags() {
    let records = vec![NovelRecord {
        categories: vec!["都市".to_string()],
        ..novel("city")
    }];
    let hits = filter_records(&records, &query_with_tags(&["都市"], TagMatchMode::All));
    assert_eq!(hits.len(), 1);
}

#[test]
fn word_count_boundary_falls_in_both_neighbouring_buckets() {
    let records = vec![NovelRecord {
        word_count: 100_000,
        ..novel("edge")
    }];

    for bucket in [0, 1, 2] {
        let query = FilterQuery {
            word_count_bucket: bucket,
            ..FilterQuery::default()
        };
        assert_eq!(filter_records(&records, &query).len(), 1, "bucket {bucket}");
    }

    let query = FilterQuery {
        word_count_bucket: 3,
        ..FilterQuery::default()
    };
    assert!(filter_records(&records, &query).is_empty());
}

#[test]
fn keyword_matches_title_or_description_case_insensitively() {
    let records = vec![
        NovelRecord {
            title: "Star Sea".into(),
            ..novel("1")
        },
        NovelRecord {
            description: "a voyage across the STARS".into(),
            ..novel("2")
        },
        NovelRecord {
            title: "Mountain".into(),
            ..novel("3")
        },
    ];
    let query = FilterQuery {
        keyword: "  star ".into(),
        ..FilterQuery::default()
    };
    assert_eq!(ids(&filter_records(&records, &query)), vec!["1", "2"]);
}

#[test]
fn author_and_status_clauses_are_anded() {
    let records = vec![
        NovelRecord {
            author: "Lin Feng".into(),
            status: Some(NovelStatus::Completed),
            ..novel("1")
        },
        NovelRecord {
            author: "lin yu".into(),
            status: Some(NovelStatus::Ongoing),
            ..novel("2")
        },
        NovelRecord {
            author: "Zhao".into(),
            status: Some(NovelStatus::Completed),
            ..novel("3")
        },
    ];
    let query = FilterQuery {
        author: "LIN".into(),
        status: Some(NovelStatus::Completed),
        ..FilterQuery::default()
    };
    assert_eq!(ids(&filter_records(&records, &query)), vec!["1"]);
}

#[test]
fn records_without_a_status_fail_every_status_filter() {
    let records = vec![
        novel("1"),
        NovelRecord {
            status: Some(NovelStatus::Ongoing),
            ..novel("2")
        },
    ];
    let query = FilterQuery {
        status: Some(NovelStatus::Ongoing),
        ..FilterQuery::default()
    };
    assert_eq!(ids(&filter_records(&records, &query)), vec!["2"]);
    assert_eq!(filter_records(&records, &FilterQuery::default()).len(), 2);
}

#[test]
fn sorting_is_stable_for_equal_keys() {
    let records: Vec<NovelRecord> = [("a", 5), ("b", 3), ("c", 5), ("d", 3), ("e", 5)]
        .iter()
        .map(|(id, readers)| NovelRecord {
            readers: *readers,
            ..novel(id)
        })
        .collect();

    let mut refs: Vec<&NovelRecord> = records.iter().collect();
    sort_records(&mut refs, SortKey::Readers, SortDirection::Desc);
    assert_eq!(ids(&refs), vec!["a", "c", "e", "b", "d"]);

    let mut refs: Vec<&NovelRecord> = records.iter().collect();
    sort_records(&mut refs, SortKey::Readers, SortDirection::Asc);
    assert_eq!(ids(&refs), vec!["b", "d", "a", "c", "e"]);
}

#[test]
fn undated_records_sort_as_oldest() {
    let records = vec![
        novel("undated"),
        NovelRecord {
            updated_at: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..novel("old")
        },
        NovelRecord {
            updated_at: Some(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()),
            ..novel("new")
        },
    ];
    let mut refs: Vec<&NovelRecord> = records.iter().collect();
    sort_records(&mut refs, SortKey::UpdatedAt, SortDirection::Desc);
    assert_eq!(ids(&refs), vec!["new", "old", "undated"]);
}

#[test]
fn pagination_boundaries() {
    let records: Vec<NovelRecord> = (0..25).map(|i| novel(&i.to_string())).collect();

    assert_eq!(total_pages(records.len(), 9), 3);
    assert_eq!(paginate(&records, 1, 9).len(), 9);
    assert_eq!(paginate(&records, 3, 9).len(), 7);
    assert!(paginate(&records, 4, 9).is_empty());
    assert_eq!(paginate(&records, 3, 9)[0].id, "18");
}

#[test]
fn run_reports_counts_for_the_filtered_set() {
    let records: Vec<NovelRecord> = (0..25)
        .map(|i| {
            let mut r = novel(&i.to_string());
            r.collections = i;
            r
        })
        .collect();
    let query = FilterQuery {
        sort_key: SortKey::Collections,
        sort_direction: SortDirection::Desc,
        page: 3,
        ..FilterQuery::default()
    };

    let page = run(&records, &query);
    assert_eq!(page.filtered_count, 25);
    assert_eq!(page.total_pages, 3);
    assert_eq!(ids(&page.items), vec!["6", "5", "4", "3", "2", "1", "0"]);
}

#[test]
fn facets_are_ordered_by_usage_then_name() {
    let records = vec![
        tagged("1", &["b", "a"]),
        tagged("2", &["b"]),
        novel("3"),
    ];
    assert_eq!(
        tag_facets(&records),
        vec![
            TagFacet {
                tag: "b".into(),
                count: 2,
            },
            TagFacet {
                tag: "a".into(),
                count: 1,
            },
            TagFacet {
                tag: OTHER_CATEGORY.into(),
                count: 1,
            },
        ]
    );
}
