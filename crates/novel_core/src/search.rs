//! Client-side filtering, sorting and pagination over a loaded novel list.
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::query::word_count_bucket;
use crate::{FilterQuery, NovelRecord, SortDirection, SortKey, TagMatchMode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFacet {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage<'a> {
    pub items: Vec<&'a NovelRecord>,
    pub filtered_count: usize,
    pub total_pages: usize,
    pub page: usize,
}

/// True when `record` passes every non-empty clause of `query`.
pub fn matches(record: &NovelRecord, query: &FilterQuery) -> bool {
    let keyword = query.keyword.trim().to_lowercase();
    if !keyword.is_empty()
        && !record.title.to_lowercase().contains(&keyword)
        && !record.description.to_lowercase().contains(&keyword)
    {
        return false;
    }

    let author = query.author.trim().to_lowercase();
    if !author.is_empty() && !record.author.to_lowercase().contains(&author) {
        return false;
    }

    if let Some(status) = query.status {
        if record.status != Some(status) {
            return false;
        }
    }

    if !word_count_bucket(query.word_count_bucket).contains(record.word_count) {
        return false;
    }

    matches_tags(record, query)
}

fn matches_tags(record: &NovelRecord, query: &FilterQuery) -> bool {
    if query.tags.is_empty() {
        return true;
    }
    let effective = record.effective_tags();
    let has = |tag: &String| effective.iter().any(|t| t == tag);
    match query.tag_mode {
        TagMatchMode::Any => query.tags.iter().any(has),
        TagMatchMode::All => query.tags.iter().all(has),
    }
}

pub fn filter_records<'a>(records: &'a [NovelRecord], query: &FilterQuery) -> Vec<&'a NovelRecord> {
    records.iter().filter(|r| matches(r, query)).collect()
}

/// Stable: records with equal keys keep their relative order in either direction.
pub fn sort_records(records: &mut [&NovelRecord], key: SortKey, direction: SortDirection) {
    records.sort_by(|a, b| {
        let ord = compare_by(a, b, key);
        match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    });
}

fn compare_by(a: &NovelRecord, b: &NovelRecord, key: SortKey) -> Ordering {
    match key {
        // `None < Some(_)`, so undated records sort as the oldest.
        SortKey::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortKey::Collections => a.collections.cmp(&b.collections),
        SortKey::Readers => a.readers.cmp(&b.readers),
    }
}

pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1))
}

/// Returns the `page`-th (1-based) slice. Pages past the end are empty.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size);
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Clamps a page number into `[1, max(1, total_pages)]`.
pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Filter, sort and slice in one pass. The page is used as given.
pub fn run<'a>(records: &'a [NovelRecord], query: &FilterQuery) -> SearchPage<'a> {
    let mut filtered = filter_records(records, query);
    sort_records(&mut filtered, query.sort_key, query.sort_direction);
    let filtered_count = filtered.len();
    let items = paginate(&filtered, query.page, query.page_size).to_vec();
    SearchPage {
        items,
        filtered_count,
        total_pages: total_pages(filtered_count, query.page_size),
        page: query.page,
    }
}

/// Tag usage across `records`, most used first, ties by name.
pub fn tag_facets(records: &[NovelRecord]) -> Vec<TagFacet> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        for tag in record.effective_tags() {
            *counts.entry(tag).or_default() += 1;
        }
    }
    let mut facets: Vec<TagFacet> = counts
        .into_iter()
        .map(|(tag, count)| TagFacet { tag, count })
        .collect();
    facets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
    facets
}
