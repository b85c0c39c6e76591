use crate::search::{clamp_page, filter_records, total_pages};
use crate::view_model::{NovelCard, SearchViewModel};
use crate::{search, FilterQuery, NovelRecord};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchState {
    records: Vec<NovelRecord>,
    query: FilterQuery,
    /// Bumped per `Refresh`; replies carrying an older value are stale.
    generation: u64,
    loading: bool,
    error: Option<String>,
    dirty: bool,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page_size(page_size: usize) -> Self {
        let mut state = Self::new();
        state.query.page_size = page_size.max(1);
        state
    }

    pub fn query(&self) -> &FilterQuery {
        &self.query
    }

    pub fn records(&self) -> &[NovelRecord] {
        &self.records
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> SearchViewModel {
        let page = search::run(&self.records, &self.query);
        SearchViewModel {
            cards: page.items.into_iter().map(NovelCard::from_record).collect(),
            page: page.page,
            total_pages: page.total_pages,
            filtered_count: page.filtered_count,
            total_count: self.records.len(),
            facets: search::tag_facets(&self.records),
            selected_tags: self.query.tags.iter().cloned().collect(),
            tag_mode: self.query.tag_mode,
            loading: self.loading,
            error: self.error.clone(),
            dirty: self.dirty,
        }
    }

    pub(crate) fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.loading = true;
        self.error = None;
        self.dirty = true;
        self.generation
    }

    /// Applies a load reply. Returns false when the reply is stale.
    pub(crate) fn finish_load(
        &mut self,
        generation: u64,
        result: Result<Vec<NovelRecord>, String>,
    ) -> bool {
        if generation != self.generation {
            return false;
        }
        self.loading = false;
        match result {
            Ok(records) => {
                self.records = records;
                self.error = None;
            }
            Err(message) => self.error = Some(message),
        }
        self.query.page = clamp_page(self.query.page, self.filtered_pages());
        self.dirty = true;
        true
    }

    /// Runs `edit` on the query; if it changed anything the page goes back to 1.
    pub(crate) fn edit_filters(&mut self, edit: impl FnOnce(&mut FilterQuery)) {
        let before = self.query.clone();
        edit(&mut self.query);
        self.query.page = 1;
        if self.query != before {
            self.dirty = true;
        }
    }

    pub(crate) fn select_page(&mut self, page: usize) {
        let page = clamp_page(page, self.filtered_pages());
        if page != self.query.page {
            self.query.page = page;
            self.dirty = true;
        }
    }

    fn filtered_pages(&self) -> usize {
        total_pages(
            filter_records(&self.records, &self.query).len(),
            self.query.page_size,
        )
    }
}
