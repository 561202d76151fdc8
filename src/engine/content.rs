//! Client-side projection over the loaded content catalog.
//!
//! Filtering, sorting and pagination are pure re-derivations over the full
//! item set; the current page resets to the first page whenever the search
//! term, type filter or sort key changes.

use crate::models::{MediaItem, MediaType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    TitleAsc,
    TitleDesc,
    SizeAsc,
    SizeDesc,
}

impl SortKey {
    /// Parses the wire form used by the coordinator's UI, e.g. `size-desc`.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "title-asc" | "title" => Some(SortKey::TitleAsc),
            "title-desc" => Some(SortKey::TitleDesc),
            "size-asc" => Some(SortKey::SizeAsc),
            "size-desc" => Some(SortKey::SizeDesc),
            _ => None,
        }
    }
}

/// One derived page of the catalog.
#[derive(Debug)]
pub struct ContentPage<'a> {
    pub items: Vec<&'a MediaItem>,
    pub total_matches: usize,
    pub page: usize,
    pub page_count: usize,
}

/// The three projection inputs plus the current page.
#[derive(Debug, Clone)]
pub struct ContentQuery {
    search: String,
    type_filter: Option<MediaType>,
    sort: SortKey,
    page: usize,
    page_size: usize,
}

impl ContentQuery {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            type_filter: None,
            sort: SortKey::default(),
            page: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn type_filter(&self) -> Option<MediaType> {
        self.type_filter
    }

    pub fn sort(&self) -> SortKey {
        self.sort
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.page = 0;
    }

    pub fn set_type_filter(&mut self, filter: Option<MediaType>) {
        self.type_filter = filter;
        self.page = 0;
    }

    pub fn set_sort(&mut self, sort: SortKey) {
        self.sort = sort;
        self.page = 0;
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1);
    }

    /// Derives the current page from the full catalog. Pure; recomputed on
    /// every input change. An out-of-range page is clamped to the last one.
    pub fn apply<'a>(&self, items: &'a [MediaItem]) -> ContentPage<'a> {
        let needle = self.search.to_lowercase();
        let mut matches: Vec<&MediaItem> = items
            .iter()
            .filter(|item| {
                self.type_filter
                    .is_none_or(|filter| item.media_type == filter)
            })
            .filter(|item| needle.is_empty() || item.title.to_lowercase().contains(&needle))
            .collect();

        match self.sort {
            SortKey::TitleAsc => matches.sort_by(|a, b| a.title.cmp(&b.title)),
            SortKey::TitleDesc => matches.sort_by(|a, b| b.title.cmp(&a.title)),
            SortKey::SizeAsc => matches.sort_by(|a, b| a.size.total_cmp(&b.size)),
            SortKey::SizeDesc => matches.sort_by(|a, b| b.size.total_cmp(&a.size)),
        }

        let total_matches = matches.len();
        let page_count = total_matches.div_ceil(self.page_size).max(1);
        let page = self.page.min(page_count - 1);
        let start = page * self.page_size;
        let items = matches
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();

        ContentPage {
            items,
            total_matches,
            page,
            page_count,
        }
    }
}
