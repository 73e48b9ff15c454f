//! List queries and the pages they return.

use crate::domain::SchoolContext;
use crate::table::{PaginationController, SortState, DEFAULT_PAGE_SIZE};
use serde::{Deserialize, Serialize};

/// What a screen asks the data source for: one sorted, filtered page of one school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub school: String,
    /// Fuzzy search text; `None` or blank lists everything.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(default)]
    pub sort: SortState,
    /// 1-based page number.
    pub page: usize,
    pub page_size: usize,
}

impl ListQuery {
    /// First page of `context`'s records, unsorted and unfiltered.
    #[must_use]
    pub fn new(context: &SchoolContext) -> Self {
        Self {
            school: context.school_id.clone(),
            filter: None,
            sort: SortState::unsorted(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn filter(mut self, query: &str) -> Self {
        let query = query.trim();
        self.filter = (!query.is_empty()).then(|| query.to_string());
        self
    }

    #[must_use]
    pub fn sort(mut self, sort: SortState) -> Self {
        self.sort = sort;
        self
    }

    /// Takes page and page size from a pagination controller.
    #[must_use]
    pub fn page_of(mut self, pagination: &PaginationController) -> Self {
        self.page = pagination.page();
        self.page_size = pagination.page_size();
        self
    }

    /// Index of the first record on the requested page.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }
}

/// One page of records plus the number of records matching the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPage<E> {
    pub rows: Vec<E>,
    pub total: usize,
}

impl<E> RecordPage<E> {
    #[must_use]
    pub const fn empty() -> Self {
        Self { rows: Vec::new(), total: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_filter_is_dropped() {
        let ctx = SchoolContext::new("s1").unwrap();
        assert_eq!(ListQuery::new(&ctx).filter("   ").filter, None);
        assert_eq!(ListQuery::new(&ctx).filter(" dune ").filter.as_deref(), Some("dune"));
    }

    #[test]
    fn offset_follows_pagination() {
        let ctx = SchoolContext::new("s1").unwrap();
        let mut pagination = PaginationController::new(25).unwrap();
        pagination.set_total(100);
        pagination.set_page(3);
        let query = ListQuery::new(&ctx).page_of(&pagination);
        assert_eq!(query.offset(), 50);
    }
}
