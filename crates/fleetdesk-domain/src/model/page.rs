//! Paging and listing parameters

use serde::{Deserialize, Serialize};

/// Pagination block returned alongside list responses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub page_size: u32,
    #[serde(default)]
    pub page_count: u32,
    #[serde(default)]
    pub total: u64,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        self.page < self.page_count
    }
}

/// What to list from a collection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    /// Case-insensitive match on the resource's search field
    pub search: Option<String>,
    /// Inline all relations
    pub populate: bool,
    /// e.g. "updatedAt:desc"
    pub sort: Option<String>,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 25,
            search: None,
            populate: false,
            sort: None,
        }
    }
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.max(1),
            ..Default::default()
        }
    }

    pub fn with_search(mut self, search: Option<String>) -> Self {
        self.search = search.filter(|s| !s.trim().is_empty());
        self
    }

    pub fn with_populate(mut self, populate: bool) -> Self {
        self.populate = populate;
        self
    }

    pub fn with_sort(mut self, sort: Option<String>) -> Self {
        self.sort = sort;
        self
    }
}

/// One page of untyped records
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordPage {
    pub records: Vec<serde_json::Value>,
    pub pagination: Option<Pagination>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_clamps_and_drops_blank_search() {
        let query = ListQuery::new(0, 0).with_search(Some("   ".to_string()));
        assert_eq!(query.page, 1);
        assert_eq!(query.page_size, 1);
        assert!(query.search.is_none());
    }

    #[test]
    fn test_has_next() {
        let p = Pagination {
            page: 1,
            page_size: 25,
            page_count: 2,
            total: 40,
        };
        assert!(p.has_next());
        assert!(!Pagination { page: 2, ..p }.has_next());
    }
}
