//! Query-string builder for Strapi collection endpoints

use fleetdesk_domain::model::{ListQuery, Resource};

/// Filter operators understood by Strapi
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    ContainsI,
}

impl FilterOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FilterOp::Eq => "$eq",
            FilterOp::ContainsI => "$containsi",
        }
    }
}

/// Ordered list of query parameters using Strapi's bracket syntax
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrapiQuery {
    pairs: Vec<(String, String)>,
}

impl StrapiQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// `filters[a][b][$op]=value` for a dotted field path `a.b`
    pub fn filter(mut self, field: &str, op: FilterOp, value: impl Into<String>) -> Self {
        let path: String = field.split('.').map(|seg| format!("[{}]", seg)).collect();
        self.pairs
            .push((format!("filters{}[{}]", path, op.as_str()), value.into()));
        self
    }

    pub fn eq(self, field: &str, value: impl Into<String>) -> Self {
        self.filter(field, FilterOp::Eq, value)
    }

    pub fn contains_i(self, field: &str, value: impl Into<String>) -> Self {
        self.filter(field, FilterOp::ContainsI, value)
    }

    /// Set pagination, replacing any earlier page parameters
    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.pairs.retain(|(k, _)| !k.starts_with("pagination["));
        self.pairs
            .push(("pagination[page]".to_string(), page.max(1).to_string()));
        self.pairs
            .push(("pagination[pageSize]".to_string(), page_size.max(1).to_string()));
        self
    }

    /// `populate=*`: inline every first-level relation
    pub fn populate_all(mut self) -> Self {
        self.pairs.retain(|(k, _)| !k.starts_with("populate"));
        self.pairs.push(("populate".to_string(), "*".to_string()));
        self
    }

    /// e.g. `updatedAt:desc`
    pub fn sort(mut self, sort: impl Into<String>) -> Self {
        self.pairs.retain(|(k, _)| k != "sort");
        self.pairs.push(("sort".to_string(), sort.into()));
        self
    }

    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    /// Translate a generic listing request for one collection
    pub fn from_list_query(resource: Resource, query: &ListQuery) -> Self {
        let mut q = StrapiQuery::new().page(query.page, query.page_size);
        if let Some(search) = &query.search {
            q = q.contains_i(resource.search_field(), search.trim());
        }
        if query.populate {
            q = q.populate_all();
        }
        if let Some(sort) = &query.sort {
            q = q.sort(sort.clone());
        }
        q
    }
}

impl std::fmt::Display for StrapiQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rendered: Vec<String> = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect();
        f.write_str(&rendered.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_brackets() {
        let q = StrapiQuery::new()
            .eq("currentStatus", "idle")
            .filter("vehicle.documentId", FilterOp::Eq, "abc");
        assert_eq!(
            q.pairs(),
            &[
                ("filters[currentStatus][$eq]".to_string(), "idle".to_string()),
                ("filters[vehicle][documentId][$eq]".to_string(), "abc".to_string()),
            ]
        );
    }

    #[test]
    fn test_page_replaces_previous() {
        let q = StrapiQuery::new().page(1, 25).page(3, 100);
        assert_eq!(q.to_string(), "pagination[page]=3&pagination[pageSize]=100");
    }

    #[test]
    fn test_populate_all_not_repeated() {
        assert_eq!(
            StrapiQuery::new().populate_all().populate_all().to_string(),
            "populate=*"
        );
    }

    #[test]
    fn test_from_list_query() {
        let list = ListQuery::new(2, 10)
            .with_search(Some(" mh12 ".to_string()))
            .with_populate(true)
            .with_sort(Some("updatedAt:desc".to_string()));
        let q = StrapiQuery::from_list_query(Resource::Vehicles, &list);
        assert_eq!(
            q.to_string(),
            "pagination[page]=2&pagination[pageSize]=10&filters[vehicleNumber][$containsi]=mh12&populate=*&sort=updatedAt:desc"
        );
    }
}
