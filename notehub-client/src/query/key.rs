//! Identifying tuple for one cached list request.

/// Cache key for a list query. Two keys are equal iff page, page size, and
/// search term are all equal; equality determines cache hit.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub page: u32,
    pub per_page: u32,
    pub search: Option<String>,
}

impl QueryKey {
    /// Build a key, normalizing the search term: trimmed, and absent when
    /// empty after trimming.
    pub fn new(page: u32, per_page: u32, search: Option<&str>) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        Self {
            page,
            per_page,
            search,
        }
    }

    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_trimmed_and_empty_maps_to_absent() {
        assert_eq!(QueryKey::new(1, 12, Some("  ")), QueryKey::new(1, 12, None));
        assert_eq!(
            QueryKey::new(1, 12, Some(" meeting ")).search_term(),
            Some("meeting")
        );
    }

    #[test]
    fn test_equality_is_componentwise() {
        let base = QueryKey::new(1, 12, Some("a"));
        assert_eq!(base, QueryKey::new(1, 12, Some("a")));
        assert_ne!(base, QueryKey::new(2, 12, Some("a")));
        assert_ne!(base, QueryKey::new(1, 10, Some("a")));
        assert_ne!(base, QueryKey::new(1, 12, Some("b")));
    }
}
