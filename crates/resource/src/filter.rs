//! Client-side filtering.
//!
//! Search and categorical filters run over the already-fetched list only,
//! never re-querying the backend, and are recomputed from scratch on
//! every change, so issuing the same filter twice yields the same view.

/// A record that free-text search can match against.
pub trait Searchable {
    /// Whether this record matches an already-lowercased keyword.
    fn matches_keyword(&self, keyword: &str) -> bool;
}

/// Filter `items` by a raw query string.
///
/// Blank queries (empty or whitespace) match everything.
pub fn search<'a, T, I>(items: I, query: &str) -> Vec<&'a T>
where
    T: Searchable,
    I: IntoIterator<Item = &'a T>,
{
    let keyword = query.trim().to_lowercase();
    if keyword.is_empty() {
        return items.into_iter().collect();
    }
    items
        .into_iter()
        .filter(|item| item.matches_keyword(&keyword))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    impl Searchable for Named {
        fn matches_keyword(&self, keyword: &str) -> bool {
            self.0.to_lowercase().contains(keyword)
        }
    }

    #[test]
    fn blank_query_matches_everything() {
        let items = [Named("North Hub"), Named("South Depot")];
        assert_eq!(search(&items, "").len(), 2);
        assert_eq!(search(&items, "   ").len(), 2);
    }

    #[test]
    fn search_is_case_insensitive_and_idempotent() {
        let items = [Named("North Hub"), Named("South Depot")];
        let first: Vec<&str> = search(&items, "NORTH").iter().map(|n| n.0).collect();
        let second: Vec<&str> = search(&items, "NORTH").iter().map(|n| n.0).collect();
        assert_eq!(first, vec!["North Hub"]);
        assert_eq!(first, second);
    }
}
