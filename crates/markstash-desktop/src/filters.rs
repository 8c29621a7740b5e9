//! Bookmark list filtering and collection counters.

use chrono::{Local, NaiveDate};

use markstash_core::models::Bookmark;

/// Counters shown above the bookmark collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookmarkStats {
    pub total: usize,
    pub added_today: usize,
}

/// Filter bookmarks by case-insensitive substring match on the URL.
///
/// An empty query keeps every bookmark and preserves order.
#[must_use]
pub fn filter_bookmarks(bookmarks: &[Bookmark], search_query: &str) -> Vec<Bookmark> {
    let query = search_query.to_lowercase();
    bookmarks
        .iter()
        .filter(|bookmark| query.is_empty() || bookmark.url.to_lowercase().contains(&query))
        .cloned()
        .collect()
}

/// Count the collection and how many bookmarks were saved on `today`.
///
/// `today` is the local calendar date; stored timestamps are converted to
/// local time before comparing.
#[must_use]
pub fn bookmark_stats(bookmarks: &[Bookmark], today: NaiveDate) -> BookmarkStats {
    let added_today = bookmarks
        .iter()
        .filter(|bookmark| bookmark.created_at.with_timezone(&Local).date_naive() == today)
        .count();

    BookmarkStats {
        total: bookmarks.len(),
        added_today,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, Utc};
    use markstash_core::models::BookmarkId;
    use uuid::Uuid;

    use super::*;

    fn bookmark(id: i64, url: &str, created_at: DateTime<Utc>) -> Bookmark {
        Bookmark {
            id: BookmarkId::new(id),
            url: url.to_string(),
            user_id: Uuid::nil(),
            created_at,
        }
    }

    #[test]
    fn filters_by_case_insensitive_url_substring() {
        let bookmarks = vec![
            bookmark(1, "https://GitHub.com/rust-lang/rust", Utc::now()),
            bookmark(2, "https://docs.rs/tokio", Utc::now()),
        ];

        let filtered = filter_bookmarks(&bookmarks, "github");
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, BookmarkId::new(1));

        let shouting = filter_bookmarks(&bookmarks, "DOCS.RS");
        assert_eq!(shouting.len(), 1);
        assert_eq!(shouting[0].id, BookmarkId::new(2));
    }

    #[test]
    fn empty_query_keeps_every_bookmark() {
        let bookmarks = vec![
            bookmark(2, "https://example.com/b", Utc::now()),
            bookmark(1, "https://example.com/a", Utc::now()),
        ];

        assert_eq!(filter_bookmarks(&bookmarks, ""), bookmarks);
    }

    #[test]
    fn matches_form_the_exact_matching_subset() {
        let bookmarks = vec![
            bookmark(3, "https://blog.rust-lang.org", Utc::now()),
            bookmark(2, "https://news.ycombinator.com", Utc::now()),
            bookmark(1, "https://www.rust-lang.org", Utc::now()),
        ];

        let filtered = filter_bookmarks(&bookmarks, "rust-lang");
        let expected: Vec<Bookmark> = bookmarks
            .iter()
            .filter(|bookmark| bookmark.url.to_lowercase().contains("rust-lang"))
            .cloned()
            .collect();
        assert_eq!(filtered, expected);
        assert_eq!(filtered.len(), 2);
    }

    #[test]
    fn unmatched_query_yields_nothing() {
        let bookmarks = vec![bookmark(1, "https://example.com", Utc::now())];
        assert!(filter_bookmarks(&bookmarks, "zzz").is_empty());
    }

    #[test]
    fn stats_count_bookmarks_saved_today() {
        let now = Utc::now();
        let bookmarks = vec![
            bookmark(3, "https://example.com/new", now),
            bookmark(2, "https://example.com/newer", now),
            bookmark(1, "https://example.com/old", now - Duration::days(3)),
        ];

        let stats = bookmark_stats(&bookmarks, Local::now().date_naive());
        assert_eq!(stats.total, 3);
        assert_eq!(stats.added_today, 2);
    }

    #[test]
    fn stats_on_empty_collection_are_zero() {
        let stats = bookmark_stats(&[], Local::now().date_naive());
        assert_eq!(
            stats,
            BookmarkStats {
                total: 0,
                added_today: 0
            }
        );
    }
}
