//! Bookmark data model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

/// Base URL of the third-party favicon service consumed as a URL template
pub const FAVICON_ENDPOINT: &str = "https://www.google.com/s2/favicons";

/// Unique identifier for a bookmark row, assigned by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BookmarkId(i64);

impl BookmarkId {
    /// Wrap a raw row identifier
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw numeric value of the identifier
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for BookmarkId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// A saved link owned by exactly one user
///
/// Rows live in the hosted backend; this client only reads and writes them.
/// A bookmark is never updated in place: it is created by an explicit save
/// and removed by an explicit delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Row identifier, monotonically increasing
    pub id: BookmarkId,
    /// The saved link exactly as the user entered it
    pub url: String,
    /// Owning user, taken from the authenticated session at creation
    pub user_id: Uuid,
    /// Creation time assigned by the backend
    pub created_at: DateTime<Utc>,
}

impl Bookmark {
    /// Display label for the bookmark's site
    #[must_use]
    pub fn domain_label(&self) -> String {
        domain_label(&self.url)
    }

    /// Favicon-service URL for the bookmark's origin, when the URL parses
    #[must_use]
    pub fn favicon_url(&self) -> Option<String> {
        favicon_url(&self.url)
    }
}

/// Derive a display label for a saved link.
///
/// Parses the link, takes its hostname, and strips one leading `www.`.
/// Anything that does not parse as an absolute URL comes back unchanged.
///
/// # Examples
///
/// ```
/// use markstash_core::models::domain_label;
///
/// assert_eq!(domain_label("https://www.example.com/page"), "example.com");
/// assert_eq!(domain_label("not a url"), "not a url");
/// ```
#[must_use]
pub fn domain_label(raw_url: &str) -> String {
    match Url::parse(raw_url) {
        Ok(parsed) => match parsed.host_str() {
            Some(host) => host.strip_prefix("www.").unwrap_or(host).to_string(),
            None => raw_url.to_string(),
        },
        Err(_) => raw_url.to_string(),
    }
}

/// Build the favicon-service URL for a saved link's origin.
///
/// Returns `None` when the link does not parse; callers render a generic
/// glyph in that case.
#[must_use]
pub fn favicon_url(raw_url: &str) -> Option<String> {
    let origin = Url::parse(raw_url).ok()?.origin().ascii_serialization();
    Some(format!(
        "{FAVICON_ENDPOINT}?domain={}&sz=64",
        urlencoding::encode(&origin)
    ))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn sample_bookmark(url: &str) -> Bookmark {
        Bookmark {
            id: BookmarkId::new(7),
            url: url.to_string(),
            user_id: Uuid::nil(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 4, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn bookmark_id_displays_raw_value() {
        assert_eq!(BookmarkId::new(42).to_string(), "42");
        assert_eq!(BookmarkId::new(42).as_i64(), 42);
    }

    #[test]
    fn domain_label_strips_leading_www() {
        assert_eq!(domain_label("https://www.example.com/page"), "example.com");
    }

    #[test]
    fn domain_label_keeps_bare_hostname() {
        assert_eq!(
            domain_label("https://docs.rs/tokio/latest"),
            "docs.rs".to_string()
        );
    }

    #[test]
    fn domain_label_only_strips_first_www_prefix() {
        assert_eq!(domain_label("https://www.www.example.com"), "www.example.com");
    }

    #[test]
    fn domain_label_falls_back_to_raw_input() {
        assert_eq!(domain_label("not a url"), "not a url");
        assert_eq!(domain_label(""), "");
    }

    #[test]
    fn favicon_url_uses_encoded_origin() {
        let favicon = favicon_url("https://www.example.com/some/page").unwrap();
        assert_eq!(
            favicon,
            "https://www.google.com/s2/favicons?domain=https%3A%2F%2Fwww.example.com&sz=64"
        );
    }

    #[test]
    fn favicon_url_is_none_for_unparseable_input() {
        assert!(favicon_url("not a url").is_none());
    }

    #[test]
    fn bookmark_helpers_delegate_to_free_functions() {
        let bookmark = sample_bookmark("https://www.rust-lang.org/learn");
        assert_eq!(bookmark.domain_label(), "rust-lang.org");
        assert!(bookmark.favicon_url().is_some());
    }

    #[test]
    fn bookmark_decodes_backend_row() {
        let row = r#"{
            "id": 12,
            "url": "https://blog.example.com/post",
            "user_id": "c56a4180-65aa-42ec-a945-5fd21dec0538",
            "created_at": "2024-05-04T12:30:00+00:00"
        }"#;

        let bookmark: Bookmark = serde_json::from_str(row).unwrap();
        assert_eq!(bookmark.id, BookmarkId::new(12));
        assert_eq!(bookmark.url, "https://blog.example.com/post");
        assert_eq!(
            bookmark.user_id.to_string(),
            "c56a4180-65aa-42ec-a945-5fd21dec0538"
        );
        assert_eq!(bookmark.created_at.timestamp(), 1_714_825_800);
    }
}
