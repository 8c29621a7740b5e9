//! Data models for Markstash

mod bookmark;

pub use bookmark::{domain_label, favicon_url, Bookmark, BookmarkId, FAVICON_ENDPOINT};
