//! Application state management
//!
//! Global state accessible via Dioxus context providers.

use std::sync::Arc;

use dioxus::prelude::*;

use markstash_core::models::Bookmark;
use markstash_core::realtime::RealtimeClient;
use markstash_core::store::SupabaseBookmarkStore;

use crate::filters::{bookmark_stats, filter_bookmarks, BookmarkStats};
use crate::services::{AuthSession, SupabaseAuthService};

/// Presentation mode for the bookmark collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    List,
}

/// Global application state
#[derive(Clone, Copy)]
pub struct AppState {
    /// Auth service if the hosted backend is configured
    pub auth_service: Signal<Option<Arc<SupabaseAuthService>>>,
    /// Bookmark store backed by the hosted REST endpoint
    pub bookmark_store: Signal<Option<Arc<SupabaseBookmarkStore>>>,
    /// Realtime client for table change subscriptions
    pub realtime_client: Signal<Option<Arc<RealtimeClient>>>,
    /// Active auth session, if signed in
    pub auth_session: Signal<Option<AuthSession>>,
    /// Whether the persisted-session check has completed
    pub session_checked: Signal<bool>,
    /// All bookmarks for the signed-in user, newest first
    pub bookmarks: Signal<Vec<Bookmark>>,
    /// Current search query
    pub search_query: Signal<String>,
    /// Presentation mode for the bookmark collection
    pub view_mode: Signal<ViewMode>,
    /// Whether a save request is in flight
    pub saving: Signal<bool>,
    /// Whether an OAuth sign-in is in flight
    pub signing_in: Signal<bool>,
    /// Transient status line shown after a failed backend operation
    pub status_message: Signal<Option<String>>,
}

impl AppState {
    /// Get bookmarks matching the current search query
    #[must_use]
    pub fn filtered_bookmarks(&self) -> Vec<Bookmark> {
        filter_bookmarks(&(self.bookmarks)(), &(self.search_query)())
    }

    /// Collection counters for the stats bar
    #[must_use]
    pub fn stats(&self) -> BookmarkStats {
        bookmark_stats(&(self.bookmarks)(), chrono::Local::now().date_naive())
    }
}
