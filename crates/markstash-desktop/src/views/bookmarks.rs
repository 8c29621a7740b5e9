//! Bookmarks view - signed-in screen with the saved collection

use dioxus::prelude::*;

use markstash_core::models::BookmarkId;
use markstash_core::store::{BookmarkStore, BOOKMARKS_TABLE};

use crate::components::{AddBookmark, BookmarkCard, SearchBar, StatsBar, ViewToggle};
use crate::state::{AppState, ViewMode};
use crate::theme::PALETTE;

/// Bookmarks view component - collection management for the signed-in user
#[component]
pub fn Bookmarks() -> Element {
    let state = use_context::<AppState>();

    // Initial load, then a reload for every realtime change. Dropping the
    // future on unmount drops the subscription, which tears down its socket.
    use_future(move || async move {
        reload_bookmarks(state).await;

        let Some(session) = (state.auth_session)() else {
            return;
        };
        let Some(realtime) = (state.realtime_client)() else {
            tracing::warn!("Realtime client is not configured; live updates are disabled");
            return;
        };

        match realtime
            .subscribe_table_changes(BOOKMARKS_TABLE, &session.access_token)
            .await
        {
            Ok(mut subscription) => {
                while let Some(change) = subscription.next_change().await {
                    tracing::debug!("Bookmark table changed ({:?}), reloading", change.kind);
                    reload_bookmarks(state).await;
                }
                tracing::warn!("Realtime subscription ended; live updates stopped");
            }
            Err(error) => {
                tracing::warn!("Realtime subscription failed: {}", error);
            }
        }
    });

    let Some(session) = (state.auth_session)() else {
        return rsx! {};
    };

    let sign_out = move |_: MouseEvent| {
        let mut auth_session_signal = state.auth_session;
        spawn(async move {
            let auth = (state.auth_service)();
            let current = (state.auth_session)();
            if let (Some(auth), Some(current)) = (auth, current) {
                if let Err(error) = auth.sign_out(&current.access_token).await {
                    tracing::warn!("Sign-out revocation failed: {}", error);
                }
            }
            auth_session_signal.set(None);
        });
    };

    let bookmarks = (state.bookmarks)();
    let filtered = state.filtered_bookmarks();
    let query = (state.search_query)();
    let status = (state.status_message)();
    let view_mode = (state.view_mode)();

    let email = session
        .user
        .email
        .clone()
        .unwrap_or_else(|| "Signed in".to_string());
    let avatar = session.user.avatar_or_fallback();

    let section_title = if query.is_empty() {
        "Your Bookmarks".to_string()
    } else {
        format!("Search Results ({})", filtered.len())
    };
    let container_style = match view_mode {
        ViewMode::Grid => {
            "display: grid; grid-template-columns: repeat(auto-fill, minmax(350px, 1fr)); gap: 1rem;"
        }
        ViewMode::List => "display: flex; flex-direction: column; gap: 1rem;",
    };

    rsx! {
        div {
            class: "bookmarks-container",
            style: "max-width: 1200px; margin: 0 auto; padding: 2rem;",

            header {
                style: "
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    margin-bottom: 2rem;
                ",
                div {
                    style: "
                        font-size: 1.375rem;
                        font-weight: 700;
                        background: {PALETTE.accent_gradient};
                        -webkit-background-clip: text;
                        background-clip: text;
                        color: transparent;
                    ",
                    "Markstash"
                }
                div {
                    style: "display: flex; align-items: center; gap: 0.75rem;",
                    img {
                        src: "{avatar}",
                        alt: "",
                        style: "width: 36px; height: 36px; border-radius: 50%;",
                    }
                    span {
                        style: "font-size: 0.9375rem; color: {PALETTE.text_secondary};",
                        "{email}"
                    }
                    button {
                        onclick: sign_out,
                        style: "
                            padding: 0.5rem 1.25rem;
                            background: {PALETTE.surface};
                            border: 1px solid {PALETTE.border};
                            border-radius: 10px;
                            color: {PALETTE.text_secondary};
                            font-size: 0.875rem;
                            cursor: pointer;
                        ",
                        "Sign Out"
                    }
                }
            }

            StatsBar {}
            AddBookmark {}

            div {
                style: "
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    gap: 1rem;
                    flex-wrap: wrap;
                    margin-bottom: 1.5rem;
                ",
                SearchBar {}
                ViewToggle {}
            }

            if let Some(message) = status {
                div {
                    style: "color: {PALETTE.danger}; font-size: 0.875rem; margin-bottom: 1rem;",
                    "{message}"
                }
            }

            h2 {
                style: "font-size: 1.25rem; color: {PALETTE.text_primary}; margin: 0 0 1rem;",
                "{section_title}"
            }

            if bookmarks.is_empty() {
                EmptyState {
                    title: "No bookmarks yet",
                    hint: "Add your first bookmark above to get started",
                }
            } else if filtered.is_empty() {
                EmptyState {
                    title: "No bookmarks found",
                    hint: "Try a different search term",
                }
            } else {
                div {
                    class: "bookmark-collection",
                    style: "{container_style}",

                    for bookmark in filtered {
                        {
                            let bookmark_id = bookmark.id;

                            rsx! {
                                BookmarkCard {
                                    key: "{bookmark_id}",
                                    bookmark: bookmark.clone(),
                                    ondelete: move |_| delete_bookmark(state, bookmark_id),
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Centered placeholder shown when the collection or a search comes up empty
#[component]
fn EmptyState(title: &'static str, hint: &'static str) -> Element {
    rsx! {
        div {
            style: "
                padding: 4rem 2rem;
                text-align: center;
                background: {PALETTE.surface};
                border: 1px dashed {PALETTE.border};
                border-radius: 16px;
            ",
            div {
                style: "font-size: 1.125rem; color: {PALETTE.text_primary}; margin-bottom: 0.5rem;",
                "{title}"
            }
            div {
                style: "font-size: 0.9375rem; color: {PALETTE.text_muted};",
                "{hint}"
            }
        }
    }
}

/// Replace the whole list from the backend, newest first.
///
/// Used for the initial load and after every realtime change notification.
/// Safe to call repeatedly; each call overwrites the previous contents.
async fn reload_bookmarks(mut state: AppState) {
    let store = (state.bookmark_store)();
    let session = (state.auth_session)();
    let (Some(store), Some(session)) = (store, session) else {
        return;
    };

    match store
        .list_bookmarks(&session.access_token, session.user.id)
        .await
    {
        Ok(items) => {
            state.bookmarks.set(items);
            state.status_message.set(None);
        }
        Err(error) => {
            tracing::error!("Failed to load bookmarks: {}", error);
            state
                .status_message
                .set(Some("Couldn't load bookmarks".to_string()));
        }
    }
}

/// Fire the delete request for one bookmark.
///
/// The row is not removed locally; the realtime change event triggers the
/// reload that makes it disappear.
fn delete_bookmark(mut state: AppState, id: BookmarkId) {
    spawn(async move {
        let store = (state.bookmark_store)();
        let session = (state.auth_session)();
        let (Some(store), Some(session)) = (store, session) else {
            return;
        };

        match store.delete_bookmark(&session.access_token, id).await {
            Ok(()) => {
                tracing::debug!("Deleted bookmark {id}");
                state.status_message.set(None);
            }
            Err(error) => {
                tracing::error!("Failed to delete bookmark {id}: {}", error);
                state
                    .status_message
                    .set(Some("Couldn't delete bookmark".to_string()));
            }
        }
    });
}
