//! Bookmark card component

use chrono::Local;
use dioxus::prelude::*;

use markstash_core::models::Bookmark;

use crate::theme::PALETTE;

/// A single saved bookmark with its favicon, domain label, and actions.
#[component]
pub fn BookmarkCard(bookmark: Bookmark, ondelete: EventHandler<MouseEvent>) -> Element {
    let domain = bookmark.domain_label();
    let favicon = bookmark.favicon_url();
    let added = bookmark
        .created_at
        .with_timezone(&Local)
        .format("%b %-d, %Y")
        .to_string();
    let initial = domain
        .chars()
        .next()
        .map_or_else(|| "?".to_string(), |first| first.to_uppercase().to_string());

    let open_url = bookmark.url.clone();
    let open = move |_| {
        if let Err(error) = webbrowser::open(&open_url) {
            tracing::warn!("Failed to open {}: {}", open_url, error);
        }
    };
    let visit_url = bookmark.url.clone();
    let visit = move |_| {
        if let Err(error) = webbrowser::open(&visit_url) {
            tracing::warn!("Failed to open {}: {}", visit_url, error);
        }
    };

    rsx! {
        div {
            class: "bookmark-card",
            style: "
                display: flex;
                justify-content: space-between;
                align-items: center;
                gap: 1rem;
                padding: 1.5rem;
                background: {PALETTE.surface};
                border: 1px solid {PALETTE.border};
                border-radius: 16px;
            ",

            div {
                class: "bookmark-content",
                style: "display: flex; align-items: center; gap: 1rem; flex: 1; min-width: 0;",

                div {
                    class: "bookmark-icon",
                    style: "
                        width: 48px;
                        height: 48px;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        background: rgba(102, 126, 234, 0.2);
                        border-radius: 12px;
                        flex-shrink: 0;
                    ",
                    if let Some(favicon) = favicon {
                        img {
                            src: "{favicon}",
                            alt: "",
                            style: "width: 24px; height: 24px;",
                        }
                    } else {
                        span {
                            style: "font-size: 1.25rem; font-weight: 700; color: {PALETTE.accent_soft};",
                            "{initial}"
                        }
                    }
                }

                div {
                    class: "bookmark-info",
                    style: "flex: 1; min-width: 0;",

                    a {
                        onclick: open,
                        style: "
                            display: block;
                            font-size: 1.125rem;
                            font-weight: 600;
                            color: {PALETTE.text_primary};
                            text-decoration: none;
                            margin-bottom: 0.25rem;
                            cursor: pointer;
                        ",
                        "{domain}"
                    }
                    div {
                        style: "
                            font-size: 0.875rem;
                            color: {PALETTE.text_muted};
                            overflow: hidden;
                            text-overflow: ellipsis;
                            white-space: nowrap;
                        ",
                        "{bookmark.url}"
                    }
                    div {
                        style: "font-size: 0.8125rem; color: rgba(255, 255, 255, 0.4); margin-top: 0.25rem;",
                        "Added {added}"
                    }
                }
            }

            div {
                class: "bookmark-actions",
                style: "display: flex; gap: 0.5rem; flex-shrink: 0;",

                button {
                    onclick: visit,
                    style: "
                        padding: 0.5rem 1rem;
                        background: rgba(74, 222, 128, 0.1);
                        border: 1px solid rgba(74, 222, 128, 0.3);
                        border-radius: 10px;
                        color: {PALETTE.success};
                        font-size: 0.875rem;
                        cursor: pointer;
                    ",
                    "Open"
                }
                button {
                    onclick: move |evt| ondelete.call(evt),
                    style: "
                        padding: 0.5rem 1rem;
                        background: rgba(245, 87, 108, 0.1);
                        border: 1px solid rgba(245, 87, 108, 0.3);
                        border-radius: 10px;
                        color: {PALETTE.danger};
                        font-size: 0.875rem;
                        cursor: pointer;
                    ",
                    "Delete"
                }
            }
        }
    }
}
