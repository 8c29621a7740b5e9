//! Search bar component

use dioxus::prelude::*;

use crate::state::AppState;
use crate::theme::PALETTE;

/// Search bar for filtering bookmarks by URL
#[component]
pub fn SearchBar() -> Element {
    let mut state = use_context::<AppState>();
    let has_query = !(state.search_query)().is_empty();

    rsx! {
        div {
            class: "search-box",
            style: "flex: 1; position: relative; display: flex; align-items: center;",

            input {
                r#type: "text",
                placeholder: "Search bookmarks...",
                value: "{state.search_query}",
                oninput: move |evt| {
                    state.search_query.set(evt.value());
                },
                style: "
                    width: 100%;
                    padding: 0.875rem 3rem 0.875rem 1rem;
                    background: rgba(255, 255, 255, 0.05);
                    border: 1px solid {PALETTE.border};
                    border-radius: 12px;
                    color: {PALETTE.text_primary};
                    font-size: 0.9375rem;
                    outline: none;
                    box-sizing: border-box;
                ",
            }

            if has_query {
                button {
                    class: "clear-search",
                    onclick: move |_| state.search_query.set(String::new()),
                    style: "
                        position: absolute;
                        right: 0.75rem;
                        background: none;
                        border: none;
                        color: {PALETTE.text_muted};
                        cursor: pointer;
                        font-size: 1rem;
                        padding: 0.25rem;
                    ",
                    "✕"
                }
            }
        }
    }
}
