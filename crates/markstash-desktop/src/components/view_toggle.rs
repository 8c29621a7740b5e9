//! Grid/list view toggle component

use dioxus::prelude::*;

use crate::state::{AppState, ViewMode};
use crate::theme::PALETTE;

/// Switches the bookmark collection between grid and list layouts.
///
/// The toggle only changes presentation; the underlying collection and the
/// active search query are untouched.
#[component]
pub fn ViewToggle() -> Element {
    let state = use_context::<AppState>();

    rsx! {
        div {
            class: "view-toggle",
            style: "
                display: flex;
                gap: 0.5rem;
                background: rgba(255, 255, 255, 0.05);
                padding: 0.375rem;
                border-radius: 12px;
                border: 1px solid {PALETTE.border};
            ",

            ViewButton { label: "Grid", mode: ViewMode::Grid }
            ViewButton { label: "List", mode: ViewMode::List }
        }
    }
}

#[component]
fn ViewButton(label: String, mode: ViewMode) -> Element {
    let mut state = use_context::<AppState>();
    let is_active = (state.view_mode)() == mode;

    let background = if is_active {
        "rgba(102, 126, 234, 0.2)"
    } else {
        "transparent"
    };
    let color = if is_active {
        PALETTE.text_primary
    } else {
        PALETTE.text_secondary
    };

    rsx! {
        button {
            onclick: move |_| state.view_mode.set(mode),
            style: "
                padding: 0.5rem 1rem;
                background: {background};
                border: none;
                border-radius: 8px;
                color: {color};
                font-size: 0.9375rem;
                font-weight: 500;
                cursor: pointer;
            ",
            "{label}"
        }
    }
}
