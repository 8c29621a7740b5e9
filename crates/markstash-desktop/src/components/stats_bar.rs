//! Collection counters shown above the bookmark list

use dioxus::prelude::*;

use crate::state::AppState;
use crate::theme::PALETTE;

/// Three stat cards: total bookmarks, bookmarks added today, and a fixed
/// "organized" badge.
#[component]
pub fn StatsBar() -> Element {
    let state = use_context::<AppState>();
    let stats = state.stats();

    rsx! {
        div {
            class: "stats-bar",
            style: "
                display: grid;
                grid-template-columns: repeat(3, 1fr);
                gap: 1.5rem;
                margin-bottom: 2.5rem;
            ",

            StatCard { value: stats.total.to_string(), label: "Total Bookmarks" }
            StatCard { value: stats.added_today.to_string(), label: "Added Today" }
            StatCard { value: "100%", label: "Organized" }
        }
    }
}

#[component]
fn StatCard(value: String, label: String) -> Element {
    rsx! {
        div {
            class: "stat-card",
            style: "
                padding: 1.5rem;
                background: {PALETTE.surface};
                border: 1px solid {PALETTE.border};
                border-radius: 16px;
            ",

            div {
                style: "font-size: 2rem; font-weight: 700; color: {PALETTE.text_primary}; line-height: 1;",
                "{value}"
            }
            div {
                style: "font-size: 0.875rem; color: {PALETTE.text_secondary}; margin-top: 0.25rem;",
                "{label}"
            }
        }
    }
}
