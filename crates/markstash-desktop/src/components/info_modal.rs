//! Shared modal dialog for informational content

use dioxus::prelude::*;

use crate::theme::PALETTE;

/// Overlay modal with a title bar and scrollable body.
///
/// Clicking the overlay or the close button fires `onclose`.
#[component]
pub fn InfoModal(title: String, onclose: EventHandler<MouseEvent>, children: Element) -> Element {
    rsx! {
        div {
            class: "modal-overlay",
            style: "
                position: fixed;
                inset: 0;
                background: rgba(10, 14, 39, 0.9);
                display: flex;
                align-items: center;
                justify-content: center;
                padding: 1rem;
                z-index: 100;
            ",
            onclick: move |evt| onclose.call(evt),

            div {
                class: "modal-content",
                style: "
                    background: linear-gradient(135deg, #1a1f3a 0%, #0f1729 100%);
                    border: 1px solid {PALETTE.border_accent};
                    border-radius: 20px;
                    padding: 2rem;
                    max-width: 700px;
                    width: 100%;
                    max-height: 80vh;
                    overflow-y: auto;
                ",
                onclick: move |evt| evt.stop_propagation(),

                div {
                    style: "
                        display: flex;
                        justify-content: space-between;
                        align-items: center;
                        margin-bottom: 1.5rem;
                    ",
                    h2 {
                        style: "font-size: 1.5rem; color: {PALETTE.text_primary}; margin: 0;",
                        "{title}"
                    }
                    button {
                        onclick: move |evt| onclose.call(evt),
                        style: "
                            background: none;
                            border: none;
                            color: {PALETTE.text_muted};
                            font-size: 1.25rem;
                            cursor: pointer;
                            padding: 0.25rem;
                        ",
                        "✕"
                    }
                }

                div {
                    style: "color: {PALETTE.text_secondary}; line-height: 1.7;",
                    {children}
                }
            }
        }
    }
}
