//! Add bookmark form component

use dioxus::prelude::*;

use markstash_core::store::BookmarkStore;

use crate::state::AppState;
use crate::theme::PALETTE;

/// Form for saving a new URL.
///
/// Saving does not insert into the local list; the realtime subscription
/// delivers the change and the loader refetches. The input clears once the
/// request finishes, whether it succeeded or not.
#[component]
pub fn AddBookmark() -> Element {
    let mut state = use_context::<AppState>();
    let mut url = use_signal(String::new);

    let submit = move || {
        let entered = url.read().clone();
        if entered.is_empty() || *state.saving.read() {
            return;
        }
        state.saving.set(true);

        spawn(async move {
            let store = (state.bookmark_store)();
            let session = (state.auth_session)();
            if let (Some(store), Some(session)) = (store, session) {
                match store
                    .create_bookmark(&session.access_token, &entered, session.user.id)
                    .await
                {
                    Ok(bookmark) => {
                        tracing::debug!("Saved bookmark {}", bookmark.id);
                        state.status_message.set(None);
                    }
                    Err(error) => {
                        tracing::error!("Failed to save bookmark: {}", error);
                        state
                            .status_message
                            .set(Some("Couldn't save bookmark".to_string()));
                    }
                }
            }
            url.set(String::new());
            state.saving.set(false);
        });
    };

    let is_saving = (state.saving)();
    let can_submit = !is_saving && !url.read().is_empty();
    let button_opacity = if can_submit { "1" } else { "0.6" };

    rsx! {
        div {
            class: "add-bookmark-section",
            style: "margin-bottom: 2.5rem;",

            h2 {
                style: "font-size: 1.5rem; font-weight: 700; margin: 0 0 1rem 0; color: {PALETTE.text_primary};",
                "Add New Bookmark"
            }

            div {
                class: "add-bookmark-card",
                style: "
                    background: {PALETTE.surface};
                    border: 1px solid {PALETTE.border};
                    border-radius: 16px;
                    padding: 2rem;
                ",

                div {
                    style: "display: flex; gap: 1rem;",

                    input {
                        r#type: "text",
                        placeholder: "Paste your URL here... (e.g., https://example.com)",
                        value: "{url}",
                        oninput: move |evt| url.set(evt.value()),
                        onkeydown: move |evt| {
                            if evt.key() == Key::Enter {
                                submit();
                            }
                        },
                        style: "
                            flex: 1;
                            padding: 1rem;
                            background: rgba(255, 255, 255, 0.05);
                            border: 1px solid {PALETTE.border};
                            border-radius: 12px;
                            color: {PALETTE.text_primary};
                            font-size: 1rem;
                            outline: none;
                        ",
                    }

                    button {
                        disabled: !can_submit,
                        onclick: move |_| submit(),
                        style: "
                            padding: 1rem 2rem;
                            background: {PALETTE.accent_gradient};
                            border: none;
                            border-radius: 12px;
                            color: {PALETTE.text_primary};
                            font-size: 1rem;
                            font-weight: 600;
                            cursor: pointer;
                            white-space: nowrap;
                            opacity: {button_opacity};
                        ",
                        if is_saving {
                            "Adding..."
                        } else {
                            "+ Add Bookmark"
                        }
                    }
                }
            }
        }
    }
}
