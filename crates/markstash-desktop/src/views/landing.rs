//! Landing view - sign-in screen shown to signed-out users

use dioxus::prelude::*;

use markstash_core::auth::OAuthProvider;

use crate::components::InfoModal;
use crate::services::OAuthCallbackServer;
use crate::state::AppState;
use crate::theme::PALETTE;

/// Informational panels reachable from the nav and footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InfoPanel {
    About,
    Features,
    Privacy,
    Terms,
    Contact,
}

impl InfoPanel {
    const fn title(self) -> &'static str {
        match self {
            Self::About => "About Markstash",
            Self::Features => "Features",
            Self::Privacy => "Privacy Policy",
            Self::Terms => "Terms of Service",
            Self::Contact => "Contact",
        }
    }
}

/// Landing view component - marketing copy plus the Google sign-in flow
#[component]
pub fn Landing() -> Element {
    let state = use_context::<AppState>();
    let mut open_panel = use_signal(|| None::<InfoPanel>);

    let signing_in = (state.signing_in)();
    let cta_opacity = if signing_in { "0.6" } else { "1" };

    let sign_in = move |_: MouseEvent| {
        if *state.signing_in.read() {
            return;
        }

        let mut signing_in_signal = state.signing_in;
        let mut auth_session_signal = state.auth_session;
        signing_in_signal.set(true);

        spawn(async move {
            let Some(auth) = (state.auth_service)() else {
                tracing::error!(
                    "Sign-in requested without a configured auth service. Set SUPABASE_URL and SUPABASE_ANON_KEY."
                );
                signing_in_signal.set(false);
                return;
            };

            let server = match OAuthCallbackServer::bind().await {
                Ok(server) => server,
                Err(error) => {
                    tracing::error!("Failed to start the OAuth callback listener: {}", error);
                    signing_in_signal.set(false);
                    return;
                }
            };

            let flow = match auth.begin_oauth(OAuthProvider::Google, &server.redirect_url()) {
                Ok(flow) => flow,
                Err(error) => {
                    tracing::error!("Failed to build the Google authorize URL: {}", error);
                    signing_in_signal.set(false);
                    return;
                }
            };

            if let Err(error) = webbrowser::open(&flow.authorize_url) {
                tracing::error!("Failed to open the system browser for sign-in: {}", error);
                signing_in_signal.set(false);
                return;
            }

            let code = match server.wait_for_code().await {
                Ok(code) => code,
                Err(error) => {
                    tracing::error!("OAuth callback did not complete: {}", error);
                    signing_in_signal.set(false);
                    return;
                }
            };

            match auth.exchange_oauth_code(&flow, &code).await {
                Ok(session) => {
                    auth_session_signal.set(Some(session));
                }
                Err(error) => {
                    tracing::error!("Failed to exchange the OAuth code: {}", error);
                }
            }
            signing_in_signal.set(false);
        });
    };

    rsx! {
        div {
            class: "landing-container",
            style: "min-height: 100vh; display: flex; flex-direction: column;",

            nav {
                style: "
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    max-width: 1200px;
                    width: 100%;
                    margin: 0 auto;
                    padding: 1.5rem 2rem;
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
                    style: "display: flex; gap: 1.5rem;",
                    NavButton { label: "Features", onclick: move |_| open_panel.set(Some(InfoPanel::Features)) }
                    NavButton { label: "About", onclick: move |_| open_panel.set(Some(InfoPanel::About)) }
                }
            }

            main {
                style: "
                    flex: 1;
                    max-width: 800px;
                    margin: 0 auto;
                    padding: 4rem 2rem 3rem;
                    text-align: center;
                ",
                div {
                    style: "
                        display: inline-block;
                        padding: 0.375rem 1rem;
                        background: rgba(102, 126, 234, 0.15);
                        border: 1px solid {PALETTE.border_accent};
                        border-radius: 999px;
                        color: {PALETTE.accent_soft};
                        font-size: 0.875rem;
                        margin-bottom: 1.5rem;
                    ",
                    "Your bookmarks, in one place"
                }
                h1 {
                    style: "font-size: 3rem; line-height: 1.15; color: {PALETTE.text_primary}; margin: 0 0 1.25rem;",
                    "Save it now. "
                    span {
                        style: "
                            background: {PALETTE.accent_gradient};
                            -webkit-background-clip: text;
                            background-clip: text;
                            color: transparent;
                        ",
                        "Find it later."
                    }
                }
                p {
                    style: "font-size: 1.125rem; color: {PALETTE.text_secondary}; line-height: 1.7; margin: 0 0 2rem;",
                    "Markstash keeps every link you care about in one tidy place. "
                    "Sign in, paste a URL, and it lands in your collection instantly."
                }
                div {
                    style: "display: flex; justify-content: center; gap: 0.75rem; flex-wrap: wrap; margin-bottom: 2.5rem;",
                    FeaturePill { label: "One-step saving" }
                    FeaturePill { label: "Live sync" }
                    FeaturePill { label: "Instant search" }
                }
                button {
                    disabled: signing_in,
                    onclick: sign_in,
                    style: "
                        padding: 1rem 2.5rem;
                        background: {PALETTE.accent_gradient};
                        border: none;
                        border-radius: 12px;
                        color: #ffffff;
                        font-size: 1.0625rem;
                        font-weight: 600;
                        cursor: pointer;
                        opacity: {cta_opacity};
                    ",
                    if signing_in {
                        "Connecting..."
                    } else {
                        "Continue with Google"
                    }
                }
                p {
                    style: "font-size: 0.8125rem; color: {PALETTE.text_muted}; margin-top: 1rem;",
                    "We only use your Google account to sign you in. No spam, ever."
                }
            }

            section {
                style: "
                    display: grid;
                    grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
                    gap: 1.5rem;
                    max-width: 1000px;
                    width: 100%;
                    margin: 0 auto;
                    padding: 0 2rem 4rem;
                ",
                FeatureCard {
                    title: "Save in one step",
                    text: "Paste a link and press Enter. No folders to pick, no forms to fill.",
                }
                FeatureCard {
                    title: "Synced as it happens",
                    text: "Add or remove a bookmark anywhere and every open window updates on its own.",
                }
                FeatureCard {
                    title: "Search that keeps up",
                    text: "Filter your whole collection by URL as fast as you can type.",
                }
            }

            footer {
                style: "
                    display: flex;
                    justify-content: space-between;
                    align-items: center;
                    flex-wrap: wrap;
                    gap: 1rem;
                    max-width: 1200px;
                    width: 100%;
                    margin: 0 auto;
                    padding: 1.5rem 2rem;
                    border-top: 1px solid {PALETTE.border};
                ",
                span {
                    style: "font-size: 0.875rem; color: {PALETTE.text_muted};",
                    "© 2026 Markstash"
                }
                div {
                    style: "display: flex; gap: 1.5rem;",
                    NavButton { label: "Privacy", onclick: move |_| open_panel.set(Some(InfoPanel::Privacy)) }
                    NavButton { label: "Terms", onclick: move |_| open_panel.set(Some(InfoPanel::Terms)) }
                    NavButton { label: "Contact", onclick: move |_| open_panel.set(Some(InfoPanel::Contact)) }
                }
            }

            if let Some(panel) = open_panel() {
                InfoModal {
                    title: panel.title().to_string(),
                    onclose: move |_| open_panel.set(None),
                    {panel_body(panel)}
                }
            }
        }
    }
}

/// Plain text link-style button used in the nav and footer
#[component]
fn NavButton(label: &'static str, onclick: EventHandler<MouseEvent>) -> Element {
    rsx! {
        button {
            onclick: move |evt| onclick.call(evt),
            style: "
                background: none;
                border: none;
                padding: 0;
                color: {PALETTE.text_secondary};
                font-size: 0.9375rem;
                cursor: pointer;
            ",
            "{label}"
        }
    }
}

#[component]
fn FeaturePill(label: &'static str) -> Element {
    rsx! {
        span {
            style: "
                padding: 0.5rem 1.25rem;
                background: {PALETTE.surface};
                border: 1px solid {PALETTE.border};
                border-radius: 999px;
                color: {PALETTE.text_secondary};
                font-size: 0.875rem;
            ",
            "{label}"
        }
    }
}

#[component]
fn FeatureCard(title: &'static str, text: &'static str) -> Element {
    rsx! {
        div {
            style: "
                padding: 1.75rem;
                background: {PALETTE.surface};
                border: 1px solid {PALETTE.border};
                border-radius: 16px;
                text-align: left;
            ",
            h3 {
                style: "font-size: 1.125rem; color: {PALETTE.text_primary}; margin: 0 0 0.5rem;",
                "{title}"
            }
            p {
                style: "font-size: 0.9375rem; color: {PALETTE.text_secondary}; line-height: 1.6; margin: 0;",
                "{text}"
            }
        }
    }
}

fn panel_body(panel: InfoPanel) -> Element {
    match panel {
        InfoPanel::About => rsx! {
            p {
                "Markstash is a small desktop app for people who collect links. "
                "It does one thing: it keeps the URLs you save in a single, searchable list tied to your account."
            }
            p {
                "There are no folders, tags, or read-later queues to maintain. "
                "Paste a link, find it again later. That is the whole product."
            }
        },
        InfoPanel::Features => rsx! {
            p { "Everything Markstash does today:" }
            ul {
                style: "padding-left: 1.25rem; margin: 0.75rem 0;",
                li { "Save any URL with a single keystroke." }
                li { "Your list updates live when bookmarks change, even from another window." }
                li { "Case-insensitive search across every saved URL." }
                li { "Grid and list layouts for browsing your collection." }
                li { "Sign in with Google. No separate password to remember." }
            }
        },
        InfoPanel::Privacy => rsx! {
            p {
                "Markstash stores the URLs you save, your account id, and the email address "
                "and avatar provided by Google sign-in. Nothing else."
            }
            p {
                "Your bookmarks are private to your account and are never shared, sold, or used "
                "for advertising. Deleting a bookmark removes it permanently."
            }
        },
        InfoPanel::Terms => rsx! {
            p {
                "Markstash is provided as-is, without warranty of any kind. "
                "You are responsible for the links you save."
            }
            p {
                "Accounts used to store unlawful content may be removed. "
                "These terms may change as the product evolves."
            }
        },
        InfoPanel::Contact => rsx! {
            p {
                "Questions, bug reports, or ideas? Open an issue on the project repository "
                "or email the maintainer at hello@markstash.app."
            }
        },
    }
}
