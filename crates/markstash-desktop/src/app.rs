//! Main application component

use std::sync::Arc;

use dioxus::prelude::*;

use markstash_core::auth::resolve_optional_supabase_config;
use markstash_core::realtime::RealtimeClient;
use markstash_core::store::SupabaseBookmarkStore;

use crate::bootstrap_config::load_bootstrap_config;
use crate::services::SupabaseAuthService;
use crate::state::{AppState, ViewMode};
use crate::theme::PALETTE;
use crate::views::{Bookmarks, Landing};

/// Small reset applied on top of the webview defaults.
const GLOBAL_CSS: &str = "
    * { box-sizing: border-box; }
    body { margin: 0; }
    button, input { font-family: inherit; }
";

/// Root application component
#[component]
pub fn App() -> Element {
    // State signals
    let mut auth_service: Signal<Option<Arc<SupabaseAuthService>>> = use_signal(|| None);
    let mut bookmark_store: Signal<Option<Arc<SupabaseBookmarkStore>>> = use_signal(|| None);
    let mut realtime_client: Signal<Option<Arc<RealtimeClient>>> = use_signal(|| None);
    let mut auth_session = use_signal(|| None);
    let mut session_checked = use_signal(|| false);
    let bookmarks = use_signal(Vec::new);
    let search_query = use_signal(String::new);
    let view_mode = use_signal(|| ViewMode::Grid);
    let saving = use_signal(|| false);
    let signing_in = use_signal(|| false);
    let status_message = use_signal(|| None::<String>);
    let mut services_initialized = use_signal(|| false);

    // Configure backend clients and restore any stored session (only once)
    use_effect(move || {
        if services_initialized() {
            return;
        }
        services_initialized.set(true); // Mark immediately to prevent double init

        let bootstrap = load_bootstrap_config();

        // Environment variables override the values baked in at build time.
        let resolved = match resolve_optional_supabase_config(
            std::env::var("SUPABASE_URL").ok(),
            std::env::var("SUPABASE_ANON_KEY").ok(),
        ) {
            Ok(Some(pair)) => Some(pair),
            Ok(None) => match resolve_optional_supabase_config(
                bootstrap.supabase_url,
                bootstrap.supabase_anon_key,
            ) {
                Ok(pair) => pair,
                Err(error) => {
                    tracing::error!(
                        "Supabase configuration in the build manifest is invalid: {}",
                        error
                    );
                    None
                }
            },
            Err(error) => {
                tracing::error!(
                    "Supabase configuration in the environment is invalid: {}",
                    error
                );
                None
            }
        };

        let service = if let Some((url, anon_key)) = resolved {
            match SupabaseBookmarkStore::new(&url, anon_key.clone()) {
                Ok(store) => bookmark_store.set(Some(Arc::new(store))),
                Err(error) => {
                    tracing::error!("Failed to configure the bookmark store: {}", error);
                }
            }
            match RealtimeClient::new(&url, anon_key.clone()) {
                Ok(client) => realtime_client.set(Some(Arc::new(client))),
                Err(error) => {
                    tracing::error!("Failed to configure the realtime client: {}", error);
                }
            }
            match SupabaseAuthService::new(&url, anon_key) {
                Ok(service) => Some(service),
                Err(error) => {
                    tracing::error!("Failed to configure the auth client: {}", error);
                    None
                }
            }
        } else {
            tracing::warn!(
                "Supabase is not configured; set SUPABASE_URL and SUPABASE_ANON_KEY to sign in"
            );
            None
        };

        if let Some(service) = service {
            let service = Arc::new(service);
            auth_service.set(Some(service.clone()));

            spawn(async move {
                match service.restore_session().await {
                    Ok(Some(session)) => {
                        tracing::info!("Restored session for user {}", session.user.id);
                        auth_session.set(Some(session));
                    }
                    Ok(None) => {
                        tracing::debug!("No stored session to restore");
                    }
                    Err(error) => {
                        tracing::warn!("Failed to restore the stored session: {}", error);
                    }
                }
                session_checked.set(true);
            });
        } else {
            session_checked.set(true);
        }
    });

    use_context_provider(|| AppState {
        auth_service,
        bookmark_store,
        realtime_client,
        auth_session,
        session_checked,
        bookmarks,
        search_query,
        view_mode,
        saving,
        signing_in,
        status_message,
    });

    rsx! {
        document::Style { "{GLOBAL_CSS}" }

        div {
            class: "app-container",
            style: "
                min-height: 100vh;
                background: {PALETTE.bg_gradient};
                color: {PALETTE.text_primary};
                font-family: system-ui, -apple-system, sans-serif;
            ",

            if !session_checked() {
                div {
                    style: "
                        min-height: 100vh;
                        display: flex;
                        align-items: center;
                        justify-content: center;
                        color: {PALETTE.text_muted};
                    ",
                    "Loading..."
                }
            } else if auth_session().is_some() {
                Bookmarks {}
            } else {
                Landing {}
            }
        }
    }
}
