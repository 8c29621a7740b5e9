//! Application services
//!
//! Services for hosted-backend access and the OAuth redirect flow.

mod auth;
mod oauth;

pub use auth::{AuthSession, AuthUser, SupabaseAuthService};
pub use oauth::OAuthCallbackServer;
