//! Shared Supabase auth client logic.

mod pkce;

use std::fmt;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::util::{is_http_url, normalize_text_option, unix_timestamp_now};

const EXPIRY_SKEW_SECONDS: i64 = 60;

/// Base URL of the third-party generated-avatar service consumed as a URL template
pub const AVATAR_FALLBACK_ENDPOINT: &str = "https://ui-avatars.com/api/";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

impl AuthUser {
    /// Avatar image URL for display, falling back to a generated-initials avatar.
    #[must_use]
    pub fn avatar_or_fallback(&self) -> String {
        match self.avatar_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => {
                let name = self.email.as_deref().unwrap_or("User");
                format!(
                    "{AVATAR_FALLBACK_ENDPOINT}?name={}&background=667eea&color=fff",
                    urlencoding::encode(name)
                )
            }
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: AuthUser,
}

impl AuthSession {
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= unix_timestamp_now() + EXPIRY_SKEW_SECONDS
    }
}

impl fmt::Debug for AuthSession {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("AuthSession")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .field("user", &self.user)
            .finish()
    }
}

/// External identity provider selectable for the OAuth flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OAuthProvider {
    Google,
    Github,
}

impl OAuthProvider {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Github => "github",
        }
    }
}

impl fmt::Display for OAuthProvider {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// An OAuth sign-in in progress: the URL to open in the system browser and
/// the PKCE verifier to redeem once the provider redirects back with a code.
#[derive(Clone)]
pub struct OAuthFlow {
    pub authorize_url: String,
    code_verifier: String,
}

impl fmt::Debug for OAuthFlow {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("OAuthFlow")
            .field("authorize_url", &self.authorize_url)
            .field("code_verifier", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Supabase auth is not configured for this build.")]
    NotConfigured,
    #[error("Invalid auth configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Failed to parse JSON payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Auth API error: {0}")]
    Api(String),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
    #[error("Secure random generator is unavailable")]
    Random,
}

pub type AuthResult<T> = Result<T, AuthError>;

pub trait SessionPersistence: Clone + Send + Sync + 'static {
    fn load_session(&self) -> AuthResult<Option<AuthSession>>;
    fn save_session(&self, session: &AuthSession) -> AuthResult<()>;
    fn clear_session(&self) -> AuthResult<()>;
}

#[derive(Clone)]
pub struct SupabaseAuthClient<S: SessionPersistence> {
    auth_url: String,
    anon_key: String,
    client: Client,
    store: S,
}

impl<S: SessionPersistence> SupabaseAuthClient<S> {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>, store: S) -> AuthResult<Self> {
        let auth_url = normalize_auth_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Supabase anon key must not be empty",
            ));
        }

        Ok(Self {
            auth_url,
            anon_key,
            client: Client::builder().build()?,
            store,
        })
    }

    /// Restore the persisted session, refreshing it first when it has expired.
    ///
    /// A failed refresh clears the stored session and reads as "signed out".
    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        let Some(stored_session) = self.store.load_session()? else {
            return Ok(None);
        };

        if !stored_session.is_expired() {
            return Ok(Some(stored_session));
        }

        match self.refresh_session(&stored_session.refresh_token).await {
            Ok(refreshed) => Ok(Some(refreshed)),
            Err(error) => {
                tracing::warn!("Failed to refresh persisted session: {}", error);
                self.store.clear_session()?;
                Ok(None)
            }
        }
    }

    /// Build the provider authorize URL for a PKCE sign-in.
    ///
    /// The returned flow carries the code verifier; hold on to it and pass it
    /// to [`Self::exchange_oauth_code`] once the provider redirects back.
    pub fn begin_oauth(
        &self,
        provider: OAuthProvider,
        redirect_to: &str,
    ) -> AuthResult<OAuthFlow> {
        if redirect_to.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "OAuth redirect target must not be empty",
            ));
        }

        let code_verifier = pkce::generate_code_verifier()?;
        let code_challenge = pkce::code_challenge(&code_verifier);
        let authorize_url = format!(
            "{}/authorize?provider={}&redirect_to={}&code_challenge={}&code_challenge_method=s256",
            self.auth_url,
            provider.as_str(),
            urlencoding::encode(redirect_to),
            code_challenge,
        );

        Ok(OAuthFlow {
            authorize_url,
            code_verifier,
        })
    }

    /// Redeem the authorization code from the provider redirect for a session.
    pub async fn exchange_oauth_code(
        &self,
        flow: &OAuthFlow,
        code: &str,
    ) -> AuthResult<AuthSession> {
        if code.trim().is_empty() {
            return Err(AuthError::Api(
                "OAuth callback did not include an authorization code".to_string(),
            ));
        }

        let payload = serde_json::json!({
            "auth_code": code,
            "code_verifier": flow.code_verifier,
        });
        let request = self.public_request(
            self.client
                .post(format!("{}/token", self.auth_url))
                .query(&[("grant_type", "pkce")])
                .json(&payload),
        );

        let response = self.send_auth_request(request).await?;
        let session = response.into_session()?.ok_or_else(|| {
            AuthError::Api("Code exchange response did not include an active session".to_string())
        })?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    pub async fn refresh_session(&self, refresh_token: &str) -> AuthResult<AuthSession> {
        if refresh_token.trim().is_empty() {
            return Err(AuthError::InvalidConfiguration(
                "Refresh token must not be empty",
            ));
        }

        let payload = serde_json::json!({
            "refresh_token": refresh_token,
        });
        let request = self.public_request(
            self.client
                .post(format!("{}/token", self.auth_url))
                .query(&[("grant_type", "refresh_token")])
                .json(&payload),
        );
        let response = self.send_auth_request(request).await?;
        let session = response.into_session()?.ok_or_else(|| {
            AuthError::Api("Refresh response did not include an active session".to_string())
        })?;

        self.store.save_session(&session)?;
        Ok(session)
    }

    /// Revoke the session server-side and drop the persisted copy.
    ///
    /// The local session is cleared even when the revocation request fails,
    /// so a signed-out user never comes back signed in after a restart.
    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        let request = self
            .client
            .post(format!("{}/logout", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token);

        let revocation = match request.send().await {
            Ok(response)
                if response.status().is_success()
                    || response.status() == StatusCode::UNAUTHORIZED =>
            {
                Ok(())
            }
            Ok(response) => {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                Err(AuthError::Api(parse_api_error(status, &body)))
            }
            Err(error) => Err(error.into()),
        };

        self.store.clear_session()?;
        revocation
    }

    fn public_request(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .header("Authorization", format!("Bearer {}", self.anon_key))
    }

    async fn send_auth_request(&self, request: RequestBuilder) -> AuthResult<SupabaseAuthResponse> {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AuthError::Api(parse_api_error(status, &body)));
        }
        Ok(response.json::<SupabaseAuthResponse>().await?)
    }
}

impl<S: SessionPersistence> fmt::Debug for SupabaseAuthClient<S> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SupabaseAuthClient")
            .field("auth_url", &self.auth_url)
            .field("anon_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

pub fn normalize_auth_url(url: &str) -> AuthResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(AuthError::InvalidConfiguration(
            "Supabase URL must not be empty",
        ));
    }
    if !is_http_url(trimmed) {
        return Err(AuthError::InvalidConfiguration(
            "Supabase URL must include http:// or https://",
        ));
    }
    if trimmed.ends_with("/auth/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/auth/v1"))
    }
}

pub fn resolve_optional_supabase_config(
    url: Option<String>,
    anon_key: Option<String>,
) -> AuthResult<Option<(String, String)>> {
    let url = normalize_text_option(url);
    let anon_key = normalize_text_option(anon_key);

    match (url, anon_key) {
        (None, None) => Ok(None),
        (Some(url), Some(anon_key)) => Ok(Some((url, anon_key))),
        _ => Err(AuthError::NotConfigured),
    }
}

#[derive(Debug, Deserialize)]
struct SupabaseAuthResponse {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<SupabaseUser>,
    session: Option<SupabaseAuthResponseSession>,
}

impl SupabaseAuthResponse {
    fn into_session(self) -> AuthResult<Option<AuthSession>> {
        let nested_session = self.session;
        let access_token = self.access_token.or_else(|| {
            nested_session
                .as_ref()
                .and_then(|session| session.access_token.clone())
        });
        let refresh_token = self.refresh_token.or_else(|| {
            nested_session
                .as_ref()
                .and_then(|session| session.refresh_token.clone())
        });
        let expires_at = self
            .expires_at
            .or_else(|| {
                nested_session
                    .as_ref()
                    .and_then(|session| session.expires_at)
            })
            .or_else(|| {
                self.expires_in
                    .or_else(|| {
                        nested_session
                            .as_ref()
                            .and_then(|session| session.expires_in)
                    })
                    .map(|expires_in| unix_timestamp_now().saturating_add(expires_in))
            });
        let user = self
            .user
            .or_else(|| nested_session.and_then(|session| session.user))
            .map(Into::into);

        match (access_token, refresh_token, expires_at, user) {
            (Some(access_token), Some(refresh_token), Some(expires_at), Some(user)) => {
                Ok(Some(AuthSession {
                    access_token,
                    refresh_token,
                    expires_at,
                    user,
                }))
            }
            (None, None, None, Some(_)) => Ok(None),
            _ => Err(AuthError::Api(
                "Auth response did not include enough session fields".to_string(),
            )),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SupabaseAuthResponseSession {
    access_token: Option<String>,
    refresh_token: Option<String>,
    expires_at: Option<i64>,
    expires_in: Option<i64>,
    user: Option<SupabaseUser>,
}

#[derive(Debug, Deserialize)]
struct SupabaseUser {
    id: Uuid,
    email: Option<String>,
    #[serde(default)]
    user_metadata: SupabaseUserMetadata,
}

#[derive(Debug, Default, Deserialize)]
struct SupabaseUserMetadata {
    #[serde(default)]
    avatar_url: Option<String>,
}

impl From<SupabaseUser> for AuthUser {
    fn from(value: SupabaseUser) -> Self {
        Self {
            id: value.id,
            email: value.email,
            avatar_url: value.user_metadata.avatar_url,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SupabaseErrorResponse {
    error: Option<String>,
    error_description: Option<String>,
    message: Option<String>,
    msg: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<SupabaseErrorResponse>(body) {
        if let Some(message) = payload
            .message
            .or(payload.msg)
            .or(payload.error_description)
            .or(payload.error)
        {
            return format!("{} ({})", message.trim(), status.as_u16());
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status.as_u16())
    } else {
        format!("{} ({})", trimmed, status.as_u16())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone)]
    struct NullStore;

    impl SessionPersistence for NullStore {
        fn load_session(&self) -> AuthResult<Option<AuthSession>> {
            Ok(None)
        }

        fn save_session(&self, _session: &AuthSession) -> AuthResult<()> {
            Ok(())
        }

        fn clear_session(&self) -> AuthResult<()> {
            Ok(())
        }
    }

    fn test_client() -> SupabaseAuthClient<NullStore> {
        SupabaseAuthClient::new("https://demo.supabase.co", "anon-key", NullStore).unwrap()
    }

    fn sample_user() -> AuthUser {
        AuthUser {
            id: Uuid::nil(),
            email: Some("user@example.com".to_string()),
            avatar_url: None,
        }
    }

    #[test]
    fn normalize_auth_url_appends_auth_path() {
        let normalized = normalize_auth_url("https://demo.supabase.co").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/auth/v1");
    }

    #[test]
    fn normalize_auth_url_keeps_existing_auth_path() {
        let normalized = normalize_auth_url("https://demo.supabase.co/auth/v1").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/auth/v1");
    }

    #[test]
    fn normalize_auth_url_rejects_missing_scheme() {
        assert!(matches!(
            normalize_auth_url("demo.supabase.co"),
            Err(AuthError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn resolve_optional_config_requires_both_values() {
        assert!(resolve_optional_supabase_config(None, None)
            .unwrap()
            .is_none());
        assert!(matches!(
            resolve_optional_supabase_config(Some("https://demo.supabase.co".to_string()), None),
            Err(AuthError::NotConfigured)
        ));
        assert!(matches!(
            resolve_optional_supabase_config(None, Some("anon".to_string())),
            Err(AuthError::NotConfigured)
        ));
    }

    #[test]
    fn begin_oauth_builds_authorize_url_with_pkce_params() {
        let client = test_client();
        let flow = client
            .begin_oauth(OAuthProvider::Google, "http://127.0.0.1:7878/auth/callback")
            .unwrap();

        assert!(flow
            .authorize_url
            .starts_with("https://demo.supabase.co/auth/v1/authorize?provider=google"));
        assert!(flow
            .authorize_url
            .contains("redirect_to=http%3A%2F%2F127.0.0.1%3A7878%2Fauth%2Fcallback"));
        assert!(flow.authorize_url.contains("code_challenge_method=s256"));

        let challenge = flow
            .authorize_url
            .split("code_challenge=")
            .nth(1)
            .and_then(|rest| rest.split('&').next())
            .unwrap();
        assert_eq!(challenge, pkce::code_challenge(&flow.code_verifier));
    }

    #[test]
    fn begin_oauth_rejects_empty_redirect() {
        let client = test_client();
        assert!(matches!(
            client.begin_oauth(OAuthProvider::Github, "   "),
            Err(AuthError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn token_response_with_expires_in_maps_to_session() {
        let payload = r#"{
            "access_token": "access",
            "refresh_token": "refresh",
            "expires_in": 3600,
            "user": {
                "id": "c56a4180-65aa-42ec-a945-5fd21dec0538",
                "email": "user@example.com",
                "user_metadata": {
                    "avatar_url": "https://lh3.example.com/photo.jpg"
                }
            }
        }"#;

        let response: SupabaseAuthResponse = serde_json::from_str(payload).unwrap();
        let session = response.into_session().unwrap().unwrap();
        assert_eq!(session.access_token, "access");
        assert!(session.expires_at > unix_timestamp_now());
        assert_eq!(
            session.user.avatar_url.as_deref(),
            Some("https://lh3.example.com/photo.jpg")
        );
    }

    #[test]
    fn response_without_session_fields_yields_none() {
        let payload = r#"{
            "user": {
                "id": "c56a4180-65aa-42ec-a945-5fd21dec0538",
                "email": "user@example.com"
            }
        }"#;

        let response: SupabaseAuthResponse = serde_json::from_str(payload).unwrap();
        assert!(response.into_session().unwrap().is_none());
    }

    #[test]
    fn session_debug_redacts_tokens() {
        let session = AuthSession {
            access_token: "secret-access-token".to_string(),
            refresh_token: "secret-refresh-token".to_string(),
            expires_at: 1_700_000_000,
            user: sample_user(),
        };
        let rendered = format!("{session:?}");
        assert!(!rendered.contains("secret-access-token"));
        assert!(!rendered.contains("secret-refresh-token"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn oauth_flow_debug_redacts_verifier() {
        let client = test_client();
        let flow = client
            .begin_oauth(OAuthProvider::Google, "http://127.0.0.1:7878/auth/callback")
            .unwrap();
        let rendered = format!("{flow:?}");
        assert!(!rendered.contains(&flow.code_verifier));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn avatar_fallback_encodes_email() {
        let user = sample_user();
        assert_eq!(
            user.avatar_or_fallback(),
            "https://ui-avatars.com/api/?name=user%40example.com&background=667eea&color=fff"
        );
    }

    #[test]
    fn avatar_prefers_provider_image() {
        let user = AuthUser {
            avatar_url: Some("https://lh3.example.com/photo.jpg".to_string()),
            ..sample_user()
        };
        assert_eq!(user.avatar_or_fallback(), "https://lh3.example.com/photo.jpg");
    }

    #[test]
    fn parse_api_error_prefers_message_fields() {
        let rendered = parse_api_error(
            StatusCode::BAD_REQUEST,
            r#"{"error_description": "invalid code"}"#,
        );
        assert_eq!(rendered, "invalid code (400)");
    }

    #[test]
    fn parse_api_error_falls_back_to_body_text() {
        let rendered = parse_api_error(StatusCode::BAD_GATEWAY, "upstream exploded");
        assert_eq!(rendered, "upstream exploded (502)");
        assert_eq!(parse_api_error(StatusCode::BAD_GATEWAY, "  "), "HTTP 502");
    }
}
