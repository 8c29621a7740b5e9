//! Bookmark table access over the hosted backend's REST surface.

use std::fmt;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Bookmark, BookmarkId};
use crate::util::is_http_url;

/// Name of the hosted table that stores bookmark rows.
pub const BOOKMARKS_TABLE: &str = "bookmarks";

/// Ordering applied to every list query: newest row ids first.
const ORDER_NEWEST_FIRST: &str = "id.desc";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Invalid bookmark store configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("Invalid bookmark input: {0}")]
    InvalidInput(&'static str),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Bookmark API error: {0}")]
    Api(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Trait for bookmark storage operations (async)
#[allow(async_fn_in_trait)]
pub trait BookmarkStore {
    /// List every bookmark owned by `user_id`, newest first.
    async fn list_bookmarks(&self, access_token: &str, user_id: Uuid)
        -> StoreResult<Vec<Bookmark>>;

    /// Insert a bookmark for `user_id` and return the created row.
    async fn create_bookmark(
        &self,
        access_token: &str,
        url: &str,
        user_id: Uuid,
    ) -> StoreResult<Bookmark>;

    /// Delete the bookmark with the given row id.
    async fn delete_bookmark(&self, access_token: &str, id: BookmarkId) -> StoreResult<()>;
}

/// PostgREST-backed implementation of `BookmarkStore`.
#[derive(Clone)]
pub struct SupabaseBookmarkStore {
    rest_url: String,
    anon_key: String,
    client: Client,
}

impl SupabaseBookmarkStore {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>) -> StoreResult<Self> {
        let rest_url = normalize_rest_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(StoreError::InvalidConfiguration(
                "Supabase anon key must not be empty",
            ));
        }

        Ok(Self {
            rest_url,
            anon_key,
            client: Client::builder().build()?,
        })
    }

    fn table_url(&self) -> String {
        format!("{}/{BOOKMARKS_TABLE}", self.rest_url)
    }

    fn authed_request(&self, request: RequestBuilder, access_token: &str) -> RequestBuilder {
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
    }

    async fn send_checked(&self, request: RequestBuilder) -> StoreResult<reqwest::Response> {
        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api(parse_api_error(status, &body)));
        }
        Ok(response)
    }
}

impl BookmarkStore for SupabaseBookmarkStore {
    async fn list_bookmarks(
        &self,
        access_token: &str,
        user_id: Uuid,
    ) -> StoreResult<Vec<Bookmark>> {
        let filter = owner_filter(user_id);
        let request = self
            .authed_request(self.client.get(self.table_url()), access_token)
            .query(&[
                ("select", "*"),
                ("user_id", filter.as_str()),
                ("order", ORDER_NEWEST_FIRST),
            ]);

        let response = self.send_checked(request).await?;
        let bookmarks = response.json::<Vec<Bookmark>>().await?;
        tracing::debug!("Fetched {} bookmarks", bookmarks.len());
        Ok(bookmarks)
    }

    async fn create_bookmark(
        &self,
        access_token: &str,
        url: &str,
        user_id: Uuid,
    ) -> StoreResult<Bookmark> {
        if url.is_empty() {
            return Err(StoreError::InvalidInput("Bookmark URL must not be empty"));
        }

        let payload = serde_json::json!({
            "url": url,
            "user_id": user_id,
        });
        let request = self
            .authed_request(self.client.post(self.table_url()), access_token)
            .header("Prefer", "return=representation")
            .json(&payload);

        let response = self.send_checked(request).await?;
        let rows = response.json::<Vec<Bookmark>>().await?;
        rows.into_iter().next().ok_or_else(|| {
            StoreError::Api("Insert response did not include the created row".to_string())
        })
    }

    async fn delete_bookmark(&self, access_token: &str, id: BookmarkId) -> StoreResult<()> {
        let filter = id_filter(id);
        let request = self
            .authed_request(self.client.delete(self.table_url()), access_token)
            .query(&[("id", filter.as_str())]);

        self.send_checked(request).await?;
        tracing::debug!("Deleted bookmark {}", id);
        Ok(())
    }
}

impl fmt::Debug for SupabaseBookmarkStore {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("SupabaseBookmarkStore")
            .field("rest_url", &self.rest_url)
            .field("anon_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Equality filter that scopes a query to one owner.
fn owner_filter(user_id: Uuid) -> String {
    format!("eq.{user_id}")
}

/// Equality filter that scopes a delete to one row.
fn id_filter(id: BookmarkId) -> String {
    format!("eq.{id}")
}

pub fn normalize_rest_url(url: &str) -> StoreResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(StoreError::InvalidConfiguration(
            "Supabase URL must not be empty",
        ));
    }
    if !is_http_url(trimmed) {
        return Err(StoreError::InvalidConfiguration(
            "Supabase URL must include http:// or https://",
        ));
    }
    if trimmed.ends_with("/rest/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/rest/v1"))
    }
}

#[derive(Debug, Deserialize)]
struct StoreErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<StoreErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
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
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn normalize_rest_url_appends_rest_path() {
        let normalized = normalize_rest_url("https://demo.supabase.co").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/rest/v1");
    }

    #[test]
    fn normalize_rest_url_keeps_existing_rest_path() {
        let normalized = normalize_rest_url("https://demo.supabase.co/rest/v1/").unwrap();
        assert_eq!(normalized, "https://demo.supabase.co/rest/v1");
    }

    #[test]
    fn normalize_rest_url_rejects_invalid_values() {
        assert!(normalize_rest_url("   ").is_err());
        assert!(normalize_rest_url("demo.supabase.co").is_err());
    }

    #[test]
    fn owner_filter_uses_postgrest_equality_syntax() {
        let user_id: Uuid = "c56a4180-65aa-42ec-a945-5fd21dec0538".parse().unwrap();
        assert_eq!(
            owner_filter(user_id),
            "eq.c56a4180-65aa-42ec-a945-5fd21dec0538"
        );
    }

    #[test]
    fn id_filter_uses_postgrest_equality_syntax() {
        assert_eq!(id_filter(BookmarkId::new(42)), "eq.42");
    }

    #[test]
    fn store_constructor_rejects_blank_anon_key() {
        assert!(matches!(
            SupabaseBookmarkStore::new("https://demo.supabase.co", "   "),
            Err(StoreError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn store_debug_redacts_anon_key() {
        let store = SupabaseBookmarkStore::new("https://demo.supabase.co", "secret-anon").unwrap();
        let rendered = format!("{store:?}");
        assert!(!rendered.contains("secret-anon"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn list_payload_decodes_in_backend_order() {
        let payload = r#"[
            {
                "id": 9,
                "url": "https://second.example.com",
                "user_id": "c56a4180-65aa-42ec-a945-5fd21dec0538",
                "created_at": "2024-05-04T12:30:00+00:00"
            },
            {
                "id": 4,
                "url": "https://first.example.com",
                "user_id": "c56a4180-65aa-42ec-a945-5fd21dec0538",
                "created_at": "2024-05-01T08:00:00+00:00"
            }
        ]"#;

        let bookmarks: Vec<Bookmark> = serde_json::from_str(payload).unwrap();
        assert_eq!(bookmarks.len(), 2);
        assert_eq!(bookmarks[0].id, BookmarkId::new(9));
        assert_eq!(bookmarks[1].id, BookmarkId::new(4));
    }

    #[test]
    fn parse_api_error_prefers_message_field() {
        let rendered = parse_api_error(
            StatusCode::CONFLICT,
            r#"{"message": "duplicate key value", "code": "23505"}"#,
        );
        assert_eq!(rendered, "duplicate key value (409)");
    }

    #[test]
    fn parse_api_error_falls_back_to_raw_body() {
        assert_eq!(
            parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            "boom (500)"
        );
        assert_eq!(parse_api_error(StatusCode::INTERNAL_SERVER_ERROR, ""), "HTTP 500");
    }
}
