//! Supabase authentication service with secure session storage.

use keyring::Entry;

use markstash_core::auth::{
    AuthResult, OAuthFlow, OAuthProvider, SessionPersistence, SupabaseAuthClient,
};
pub use markstash_core::auth::{AuthError, AuthSession, AuthUser};

const KEYRING_SERVICE_NAME: &str = "markstash";
const KEYRING_SESSION_USERNAME: &str = "supabase_session";

#[derive(Debug, Clone)]
struct SessionStore {
    service_name: String,
    username: String,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self {
            service_name: KEYRING_SERVICE_NAME.to_string(),
            username: KEYRING_SESSION_USERNAME.to_string(),
        }
    }
}

impl SessionStore {
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(&self.service_name, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl SessionPersistence for SessionStore {
    fn load_session(&self) -> AuthResult<Option<AuthSession>> {
        let entry = self.entry()?;
        match entry.get_password() {
            Ok(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
        let serialized = serde_json::to_string(session)?;
        self.entry()?
            .set_password(&serialized)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }

    fn clear_session(&self) -> AuthResult<()> {
        let entry = self.entry()?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }
}

#[derive(Clone)]
pub struct SupabaseAuthService {
    inner: SupabaseAuthClient<SessionStore>,
}

impl SupabaseAuthService {
    pub fn new(url: impl AsRef<str>, anon_key: impl Into<String>) -> AuthResult<Self> {
        Ok(Self {
            inner: SupabaseAuthClient::new(url, anon_key, SessionStore::default())?,
        })
    }

    pub async fn restore_session(&self) -> AuthResult<Option<AuthSession>> {
        self.inner.restore_session().await
    }

    pub fn begin_oauth(&self, provider: OAuthProvider, redirect_to: &str) -> AuthResult<OAuthFlow> {
        self.inner.begin_oauth(provider, redirect_to)
    }

    pub async fn exchange_oauth_code(
        &self,
        flow: &OAuthFlow,
        code: &str,
    ) -> AuthResult<AuthSession> {
        self.inner.exchange_oauth_code(flow, code).await
    }

    pub async fn sign_out(&self, access_token: &str) -> AuthResult<()> {
        self.inner.sign_out(access_token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use uuid::Uuid;

    /// Keyring stand-in holding the same serialized payload the real store keeps.
    #[derive(Clone, Default)]
    struct MemoryStore {
        slot: Arc<Mutex<Option<String>>>,
    }

    impl SessionPersistence for MemoryStore {
        fn load_session(&self) -> AuthResult<Option<AuthSession>> {
            match self.slot.lock().unwrap().as_deref() {
                Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
                None => Ok(None),
            }
        }

        fn save_session(&self, session: &AuthSession) -> AuthResult<()> {
            let serialized = serde_json::to_string(session)?;
            *self.slot.lock().unwrap() = Some(serialized);
            Ok(())
        }

        fn clear_session(&self) -> AuthResult<()> {
            *self.slot.lock().unwrap() = None;
            Ok(())
        }
    }

    fn session() -> AuthSession {
        AuthSession {
            access_token: "access-token".to_string(),
            refresh_token: "refresh-token".to_string(),
            expires_at: 1_714_829_400,
            user: AuthUser {
                id: Uuid::nil(),
                email: Some("noa@example.com".to_string()),
                avatar_url: None,
            },
        }
    }

    #[test]
    fn session_store_targets_app_keyring_slot() {
        let store = SessionStore::default();
        assert_eq!(store.service_name, "markstash");
        assert_eq!(store.username, "supabase_session");
    }

    #[test]
    fn stored_session_round_trips_through_persistence() {
        let store = MemoryStore::default();
        assert_eq!(store.load_session().unwrap(), None);

        store.save_session(&session()).unwrap();
        assert_eq!(store.load_session().unwrap(), Some(session()));

        store.clear_session().unwrap();
        assert_eq!(store.load_session().unwrap(), None);
    }

    #[test]
    fn service_builds_from_a_valid_endpoint() {
        assert!(SupabaseAuthService::new("https://demo.supabase.co", "anon").is_ok());
        assert!(SupabaseAuthService::new("demo.supabase.co", "anon").is_err());
    }
}
