//! Desktop bootstrap configuration loaded from build-time generated JSON.

use serde::{Deserialize, Serialize};

/// Build-provisioned client configuration embedded into desktop binaries.
///
/// These values are safe-to-ship public endpoints/keys required to bootstrap
/// auth, bookmark storage, and realtime flows. Secret credentials must never
/// be stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DesktopBootstrapConfig {
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
}

/// Loads the generated desktop bootstrap JSON from `OUT_DIR`.
///
/// If parsing fails, this logs a warning and returns a default empty config so
/// the app can continue running in signed-out mode.
pub fn load_bootstrap_config() -> DesktopBootstrapConfig {
    let raw = include_str!(concat!(env!("OUT_DIR"), "/desktop-bootstrap.json"));
    serde_json::from_str(raw).unwrap_or_else(|error| {
        tracing::warn!("Failed to parse desktop bootstrap config: {}", error);
        DesktopBootstrapConfig::default()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: DesktopBootstrapConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, DesktopBootstrapConfig::default());
    }

    #[test]
    fn known_fields_round_trip() {
        let config = DesktopBootstrapConfig {
            supabase_url: Some("https://demo.supabase.co".to_string()),
            supabase_anon_key: Some("anon".to_string()),
        };
        let encoded = serde_json::to_string(&config).unwrap();
        let decoded: DesktopBootstrapConfig = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, config);
    }

    #[test]
    fn unknown_manifest_fields_are_ignored() {
        let raw = r#"{"supabase_url":"https://demo.supabase.co","generated_by":"build.rs"}"#;
        let config: DesktopBootstrapConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(
            config.supabase_url.as_deref(),
            Some("https://demo.supabase.co")
        );
        assert_eq!(config.supabase_anon_key, None);
    }
}
