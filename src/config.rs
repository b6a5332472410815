//! Configuration, built from environment variables.

use reqwest::Url;

use crate::error::ConfigError;

/// Default Meta OAuth dialog endpoint.
pub const DEFAULT_DIALOG_URL: &str = "https://www.facebook.com/v18.0/dialog/oauth";

/// Default OAuth scopes for WhatsApp Business access.
pub const DEFAULT_SCOPE: &str = "whatsapp_business_management,whatsapp_business_messaging";

/// Top-level configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the backend REST API, e.g. `http://localhost:5000/api`.
    pub api_base_url: String,
    /// Local port the OAuth callback server listens on.
    pub callback_port: u16,
    /// External chat-transcript store. `None` disables persistence.
    pub chat_store: Option<ChatStoreConfig>,
    /// WhatsApp OAuth settings. `None` disables the connect action.
    pub oauth: Option<OAuthConfig>,
}

impl Config {
    /// Build config from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_base_url = std::env::var("BOTBUILDER_API_URL")
            .unwrap_or_else(|_| "http://localhost:5000/api".to_string());

        let callback_port: u16 = match std::env::var("BOTBUILDER_CALLBACK_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "BOTBUILDER_CALLBACK_PORT".to_string(),
                message: format!("not a valid port: {raw}"),
            })?,
            Err(_) => 8787,
        };

        Ok(Self {
            api_base_url,
            callback_port,
            chat_store: ChatStoreConfig::from_env(),
            oauth: OAuthConfig::from_env(callback_port)?,
        })
    }
}

/// Connection settings for the external chat store (PostgREST-style).
#[derive(Debug, Clone)]
pub struct ChatStoreConfig {
    pub base_url: String,
    pub api_key: String,
}

impl ChatStoreConfig {
    /// Returns `None` if `SUPABASE_URL` is not set (persistence disabled).
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("SUPABASE_URL").ok()?;
        let api_key = std::env::var("SUPABASE_KEY").unwrap_or_default();
        Some(Self { base_url, api_key })
    }
}

/// OAuth settings for the WhatsApp connect flow.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    /// App client identifier registered with the provider.
    pub client_id: String,
    /// Provider authorization dialog endpoint.
    pub dialog_url: Url,
    /// Where the provider redirects after authorization.
    pub redirect_uri: String,
    /// Requested scopes, comma-separated.
    pub scope: String,
}

impl OAuthConfig {
    /// Build from environment variables.
    ///
    /// Returns `Ok(None)` if `WHATSAPP_CLIENT_ID` is not set — the connect
    /// action is disabled but earlier onboarding phases are unaffected.
    pub fn from_env(callback_port: u16) -> Result<Option<Self>, ConfigError> {
        let client_id = match std::env::var("WHATSAPP_CLIENT_ID") {
            Ok(id) if !id.trim().is_empty() => id,
            _ => return Ok(None),
        };

        let raw_dialog = std::env::var("WHATSAPP_DIALOG_URL")
            .unwrap_or_else(|_| DEFAULT_DIALOG_URL.to_string());
        let dialog_url = Url::parse(&raw_dialog).map_err(|e| ConfigError::InvalidValue {
            key: "WHATSAPP_DIALOG_URL".to_string(),
            message: e.to_string(),
        })?;

        let redirect_uri = std::env::var("WHATSAPP_REDIRECT_URI").unwrap_or_else(|_| {
            format!("http://localhost:{callback_port}/whatsapp/callback")
        });

        let scope =
            std::env::var("WHATSAPP_SCOPE").unwrap_or_else(|_| DEFAULT_SCOPE.to_string());

        Ok(Some(Self {
            client_id,
            dialog_url,
            redirect_uri,
            scope,
        }))
    }
}
