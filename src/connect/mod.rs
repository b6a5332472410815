//! WhatsApp OAuth connect flow: authorize URL, signal hub, callback route.

pub mod hub;
pub mod routes;

pub use hub::{ConnectHub, ConnectSubscription, ConnectedSignal};
pub use routes::{callback_routes, CallbackState};

use crate::config::OAuthConfig;

/// Build the provider authorization URL for a business.
///
/// The business id rides in the OAuth `state` parameter so the callback can
/// route the exchanged code back to the right record.
pub fn authorize_url(config: &OAuthConfig, business_id: &str) -> String {
    let mut url = config.dialog_url.clone();
    url.query_pairs_mut()
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", &config.redirect_uri)
        .append_pair("state", business_id)
        .append_pair("scope", &config.scope)
        .append_pair("response_type", "code");
    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_DIALOG_URL, DEFAULT_SCOPE};
    use reqwest::Url;

    fn oauth() -> OAuthConfig {
        OAuthConfig {
            client_id: "app-123".to_string(),
            dialog_url: Url::parse(DEFAULT_DIALOG_URL).unwrap(),
            redirect_uri: "http://localhost:8787/whatsapp/callback".to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }

    #[test]
    fn authorize_url_carries_all_parameters() {
        let url = Url::parse(&authorize_url(&oauth(), "biz-42")).unwrap();
        let params: std::collections::HashMap<_, _> = url.query_pairs().collect();

        assert_eq!(params["client_id"], "app-123");
        assert_eq!(params["state"], "biz-42");
        assert_eq!(params["response_type"], "code");
        assert_eq!(
            params["redirect_uri"],
            "http://localhost:8787/whatsapp/callback"
        );
        assert_eq!(params["scope"], DEFAULT_SCOPE);
        assert!(url.path().ends_with("/dialog/oauth"));
    }

    #[test]
    fn redirect_uri_is_percent_encoded() {
        let raw = authorize_url(&oauth(), "b1");
        assert!(raw.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8787%2Fwhatsapp%2Fcallback"));
    }
}
