//! OAuth callback endpoint.
//!
//! The provider redirects the popup here with `code` and `state` (the
//! business id). The handler exchanges the code through the backend and
//! fires the connect hub, which stands in for the popup's same-origin
//! `WHATSAPP_CONNECTED` message to its opener.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

use crate::api::BusinessApi;

use super::hub::ConnectHub;

/// Shared state for the callback route.
#[derive(Clone)]
pub struct CallbackState {
    pub api: Arc<dyn BusinessApi>,
    pub hub: Arc<ConnectHub>,
}

#[derive(Debug, Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
    error: Option<String>,
    error_description: Option<String>,
}

/// GET /whatsapp/callback?code=&state=
async fn whatsapp_callback(
    State(state): State<CallbackState>,
    Query(params): Query<CallbackParams>,
) -> impl IntoResponse {
    if let Some(error) = params.error {
        let detail = params.error_description.unwrap_or_default();
        tracing::warn!(error, detail, "Provider rejected the authorization");
        return (
            StatusCode::BAD_REQUEST,
            Html(page("Connection failed", "The provider rejected the authorization. You can close this window and try again.")),
        );
    }

    let (Some(code), Some(business_id)) = (params.code, params.state) else {
        return (
            StatusCode::BAD_REQUEST,
            Html(page(
                "Connection failed",
                "Missing authorization code or business ID.",
            )),
        );
    };

    match state.api.connect_whatsapp(&business_id, &code).await {
        Ok(()) => {
            if !state.hub.notify(&business_id) {
                tracing::warn!(business_id, "No pending handshake for connected business");
            }
            (
                StatusCode::OK,
                Html(page(
                    "WhatsApp connected",
                    "WhatsApp connected successfully! You can close this window.",
                )),
            )
        }
        Err(e) => {
            tracing::error!(business_id, error = %e, "WhatsApp code exchange failed");
            (
                StatusCode::BAD_GATEWAY,
                Html(page(
                    "Connection failed",
                    "Failed to connect WhatsApp. Please close this window and try again.",
                )),
            )
        }
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!doctype html><html><head><title>{title}</title></head>\
         <body style=\"font-family: sans-serif; text-align: center; padding: 48px\">\
         <h2>{title}</h2><p>{body}</p></body></html>"
    )
}

/// Build the callback router.
pub fn callback_routes(state: CallbackState) -> Router {
    Router::new()
        .route("/whatsapp/callback", get(whatsapp_callback))
        .with_state(state)
}
