//! Backend REST API client.

mod http;

pub use http::HttpBusinessApi;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ApiError;
use crate::session::model::{Business, BusinessProfile, Turn};

/// Response of the chat-completion endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatReply {
    /// Assistant text to append to the transcript.
    pub reply: String,
    /// Set once the service judges onboarding complete.
    #[serde(default)]
    pub complete: bool,
    /// Structured profile, present only alongside `complete: true`.
    #[serde(default)]
    pub business_data: Option<BusinessProfile>,
}

/// Backend-agnostic interface to the business REST API.
///
/// All business logic (AI completion, persistence, the WhatsApp code
/// exchange) lives behind these four calls.
#[async_trait]
pub trait BusinessApi: Send + Sync {
    /// POST /business/chat — run one completion over the full transcript.
    async fn chat(&self, messages: &[Turn]) -> Result<ChatReply, ApiError>;

    /// POST /business/create — persist a finalized profile.
    async fn create_business(
        &self,
        profile: &BusinessProfile,
        user_id: &str,
    ) -> Result<Business, ApiError>;

    /// GET /business/list — businesses owned by the user.
    async fn list_businesses(&self, user_id: &str) -> Result<Vec<Business>, ApiError>;

    /// POST /business/{id}/connect-whatsapp — exchange the OAuth code.
    async fn connect_whatsapp(&self, business_id: &str, code: &str) -> Result<(), ApiError>;
}
