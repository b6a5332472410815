//! PostgREST-backed chat store (`chat_sessions` table).

use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;

use crate::config::ChatStoreConfig;
use crate::error::StoreError;
use crate::session::model::Turn;

use super::{ChatStore, SavedChat};

/// Chat store speaking the PostgREST dialect (Supabase).
///
/// One row per user in `chat_sessions`, upserted on `user_id`:
/// `user_id, messages (json), business_id, updated_at`.
pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ChatRow {
    messages: Vec<Turn>,
    #[serde(default)]
    business_id: Option<String>,
    updated_at: chrono::DateTime<Utc>,
}

impl SupabaseStore {
    pub fn new(config: &ChatStoreConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/chat_sessions", self.base_url)
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(StoreError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ChatStore for SupabaseStore {
    async fn save(
        &self,
        user_id: &str,
        messages: &[Turn],
        business_id: Option<&str>,
    ) -> Result<(), StoreError> {
        let row = serde_json::json!({
            "user_id": user_id,
            "messages": messages,
            "business_id": business_id,
            "updated_at": Utc::now(),
        });

        let response = self
            .authed(
                self.client
                    .post(self.table_url())
                    .query(&[("on_conflict", "user_id")])
                    .header("Prefer", "resolution=merge-duplicates"),
            )
            .json(&row)
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        Self::check(response).await?;
        Ok(())
    }

    async fn load(&self, user_id: &str) -> Result<Option<SavedChat>, StoreError> {
        let response = self
            .authed(self.client.get(self.table_url()).query(&[
                ("user_id", format!("eq.{user_id}").as_str()),
                ("select", "messages,business_id,updated_at"),
                ("order", "updated_at.desc"),
                ("limit", "1"),
            ]))
            .send()
            .await
            .map_err(|e| StoreError::RequestFailed(e.to_string()))?;
        let response = Self::check(response).await?;

        let mut rows: Vec<ChatRow> = response
            .json()
            .await
            .map_err(|e| StoreError::Malformed(e.to_string()))?;

        Ok(rows.drain(..).next().map(|row| SavedChat {
            messages: row.messages,
            business_id: row.business_id,
            updated_at: row.updated_at,
        }))
    }
}
