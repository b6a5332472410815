//! External chat-transcript store.
//!
//! Persistence is a convenience: the controller saves after every successful
//! mutation and restores once on startup, but every failure here is logged
//! and swallowed.

mod supabase;

pub use supabase::SupabaseStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::session::model::Turn;

/// A previously persisted onboarding chat.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedChat {
    pub messages: Vec<Turn>,
    #[serde(default)]
    pub business_id: Option<String>,
    pub updated_at: DateTime<Utc>,
}

/// Backend-agnostic transcript persistence.
#[async_trait]
pub trait ChatStore: Send + Sync {
    /// Upsert the user's active chat, optionally tagged with a business id.
    async fn save(
        &self,
        user_id: &str,
        messages: &[Turn],
        business_id: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Load the user's most recent chat, if any.
    async fn load(&self, user_id: &str) -> Result<Option<SavedChat>, StoreError>;
}

/// No-op store used when persistence is not configured.
pub struct NullStore;

#[async_trait]
impl ChatStore for NullStore {
    async fn save(
        &self,
        _user_id: &str,
        _messages: &[Turn],
        _business_id: Option<&str>,
    ) -> Result<(), StoreError> {
        Ok(())
    }

    async fn load(&self, _user_id: &str) -> Result<Option<SavedChat>, StoreError> {
        Ok(None)
    }
}
