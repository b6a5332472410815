//! Authenticated session identity, passed into the controller explicitly.

use serde::{Deserialize, Serialize};

/// The signed-in user, as established by the identity provider.
///
/// The controller never reaches into ambient global state for identity; an
/// `AuthSession` is injected at construction time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Stable user identifier from the identity provider.
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_with_optional_email() {
        let session = AuthSession::new("user-1");
        assert_eq!(session.user_id, "user-1");
        assert!(session.email.is_none());

        let session = AuthSession::new("user-2").with_email("owner@example.com");
        assert_eq!(session.email.as_deref(), Some("owner@example.com"));
    }

    #[test]
    fn email_skipped_when_absent() {
        let json = serde_json::to_string(&AuthSession::new("u")).unwrap();
        assert!(!json.contains("email"));
    }
}
