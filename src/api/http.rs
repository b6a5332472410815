//! reqwest-backed implementation of [`BusinessApi`].

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::ApiError;
use crate::session::model::{Business, BusinessProfile, Turn};

use super::{BusinessApi, ChatReply};

/// HTTP client for the backend REST API.
pub struct HttpBusinessApi {
    base_url: String,
    client: reqwest::Client,
}

/// Error body shape the backend uses for all failures.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug, Deserialize)]
struct CreateBusinessResponse {
    business: Business,
}

#[derive(Debug, Deserialize)]
struct ListBusinessesResponse {
    businesses: Vec<Business>,
}

impl HttpBusinessApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a non-success response to `ApiError::Status`, pulling the message
    /// out of the backend's `{"error": ...}` body when present.
    async fn check(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<reqwest::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = match response.json::<ErrorBody>().await {
            Ok(body) => body.error,
            Err(_) => "Request failed".to_string(),
        };
        Err(ApiError::Status {
            endpoint: endpoint.to_string(),
            status: status.as_u16(),
            message,
        })
    }

    async fn post_json<B: serde::Serialize>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<reqwest::Response, ApiError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        Self::check(endpoint, response).await
    }
}

#[async_trait]
impl BusinessApi for HttpBusinessApi {
    async fn chat(&self, messages: &[Turn]) -> Result<ChatReply, ApiError> {
        let endpoint = "/business/chat";
        let body = serde_json::json!({ "messages": messages });
        let response = self.post_json(endpoint, &body).await?;
        response
            .json::<ChatReply>()
            .await
            .map_err(|e| ApiError::InvalidResponse {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })
    }

    async fn create_business(
        &self,
        profile: &BusinessProfile,
        user_id: &str,
    ) -> Result<Business, ApiError> {
        let endpoint = "/business/create";
        // Profile fields flattened into the request body, plus the owner.
        let mut body = serde_json::to_value(profile)?;
        body["user_id"] = serde_json::Value::String(user_id.to_string());

        let response = self.post_json(endpoint, &body).await?;
        let parsed: CreateBusinessResponse =
            response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                })?;
        Ok(parsed.business)
    }

    async fn list_businesses(&self, user_id: &str) -> Result<Vec<Business>, ApiError> {
        let endpoint = "/business/list";
        let response = self
            .client
            .get(self.url(endpoint))
            .query(&[("user_id", user_id)])
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                reason: e.to_string(),
            })?;
        let response = Self::check(endpoint, response).await?;
        let parsed: ListBusinessesResponse =
            response
                .json()
                .await
                .map_err(|e| ApiError::InvalidResponse {
                    endpoint: endpoint.to_string(),
                    reason: e.to_string(),
                })?;
        Ok(parsed.businesses)
    }

    async fn connect_whatsapp(&self, business_id: &str, code: &str) -> Result<(), ApiError> {
        let endpoint = format!("/business/{business_id}/connect-whatsapp");
        let body = serde_json::json!({ "code": code });
        self.post_json(&endpoint, &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_normalized() {
        let api = HttpBusinessApi::new("http://localhost:5000/api/");
        assert_eq!(
            api.url("/business/chat"),
            "http://localhost:5000/api/business/chat"
        );
    }

    #[test]
    fn create_body_carries_profile_and_owner() {
        let profile = BusinessProfile {
            business_name: "Joe's Bakery".to_string(),
            business_type: "bakery".to_string(),
            location: "Jaipur".to_string(),
            description: "Fresh bread".to_string(),
            languages: vec!["English".to_string()],
            ..Default::default()
        };
        let mut body = serde_json::to_value(&profile).unwrap();
        body["user_id"] = serde_json::Value::String("u1".to_string());
        assert_eq!(body["business_name"], "Joe's Bakery");
        assert_eq!(body["user_id"], "u1");
    }
}
