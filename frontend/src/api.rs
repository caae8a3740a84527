//! Thin client for the items API.
//!
//! One request per call: no retries, no timeout. Any non-2xx response turns
//! into [`ApiError::Status`] carrying whatever text the server sent.

use gloo_net::http::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use shared::{
    AttributesEnvelope, ErrorBody, HealthResponse, Item, ItemEnvelope, ItemPayload, ItemsEnvelope,
};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Non-2xx response.
    #[error("{0}")]
    Status(String),

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("Update response did not include attributes.")]
    MissingAttributes,
}

impl ApiError {
    /// Text to show the user. Failures that carry no server text use `fallback`.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            Self::Status(message) if !message.is_empty() => message.clone(),
            Self::MissingAttributes => self.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Configured at build time; empty means same origin.
pub fn api_base() -> &'static str {
    option_env!("API_BASE").unwrap_or("").trim_end_matches('/')
}

async fn send(method: Method, path: &str, body: Option<&ItemPayload>) -> Result<Response, ApiError> {
    let builder = RequestBuilder::new(&format!("{}{}", api_base(), path))
        .method(method)
        .header("Content-Type", "application/json");
    let request = match body {
        Some(body) => builder.json(body),
        None => builder.build(),
    }
    .map_err(|e| ApiError::Network(e.to_string()))?;

    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        let text = response.text().await.unwrap_or_default();
        return Err(ApiError::Status(failure_message(
            &text,
            &response.status_text(),
        )));
    }
    Ok(response)
}

/// Send and decode. `None` for 204 responses, which have no body.
async fn request<T: DeserializeOwned>(
    method: Method,
    path: &str,
    body: Option<&ItemPayload>,
) -> Result<Option<T>, ApiError> {
    let response = send(method, path, body).await?;
    if response.status() == 204 {
        return Ok(None);
    }
    response
        .json::<T>()
        .await
        .map(Some)
        .map_err(|e| ApiError::Decode(e.to_string()))
}

fn failure_message(body: &str, status_text: &str) -> String {
    if let Ok(ErrorBody { message }) = serde_json::from_str::<ErrorBody>(body) {
        if !message.is_empty() {
            return message;
        }
    }
    [body.trim(), status_text.trim()]
        .into_iter()
        .find(|s| !s.is_empty())
        .unwrap_or("Request failed")
        .to_string()
}

fn missing_body() -> ApiError {
    ApiError::Decode("empty response body".to_string())
}

pub async fn check_health() -> Result<HealthResponse, ApiError> {
    request::<HealthResponse>(Method::GET, "/health", None)
        .await?
        .ok_or_else(missing_body)
}

pub async fn list_items() -> Result<Vec<Item>, ApiError> {
    Ok(request::<ItemsEnvelope>(Method::GET, "/items", None)
        .await?
        .unwrap_or_default()
        .items)
}

pub async fn create_item(payload: &ItemPayload) -> Result<Item, ApiError> {
    request::<ItemEnvelope>(Method::POST, "/items", Some(payload))
        .await?
        .map(|envelope| envelope.item)
        .ok_or_else(missing_body)
}

pub async fn update_item(id: &str, payload: &ItemPayload) -> Result<Item, ApiError> {
    request::<AttributesEnvelope>(Method::PUT, &format!("/items/{}", id), Some(payload))
        .await?
        .and_then(|envelope| envelope.attributes)
        .ok_or(ApiError::MissingAttributes)
}

pub async fn delete_item(id: &str) -> Result<(), ApiError> {
    request::<serde_json::Value>(Method::DELETE, &format!("/items/{}", id), None).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_message_prefers_server_message() {
        assert_eq!(
            failure_message(r#"{"message":"Item not found."}"#, "Not Found"),
            "Item not found."
        );
    }

    #[test]
    fn failure_message_falls_back_to_raw_text_then_status() {
        assert_eq!(failure_message("upstream timeout", "Bad Gateway"), "upstream timeout");
        assert_eq!(failure_message("", "Bad Gateway"), "Bad Gateway");
        assert_eq!(failure_message("", ""), "Request failed");
    }

    #[test]
    fn message_or_uses_fallback_for_transport_failures() {
        let fallback = "Unable to load items. Check your API base URL.";
        assert_eq!(
            ApiError::Status("Item not found.".to_string()).message_or(fallback),
            "Item not found."
        );
        assert_eq!(
            ApiError::Network("fetch failed".to_string()).message_or(fallback),
            fallback
        );
        assert_eq!(
            ApiError::MissingAttributes.message_or(fallback),
            "Update response did not include attributes."
        );
    }
}
