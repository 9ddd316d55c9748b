//! Client for the marketplace backend REST API.
//!
//! Only the two endpoints the cart and checkout flow consume are wrapped:
//!
//! - `GET /crafts/{id}/stock` - units still available for a craft
//! - `POST /orders` - submit an order built from the cart
//!
//! Every request carries `Content-Type: application/json` and, when a token
//! is configured, `Authorization: Bearer <token>`.

mod types;

pub use types::{CreatedOrder, StockLevel};

use std::sync::Arc;
use std::time::Duration;

use menen_core::CraftId;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::checkout::{OrderRequest, OrderSubmitter, StockLookup};
use crate::config::ApiConfig;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Errors that can occur when talking to the backend API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the bearer token (or none was sent).
    #[error("Unauthorized, sign in again")]
    Unauthorized,

    /// Non-success status other than 401.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Response body did not match the expected shape.
    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Base URL cannot have path segments appended.
    #[error("Invalid API base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Client for the backend API.
///
/// Cheaply cloneable; clones share one connection pool.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: Option<SecretString>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Create a new API client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the base URL cannot carry a path or the HTTP
    /// client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        if config.base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(config.base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url: config.base_url.clone(),
                token: config.token.clone(),
            }),
        })
    }

    /// Units of a craft still available.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the body is malformed.
    #[instrument(skip(self), fields(craft_id = %id))]
    pub async fn craft_stock(&self, id: &CraftId) -> Result<StockLevel, ApiError> {
        let url = self.endpoint(&["crafts", id.as_str(), "stock"])?;
        let request = self.inner.client.get(url);
        let text = self.send(request).await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Submit an order.
    ///
    /// Returns the created order when the backend echoes one back; `None` if
    /// the order was accepted but the body could not be read.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` if the request fails or the backend refuses it.
    #[instrument(skip(self, order), fields(lines = order.items.len()))]
    pub async fn submit_order(&self, order: &OrderRequest) -> Result<Option<CreatedOrder>, ApiError> {
        let url = self.endpoint(&["orders"])?;
        let request = self.inner.client.post(url).json(order);
        let text = self.send(request).await?;
        Ok(decode_lenient(&text))
    }

    /// Build an endpoint URL from path segments (each percent-encoded).
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.inner.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl(self.inner.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let mut request = request.header("Content-Type", "application/json");
        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %text.chars().take(500).collect::<String>(),
                "Backend API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text.chars().take(200).collect(),
            });
        }

        debug!(status = %status, bytes = text.len(), "Backend API response");
        Ok(text)
    }
}

fn decode_lenient<T: DeserializeOwned>(text: &str) -> Option<T> {
    match serde_json::from_str(text) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable response body from backend");
            None
        }
    }
}

impl StockLookup for ApiClient {
    async fn available(&self, id: &CraftId) -> Result<u32, ApiError> {
        Ok(self.craft_stock(id).await?.available)
    }
}

impl OrderSubmitter for ApiClient {
    async fn submit(&self, order: &OrderRequest) -> Result<Option<CreatedOrder>, ApiError> {
        self.submit_order(order).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client(base: &str) -> ApiClient {
        ApiClient::new(&ApiConfig {
            base_url: Url::parse(base).unwrap(),
            token: None,
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_appends_segments() {
        let api = client("http://localhost:5000/api");
        let url = api.endpoint(&["crafts", "17", "stock"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/crafts/17/stock");
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let api = client("http://localhost:5000/api/");
        let url = api.endpoint(&["orders"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/orders");
    }

    #[test]
    fn test_endpoint_encodes_ids() {
        let api = client("http://localhost:5000/api");
        let url = api.endpoint(&["crafts", "a/b c", "stock"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:5000/api/crafts/a%2Fb%20c/stock");
    }

    #[test]
    fn test_rejects_non_base_url() {
        let config = ApiConfig {
            base_url: Url::parse("mailto:orders@menen.example").unwrap(),
            token: None,
        };
        assert!(matches!(
            ApiClient::new(&config),
            Err(ApiError::InvalidBaseUrl(_))
        ));
    }

    #[test]
    fn test_decode_lenient() {
        let stock: Option<StockLevel> = decode_lenient(r#"{"available": 4}"#);
        assert_eq!(stock, Some(StockLevel { available: 4 }));
        assert!(decode_lenient::<StockLevel>("<html>").is_none());
    }
}
