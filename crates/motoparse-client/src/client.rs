//! HTTP client for the remote parsing service.
//!
//! Two endpoints, both `POST` with a JSON body:
//! - `parse_url` `{ "url": ... }` answers with a [`ParseResult`];
//! - `download_archive` `{ "products_data": [...] }` answers with raw bytes.
//!
//! Non-2xx answers carry `{ "error": "..." }` and surface as
//! [`ClientError::Remote`]. Nothing is retried here.

use std::time::Duration;

use motoparse_core::{AppConfig, ParseResult, Product};
use reqwest::{Client, Response, Url};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

#[derive(Serialize)]
struct ParseRequest<'a> {
    url: &'a str,
}

#[derive(Serialize)]
struct ArchiveRequest<'a> {
    products_data: &'a [Product],
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Client for the remote parsing service.
///
/// Use [`ParseClient::from_config`] in the application or
/// [`ParseClient::new`] to point at a mock server in tests.
#[derive(Debug, Clone)]
pub struct ParseClient {
    client: Client,
    base_url: Url,
}

impl ParseClient {
    /// Creates a client for the service at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if
    /// `base_url` is not an absolute URL.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so joining an endpoint appends to the
        // base path instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Creates a client from the application configuration, resolving a
    /// relative API URL against the configured origin.
    ///
    /// # Errors
    ///
    /// See [`ParseClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        Self::new(
            &config.api_base_url(),
            config.request_timeout_secs,
            &config.user_agent,
        )
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Asks the service to parse the page at `url`.
    ///
    /// `url` is sent as given; callers normalize it first.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Remote`] on a non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    /// - [`ClientError::Deserialize`] if a 2xx body is not a parse result.
    pub async fn parse_url(&self, url: &str) -> Result<ParseResult, ClientError> {
        let endpoint = self.endpoint("parse_url")?;
        tracing::debug!(%endpoint, url, "sending parse request");

        let response = self
            .client
            .post(endpoint)
            .json(&ParseRequest { url })
            .send()
            .await?;
        let response = Self::check_status(response).await?;

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| ClientError::Deserialize {
            context: format!("parse_url({url})"),
            source,
        })
    }

    /// Downloads the image archive the service builds for `products`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::EmptyArchive`] if `products` is empty (no request is sent).
    /// - [`ClientError::Remote`] on a non-2xx status.
    /// - [`ClientError::Http`] on network failure.
    pub async fn download_archive(&self, products: &[Product]) -> Result<Vec<u8>, ClientError> {
        if products.is_empty() {
            return Err(ClientError::EmptyArchive);
        }
        let endpoint = self.endpoint("download_archive")?;
        tracing::info!(%endpoint, products = products.len(), "requesting archive");

        let response = self
            .client
            .post(endpoint)
            .json(&ArchiveRequest {
                products_data: products,
            })
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    fn endpoint(&self, name: &str) -> Result<Url, ClientError> {
        self.base_url
            .join(name)
            .map_err(|e| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    /// Passes 2xx responses through and turns anything else into
    /// [`ClientError::Remote`], keeping the body's `error` message if present.
    async fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = extract_error_message(&body);
        tracing::warn!(status = status.as_u16(), message = ?message, "parser returned an error");
        Err(ClientError::Remote {
            status: status.as_u16(),
            message,
        })
    }
}

/// Reads `{ "error": "..." }` from an error body. Empty messages count as
/// absent.
fn extract_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
}
