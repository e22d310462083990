//! reqwest-backed [`ChatBackend`].

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::ChatBackend;
use super::error::Result;
use crate::envelope::StatusSnapshot;

/// Request body for `POST /chat`.
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    message: &'a str,
}

/// HTTP client for the chat backend.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use nextstop_widget::client::{ChatBackend, HttpBackend};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let backend = HttpBackend::new("http://127.0.0.1:9001", Duration::from_secs(30))?;
/// let envelope = backend.send_chat("Show me accepted places").await?;
/// println!("{envelope}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: Url,
    http: reqwest::Client,
}

impl HttpBackend {
    /// Create a client with its own connection pool and per-request timeout.
    pub fn new(base_url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Self::with_client(base_url, http)
    }

    /// Create a client around an existing reqwest client.
    pub fn with_client(base_url: impl AsRef<str>, http: reqwest::Client) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        // Relative joins must append to the base path, not replace its last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Ok(Self { base_url, http })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn url(&self, path: &str) -> Url {
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    /// Read the body as JSON regardless of status, the way `fetch` does.
    async fn read_json(response: reqwest::Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(
                status = status.as_u16(),
                url = %response.url(),
                "Backend answered with a non-success status"
            );
        }
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_chat(&self, message: &str) -> Result<Value> {
        let response = self
            .http
            .post(self.url("chat"))
            .json(&ChatRequest { message })
            .send()
            .await?;
        Self::read_json(response).await
    }

    async fn fetch_status(&self) -> Result<StatusSnapshot> {
        let response = self.http.get(self.url("estado")).send().await?;
        let body = Self::read_json(response).await?;
        // `null` has no fields to read and counts as a failure; any other
        // non-object body just lacks them.
        if body.is_object() || body.is_null() {
            Ok(serde_json::from_value(body)?)
        } else {
            tracing::warn!(body = %body, "Status body is not an object");
            Ok(StatusSnapshot::default())
        }
    }
}
