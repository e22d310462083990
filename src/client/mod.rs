//! Chat backend client.
//!
//! The backend exposes two endpoints:
//!
//! - `POST /chat` with `{"message": "..."}`, answering with a response envelope
//! - `GET /estado`, answering with a [`StatusSnapshot`]
//!
//! [`ChatBackend`] is the seam the controller talks to; [`HttpBackend`] is the
//! reqwest implementation used in production.

pub mod error;
mod http;

pub use error::{ClientError, Result};
pub use http::HttpBackend;

use async_trait::async_trait;
use serde_json::Value;

use crate::envelope::StatusSnapshot;

/// Operations the widget needs from the chat backend.
#[async_trait]
pub trait ChatBackend: Send + Sync + std::fmt::Debug {
    /// Post a message and return the raw response envelope.
    async fn send_chat(&self, message: &str) -> Result<Value>;

    /// Fetch the status snapshot.
    async fn fetch_status(&self) -> Result<StatusSnapshot>;
}
