//! Next Stop chat widget
//!
//! A server-rendered chat widget for the Next Stop user assistant. It sends
//! the user's messages to a remote chat backend, renders the structured
//! replies as text, error banners or cards (notifications, places), and keeps
//! a status panel fresh by polling the backend.
//!
//! # Architecture
//!
//! - **Server**: Axum serving the page and htmx fragments
//! - **Controller**: injected surfaces, per-request cancellation, status poller
//! - **Client**: `ChatBackend` seam with a reqwest implementation
//! - **UI**: maud markup, escaped by construction
//!
//! # Modules
//!
//! - [`envelope`]: typed decoding of the backend's response envelope
//! - [`render`]: response-to-entries dispatch and card templates
//! - [`widget`]: chat log, input field and status panel surfaces
//! - [`client`]: backend client and errors
//! - [`controller`]: the UI controller

// Allow pedantic clippy warnings that don't add value for this codebase
#![allow(clippy::missing_fields_in_debug)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::cargo_common_metadata)]
#![allow(clippy::multiple_crate_versions)]
#![allow(clippy::unused_async)]

pub mod client;
pub mod config;
pub mod controller;
pub mod envelope;
pub mod render;
pub mod server;
pub mod ui;
pub mod widget;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::controller::ChatController;

/// Application state shared across all handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The single widget controller (one session per server).
    pub controller: Arc<ChatController>,
    /// Global Configuration
    pub config: Arc<AppConfig>,
}
