//! UI controller.
//!
//! [`ChatController`] is built once with every dependency injected: the
//! backend, the three widget surfaces and the renderer. It owns a root
//! [`CancellationToken`]; every request races against a token derived from
//! it, and the status poller's task handle is held so [`dispose`] can stop
//! it.
//!
//! [`dispose`]: ChatController::dispose

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{ChatBackend, ClientError};
use crate::envelope::Response;
use crate::render::ResponseRenderer;
use crate::widget::{ChatLog, InputField, LogEntry, StatusPanel, StatusView};

/// What a send did to the log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// Blank message; nothing rendered, nothing sent.
    Ignored,
    /// The backend answered; `entries` response entries were appended.
    Rendered { entries: usize },
    /// The request failed; a single error entry was appended.
    Failed,
    /// The request was cancelled; only the user bubble was appended.
    Cancelled,
}

#[derive(Debug)]
struct Poller {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Chat widget controller.
#[derive(Debug)]
pub struct ChatController {
    backend: Arc<dyn ChatBackend>,
    log: ChatLog,
    input: InputField,
    status: StatusPanel,
    renderer: ResponseRenderer,
    shutdown: CancellationToken,
    poller: Mutex<Option<Poller>>,
}

impl ChatController {
    #[must_use]
    pub fn new(
        backend: Arc<dyn ChatBackend>,
        log: ChatLog,
        input: InputField,
        status: StatusPanel,
        renderer: ResponseRenderer,
    ) -> Self {
        Self {
            backend,
            log,
            input,
            status,
            renderer,
            shutdown: CancellationToken::new(),
            poller: Mutex::new(None),
        }
    }

    /// Controller with fresh surfaces and the default renderer.
    #[must_use]
    pub fn with_backend(backend: Arc<dyn ChatBackend>) -> Self {
        Self::new(
            backend,
            ChatLog::new(),
            InputField::new(),
            StatusPanel::new(),
            ResponseRenderer::new(),
        )
    }

    pub fn log(&self) -> &ChatLog {
        &self.log
    }

    pub fn input(&self) -> &InputField {
        &self.input
    }

    pub fn status(&self) -> &StatusPanel {
        &self.status
    }

    /// A fresh token that fires when the controller is disposed.
    #[must_use]
    pub fn request_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }

    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.shutdown.is_cancelled()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Chat
    // ─────────────────────────────────────────────────────────────────────

    /// Send `text`, cancellable only through [`dispose`](Self::dispose).
    pub async fn send_message(&self, text: &str) -> SendOutcome {
        self.send_message_with_token(text, self.request_token())
            .await
    }

    /// Send `text`; the request is abandoned if `token` fires first.
    ///
    /// The user bubble is appended and the input cleared before the request
    /// is issued. Failures render as one error entry and are not returned.
    pub async fn send_message_with_token(
        &self,
        text: &str,
        token: CancellationToken,
    ) -> SendOutcome {
        let message = text.trim();
        if message.is_empty() || self.is_disposed() {
            return SendOutcome::Ignored;
        }

        self.log.append(LogEntry::user(message));
        self.input.clear();
        self.log.scroll_to_end();

        info!(name: "chat.message.sent", length = message.len(), "Chat message sent");

        let result = tokio::select! {
            biased;
            () = token.cancelled() => Err(ClientError::Cancelled),
            () = self.shutdown.cancelled() => Err(ClientError::Cancelled),
            res = self.backend.send_chat(message) => res,
        };

        match result {
            Ok(envelope) => {
                let entries = self.renderer.render(&self.log, &envelope);
                info!(name: "chat.response.rendered", entries, "Chat response rendered");
                SendOutcome::Rendered { entries }
            }
            Err(ClientError::Cancelled) => {
                debug!(name: "chat.request.cancelled", "Chat request cancelled");
                SendOutcome::Cancelled
            }
            Err(e) => {
                warn!(name: "chat.request.failed", error = %e, "Chat request failed");
                self.renderer
                    .render(&self.log, &Response::connection_failed());
                SendOutcome::Failed
            }
        }
    }

    /// Send whatever the input field holds (send button / Enter key).
    pub async fn submit(&self) -> SendOutcome {
        let text = self.input.value();
        self.send_message(&text).await
    }

    /// Send a one-click button's `label`.
    ///
    /// The label is sent as is; the input field is only cleared.
    pub async fn quick_action(&self, label: &str) -> SendOutcome {
        self.send_message(label).await
    }

    // ─────────────────────────────────────────────────────────────────────
    // Status
    // ─────────────────────────────────────────────────────────────────────

    /// Fetch the status snapshot and show it (or the unreachable notice).
    ///
    /// Returns `None` when the controller was disposed mid-request; the panel
    /// is then left as it was.
    pub async fn refresh_status(&self) -> Option<StatusView> {
        refresh_panel(&*self.backend, &self.status, &self.request_token()).await
    }

    /// Refresh now and then every `period`, replacing any running poller.
    pub fn start_status_polling(&self, period: Duration) {
        if self.is_disposed() {
            return;
        }

        let backend = Arc::clone(&self.backend);
        let panel = self.status.clone();
        let token = self.request_token();
        let task_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    () = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        refresh_panel(&*backend, &panel, &task_token).await;
                    }
                }
            }
            info!(name: "status.poller.stopped", "Status poller stopped");
        });

        info!(
            name: "status.poller.started",
            period_secs = period.as_secs(),
            "Status poller started"
        );

        let previous = self
            .poller
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .replace(Poller { token, handle });
        if let Some(previous) = previous {
            previous.token.cancel();
            previous.handle.abort();
        }
    }

    /// Whether a status poller is running.
    #[must_use]
    pub fn is_polling(&self) -> bool {
        self.poller
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    // ─────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────

    /// Abort in-flight requests and stop the poller. Idempotent.
    pub fn dispose(&self) {
        self.shutdown.cancel();
        let poller = self
            .poller
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();
        if let Some(poller) = poller {
            poller.token.cancel();
            poller.handle.abort();
        }
    }
}

impl Drop for ChatController {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn refresh_panel(
    backend: &dyn ChatBackend,
    panel: &StatusPanel,
    token: &CancellationToken,
) -> Option<StatusView> {
    let result = tokio::select! {
        biased;
        () = token.cancelled() => return None,
        res = backend.fetch_status() => res,
    };

    let view = match result {
        Ok(snapshot) => {
            debug!(name: "status.refreshed", "Status refreshed");
            StatusView::from_snapshot(&snapshot)
        }
        Err(e) => {
            warn!(name: "status.unreachable", error = %e, "Status endpoint unreachable");
            StatusView::unreachable()
        }
    };
    panel.show(view.clone());
    Some(view)
}
