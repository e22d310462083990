use std::sync::Arc;
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{Html, IntoResponse},
    routing::{get, post},
};
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::AppState;
use crate::client::HttpBackend;
use crate::config::AppConfig;
use crate::controller::ChatController;
use crate::ui::{PageView, render_log, render_page, render_status};
use crate::widget::LogEntry;

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    info!(
        name: "backend.config.loaded",
        base_url = %config.backend.base_url,
        timeout_secs = config.backend.request_timeout_secs,
        "Backend configuration loaded"
    );

    let backend = HttpBackend::new(&config.backend.base_url, config.backend.request_timeout())?;
    let controller = Arc::new(ChatController::with_backend(Arc::new(backend)));
    controller.start_status_polling(config.status.poll_interval());

    let state = AppState {
        controller: Arc::clone(&controller),
        config: Arc::clone(&config),
    };

    // Handlers wait on the backend; give them a little more than its own timeout.
    let timeout_duration = config.backend.request_timeout() + Duration::from_secs(5);

    let app = build_router(state)
        .nest_service("/static", ServeDir::new("static"))
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let duration = timeout_duration;
                async move {
                    match tokio::time::timeout(duration, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                }
            },
        ))
        .layer(TraceLayer::new_for_http());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    controller.dispose();
    info!(name: "server.stopped", "Server stopped");
    Ok(())
}

/// Routes without static assets or middleware.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/ui/chat", post(ui_chat))
        .route("/ui/quick", post(ui_quick))
        .route("/ui/log", get(ui_log))
        .route("/ui/status", get(ui_status))
        .route("/api/log", get(api_log))
        .route("/health", get(health))
        .with_state(state)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// HTML Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// Form body for `POST /ui/chat`.
#[derive(Debug, Deserialize)]
struct ChatForm {
    #[serde(default)]
    message: String,
}

/// Form body for `POST /ui/quick`.
#[derive(Debug, Deserialize)]
struct QuickForm {
    label: String,
}

/// GET / - Full widget page. A page load starts a new conversation.
async fn index_handler(State(state): State<AppState>) -> Html<String> {
    state.controller.log().clear();
    page(&state)
}

/// POST /ui/chat - Send the typed message and return the updated log.
async fn ui_chat(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<ChatForm>,
) -> Html<String> {
    tracing::debug!(length = form.message.len(), "Received chat form");
    let outcome = state.controller.send_message(&form.message).await;
    tracing::debug!(?outcome, "Chat form handled");
    log_or_page(&state, &headers)
}

/// POST /ui/quick - Send a quick action label and return the updated log.
async fn ui_quick(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<QuickForm>,
) -> Html<String> {
    let outcome = state.controller.quick_action(&form.label).await;
    tracing::debug!(label = %form.label, ?outcome, "Quick action handled");
    log_or_page(&state, &headers)
}

/// GET /ui/log - Current log.
async fn ui_log(State(state): State<AppState>) -> Html<String> {
    log_fragment(&state)
}

/// GET /ui/status - Current status panel.
async fn ui_status(State(state): State<AppState>) -> Html<String> {
    let view = state.controller.status().view();
    Html(render_status(&view, state.config.status.poll_interval()).into_string())
}

fn page(state: &AppState) -> Html<String> {
    let entries = state.controller.log().entries();
    let status = state.controller.status().view();
    let widget = &state.config.widget;

    Html(render_page(&PageView {
        title: &widget.title,
        quick_actions: &widget.quick_actions,
        recent_searches: &widget.recent_searches,
        entries: &entries,
        status: &status,
        poll: state.config.status.poll_interval(),
    }))
}

/// htmx swaps in the log fragment; a plain form post gets the whole page back.
fn log_or_page(state: &AppState, headers: &HeaderMap) -> Html<String> {
    if is_hx_request(headers) {
        log_fragment(state)
    } else {
        page(state)
    }
}

fn is_hx_request(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

fn log_fragment(state: &AppState) -> Html<String> {
    Html(render_log(&state.controller.log().entries()).into_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// API Handlers
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/log - Log entries as JSON.
async fn api_log(State(state): State<AppState>) -> Json<Vec<LogEntry>> {
    Json(state.controller.log().entries())
}

/// GET /health - Liveness probe.
async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
