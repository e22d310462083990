//! Route tests over the widget router with an in-memory backend.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::http::{HeaderName, HeaderValue};
use axum_test::{TestRequest, TestServer};
use nextstop_widget::AppState;
use nextstop_widget::client::{ChatBackend, ClientError, Result};
use nextstop_widget::config::AppConfig;
use nextstop_widget::controller::ChatController;
use nextstop_widget::envelope::StatusSnapshot;
use nextstop_widget::server::build_router;
use serde_json::{Value, json};

/// Answers every chat message with a text envelope echoing it; status
/// succeeds or fails depending on `status_up`.
#[derive(Debug)]
struct EchoBackend {
    sent: Mutex<Vec<String>>,
    status_up: bool,
}

#[async_trait]
impl ChatBackend for EchoBackend {
    async fn send_chat(&self, message: &str) -> Result<Value> {
        self.sent.lock().unwrap().push(message.to_string());
        if message == "notificaciones" {
            return Ok(json!({
                "type": "cards",
                "modulo": "notificaciones",
                "data": [{ "mensaje": "<script>x</script>", "tipo": "general", "estado": "nueva" }]
            }));
        }
        Ok(json!({ "type": "text", "data": format!("eco: {message}") }))
    }

    async fn fetch_status(&self) -> Result<StatusSnapshot> {
        if self.status_up {
            Ok(serde_json::from_value(json!({ "acceso": "Total" })).unwrap())
        } else {
            Err(ClientError::Parse(
                serde_json::from_str::<Value>("<html>").unwrap_err(),
            ))
        }
    }
}

/// Mark a request the way htmx does.
fn hx(request: TestRequest) -> TestRequest {
    request.add_header(
        HeaderName::from_static("hx-request"),
        HeaderValue::from_static("true"),
    )
}

fn setup(status_up: bool) -> (TestServer, Arc<EchoBackend>, Arc<ChatController>) {
    let backend = Arc::new(EchoBackend {
        sent: Mutex::new(Vec::new()),
        status_up,
    });
    let controller = Arc::new(ChatController::with_backend(
        Arc::clone(&backend) as Arc<dyn ChatBackend>
    ));
    let config = AppConfig::load_from_args(["nextstop-widget"]).expect("defaults should load");
    let state = AppState {
        controller: Arc::clone(&controller),
        config: Arc::new(config),
    };
    let server = TestServer::new(build_router(state)).expect("test server");
    (server, backend, controller)
}

#[tokio::test]
async fn test_index_renders_widget() {
    let (server, _, _) = setup(true);

    let response = server.get("/").await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.contains("id=\"chat-log\""));
    assert!(html.contains("id=\"chat-form\""));
    assert!(html.contains("id=\"status-panel\""));
    assert!(html.contains("Show me accepted places"));
}

#[tokio::test]
async fn test_chat_form_returns_updated_log() {
    let (server, backend, controller) = setup(true);

    let response = hx(server.post("/ui/chat"))
        .form(&[("message", "  hola  ")])
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(!html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("mensaje usuario"));
    assert!(html.contains("eco: hola"));
    assert_eq!(*backend.sent.lock().unwrap(), ["hola"]);
    assert_eq!(controller.log().len(), 2);
}

#[tokio::test]
async fn test_plain_form_post_returns_whole_page() {
    let (server, backend, _) = setup(true);

    let response = server
        .post("/ui/quick")
        .form(&[("label", "List my notifications")])
        .await;
    response.assert_status_ok();

    let html = response.text();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("id=\"status-panel\""));
    assert!(html.contains("eco: List my notifications"));
    assert_eq!(*backend.sent.lock().unwrap(), ["List my notifications"]);
}

#[tokio::test]
async fn test_chat_form_does_not_read_input_field() {
    let (server, backend, controller) = setup(true);
    controller.input().set_value("draft");

    hx(server.post("/ui/chat"))
        .form(&[("message", "hola")])
        .await
        .assert_status_ok();

    assert_eq!(*backend.sent.lock().unwrap(), ["hola"]);
}

#[tokio::test]
async fn test_page_load_starts_new_conversation() {
    let (server, _, controller) = setup(true);
    controller.send_message("hola").await;
    assert_eq!(controller.log().len(), 2);

    let html = server.get("/").await.text();
    assert!(!html.contains("eco: hola"));
    assert!(controller.log().is_empty());

    let entries: Vec<Value> = server.get("/api/log").await.json();
    assert!(entries.is_empty());
}

#[tokio::test]
async fn test_blank_chat_form_sends_nothing() {
    let (server, backend, controller) = setup(true);

    server
        .post("/ui/chat")
        .form(&[("message", "   ")])
        .await
        .assert_status_ok();

    assert!(backend.sent.lock().unwrap().is_empty());
    assert!(controller.log().is_empty());
}

#[tokio::test]
async fn test_card_fields_are_escaped() {
    let (server, _, _) = setup(true);

    let html = hx(server.post("/ui/quick"))
        .form(&[("label", "notificaciones")])
        .await
        .text();

    assert!(html.contains("card-notificaciones"));
    assert!(html.contains("&lt;script&gt;x&lt;/script&gt;"));
    assert!(!html.contains("<script>x</script>"));
}

#[tokio::test]
async fn test_quick_action_sends_label() {
    let (server, backend, _) = setup(true);

    let response = hx(server.post("/ui/quick"))
        .form(&[("label", "List my notifications")])
        .await;
    response.assert_status_ok();

    assert!(response.text().contains("eco: List my notifications"));
    assert_eq!(*backend.sent.lock().unwrap(), ["List my notifications"]);
}

#[tokio::test]
async fn test_status_fragment_reflects_last_refresh() {
    let (server, _, controller) = setup(true);

    let pending = server.get("/ui/status").await.text();
    assert!(pending.contains("hx-get=\"/ui/status\""));

    controller.refresh_status().await;
    let html = server.get("/ui/status").await.text();
    assert!(html.contains("Total"));
    assert!(html.contains("Accepted"));
    assert!(html.contains("Available"));
}

#[tokio::test]
async fn test_status_fragment_when_unreachable() {
    let (server, _, controller) = setup(false);

    controller.refresh_status().await;
    let html = server.get("/ui/status").await.text();
    assert!(html.contains("Could not connect to the server"));
}

#[tokio::test]
async fn test_api_log_lists_entries() {
    let (server, _, controller) = setup(true);
    controller.send_message("hola").await;

    let entries: Vec<Value> = server.get("/api/log").await.json();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["kind"]["kind"], "user");
    assert_eq!(entries[0]["kind"]["text"], "hola");
    assert_eq!(entries[1]["kind"]["text"], "eco: hola");
}

#[tokio::test]
async fn test_ui_log_fragment() {
    let (server, _, controller) = setup(true);
    controller.send_message("hola").await;

    let html = server.get("/ui/log").await.text();
    assert!(html.contains("eco: hola"));
}

#[tokio::test]
async fn test_health() {
    let (server, _, _) = setup(true);

    let body: Value = server.get("/health").await.json();
    assert_eq!(body, json!({ "status": "ok" }));
}
