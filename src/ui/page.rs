//! Full page shell.

use std::time::Duration;

use maud::{DOCTYPE, Markup, PreEscaped, html};

use super::chat::{LOG_ID, render_log};
use super::status::render_status;
use crate::widget::{LogEntry, StatusView};

/// Local htmx bundle (no CDN).
pub const HTMX_ASSET_PATH: &str = "/static/vendor/htmx-2.0.8.min.js";

/// Keeps the log pinned to its newest entry and resets the form after a send.
const WIDGET_SCRIPT: &str = r"
document.body.addEventListener('htmx:afterSwap', function (evt) {
    var log = document.getElementById('chat-log');
    if (log) { log.scrollTop = log.scrollHeight; }
});
document.body.addEventListener('htmx:afterRequest', function (evt) {
    if (evt.detail.elt && evt.detail.elt.id === 'chat-form') { evt.detail.elt.reset(); }
});
";

/// Everything the page needs to render.
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    pub title: &'a str,
    pub quick_actions: &'a [String],
    pub recent_searches: &'a [String],
    pub entries: &'a [LogEntry],
    pub status: &'a StatusView,
    pub poll: Duration,
}

pub fn render_page(page: &PageView<'_>) -> String {
    let markup = html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                meta name="description" content="Next Stop user assistant";
                title { (page.title) }
                script src=(HTMX_ASSET_PATH) defer {}
                link rel="stylesheet" href="/static/widget.css";
            }
            body {
                div id="app-shell" class="layout" {
                    aside class="sidebar" {
                        h2 { "Status" }
                        (render_status(page.status, page.poll))
                        (button_group("recent-searches", "Recent searches", page.recent_searches))
                    }
                    main class="chat-shell" {
                        header class="chat-header" { h1 { (page.title) } }
                        (render_log(page.entries))
                        (button_group("quick-actions", "Quick actions", page.quick_actions))
                        (chat_form())
                    }
                }
                script { (PreEscaped(WIDGET_SCRIPT)) }
            }
        }
    };

    markup.into_string()
}

fn chat_form() -> Markup {
    html! {
        form id="chat-form" class="input-bar" method="post" action="/ui/chat"
            hx-post="/ui/chat"
            hx-target={"#" (LOG_ID)}
            hx-swap="outerHTML" {
            input id="mensaje" type="text" name="message" autocomplete="off"
                placeholder="Type your message..." required;
            button id="enviar" type="submit" { "Send" }
        }
    }
}

/// Buttons whose label becomes the sent message. Each is its own form so it
/// also posts without htmx.
fn button_group(class: &str, heading: &str, labels: &[String]) -> Markup {
    html! {
        @if !labels.is_empty() {
            section class=(class) {
                h3 { (heading) }
                @for label in labels {
                    form class="quick-form" method="post" action="/ui/quick"
                        hx-post="/ui/quick"
                        hx-target={"#" (LOG_ID)}
                        hx-swap="outerHTML" {
                        input type="hidden" name="label" value=(label);
                        button type="submit" class="quick-btn" { (label) }
                    }
                }
            }
        }
    }
}
