//! Chat log fragment.

use maud::{Markup, html};

use crate::widget::{Card, CardBody, EntryKind, LogEntry};

/// Element id of the chat log; htmx swaps target it.
pub const LOG_ID: &str = "chat-log";

/// The whole chat log.
pub fn render_log(entries: &[LogEntry]) -> Markup {
    html! {
        div id=(LOG_ID) class="chat-box" aria-live="polite" aria-label="Chat messages" {
            @for entry in entries {
                (render_entry(entry))
            }
        }
    }
}

/// A single entry.
pub fn render_entry(entry: &LogEntry) -> Markup {
    let id = format!("entry-{}", entry.id);
    match &entry.kind {
        EntryKind::User { text } => html! {
            div id=(id) class="mensaje usuario" { (text) }
        },
        EntryKind::Text { text } => html! {
            div id=(id) class="mensaje agente" { (text) }
        },
        EntryKind::Error { message } => html! {
            div id=(id) class="mensaje agente error" role="alert" { "Error: " (message) }
        },
        EntryKind::Dump { json } => html! {
            div id=(id) class="mensaje agente" { pre { (json) } }
        },
        EntryKind::Card(card) => render_card(&id, card),
    }
}

fn render_card(id: &str, card: &Card) -> Markup {
    let class = format!("mensaje agente card-respuesta card-{}", card.module);
    html! {
        div id=(id) class=(class) {
            @match &card.body {
                CardBody::Template { title, lines } => {
                    h3 { (title) }
                    @for (label, value) in lines {
                        p { b { (label) ":" } " " (value) }
                    }
                }
                CardBody::Dump { json } => {
                    pre { (json) }
                }
            }
        }
    }
}
