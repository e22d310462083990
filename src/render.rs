//! Response-to-view dispatch.
//!
//! [`ResponseRenderer`] turns one chat response into log entries: one card
//! per record, a text bubble, an error bubble or a raw dump. It appends them
//! to the [`ChatLog`] and scrolls to the end. It never fails; fields a record
//! lacks degrade to [`MISSING_FIELD`](crate::envelope::MISSING_FIELD).

use serde_json::Value;

use crate::envelope::{CardModule, Response, field_text, pretty, text_or};
use crate::widget::{Card, CardBody, ChatLog, LogEntry};

/// Title of every notification card.
pub const NOTIFICATION_TITLE: &str = "Notification";

/// Description shown for a place without one.
pub const NO_DESCRIPTION: &str = "No description";

/// Maps response envelopes onto chat log entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseRenderer;

impl ResponseRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Decode `envelope`, append its entries and scroll the log.
    ///
    /// Returns the number of entries appended.
    pub fn render(&self, log: &ChatLog, envelope: &Value) -> usize {
        self.render_response(log, Response::from_value(envelope))
    }

    /// Append the entries for an already decoded response and scroll the log.
    pub fn render_response(&self, log: &ChatLog, response: Response) -> usize {
        let entries = self.entries_for(response);
        let count = entries.len();
        log.append_all(entries);
        log.scroll_to_end();
        count
    }

    /// The entries a response renders to, in display order.
    #[must_use]
    pub fn entries_for(&self, response: Response) -> Vec<LogEntry> {
        match response {
            Response::Cards { module, records } => records
                .iter()
                .map(|record| LogEntry::card(card_for(&module, record)))
                .collect(),
            Response::Text(text) => vec![LogEntry::text(text)],
            Response::Error(message) => vec![LogEntry::error(message)],
            Response::Unknown(envelope) => vec![LogEntry::dump(pretty(&envelope))],
        }
    }
}

/// Apply the per-module card template to one record.
#[must_use]
pub fn card_for(module: &CardModule, record: &Value) -> Card {
    let body = match module {
        CardModule::Notifications => CardBody::Template {
            title: NOTIFICATION_TITLE.to_string(),
            lines: vec![
                line("Message", field_text(record.get("mensaje"))),
                line("Type", field_text(record.get("tipo"))),
                line("Status", field_text(record.get("estado"))),
            ],
        },
        CardModule::Places => CardBody::Template {
            title: field_text(record.get("name")),
            lines: vec![
                line("Description", text_or(record.get("description"), NO_DESCRIPTION)),
                line("Status", field_text(record.get("status"))),
            ],
        },
        CardModule::Other(_) => CardBody::Dump {
            json: pretty(record),
        },
    };

    Card {
        module: module.tag().to_string(),
        body,
    }
}

fn line(label: &str, value: String) -> (String, String) {
    (label.to_string(), value)
}
