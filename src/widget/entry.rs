//! Rendered chat log entries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// One visual unit in the chat log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    /// Stable identifier, used as the element id.
    pub id: String,
    /// When the entry was appended.
    pub created_at: DateTime<Utc>,
    /// What the entry shows.
    pub kind: EntryKind,
}

/// The entry variants the log can hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryKind {
    /// The user's own message.
    User { text: String },
    /// Assistant plain text.
    Text { text: String },
    /// A card summarizing one record.
    Card(Card),
    /// Error bubble.
    Error { message: String },
    /// Raw dump of an envelope no rule recognized.
    Dump { json: String },
}

/// A single card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    /// Module tag; the card carries class `card-<module>`.
    pub module: String,
    pub body: CardBody,
}

/// Card layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "layout", rename_all = "snake_case")]
pub enum CardBody {
    /// Fixed title plus labeled lines.
    Template {
        title: String,
        lines: Vec<(String, String)>,
    },
    /// Pretty-printed record for modules without a template.
    Dump { json: String },
}

impl LogEntry {
    fn new(kind: EntryKind) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            kind,
        }
    }

    #[must_use]
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(EntryKind::User { text: text.into() })
    }

    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(EntryKind::Text { text: text.into() })
    }

    #[must_use]
    pub fn card(card: Card) -> Self {
        Self::new(EntryKind::Card(card))
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(EntryKind::Error {
            message: message.into(),
        })
    }

    #[must_use]
    pub fn dump(json: impl Into<String>) -> Self {
        Self::new(EntryKind::Dump { json: json.into() })
    }

    /// Whether this entry renders with the error style.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self.kind, EntryKind::Error { .. })
    }

    /// Whether this entry is a card.
    #[must_use]
    pub fn is_card(&self) -> bool {
        matches!(self.kind, EntryKind::Card(_))
    }

    /// The plain text a reader sees, with no markup interpretation.
    #[must_use]
    pub fn text_content(&self) -> String {
        match &self.kind {
            EntryKind::User { text } | EntryKind::Text { text } => text.clone(),
            EntryKind::Error { message } => format!("Error: {message}"),
            EntryKind::Dump { json } => json.clone(),
            EntryKind::Card(card) => card.text_content(),
        }
    }
}

impl Card {
    /// Title and lines joined by newlines, or the dump.
    #[must_use]
    pub fn text_content(&self) -> String {
        match &self.body {
            CardBody::Template { title, lines } => {
                let mut out = title.clone();
                for (label, value) in lines {
                    out.push('\n');
                    out.push_str(label);
                    out.push_str(": ");
                    out.push_str(value);
                }
                out
            }
            CardBody::Dump { json } => json.clone(),
        }
    }

    /// Value of a labeled line, if the card is templated and has it.
    #[must_use]
    pub fn line(&self, label: &str) -> Option<&str> {
        match &self.body {
            CardBody::Template { lines, .. } => lines
                .iter()
                .find(|(l, _)| l == label)
                .map(|(_, v)| v.as_str()),
            CardBody::Dump { .. } => None,
        }
    }
}
