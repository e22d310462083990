//! Typed view of the chat backend's response envelope.
//!
//! The backend answers `/chat` with a loosely shaped JSON object:
//!
//! ```json
//! { "type": "cards" | "text" | "error", "modulo": "...", "data": ..., "error": "..." }
//! ```
//!
//! [`Response::from_value`] decodes it into a closed sum type once, at the
//! network boundary, so the renderer never branches on raw fields. Decoding
//! never fails: shapes that match no rule land in [`Response::Unknown`].
//!
//! # Example
//!
//! ```rust
//! use nextstop_widget::envelope::{CardModule, Response};
//! use serde_json::json;
//!
//! let response = Response::from_value(&json!({
//!     "type": "cards",
//!     "modulo": "lugares",
//!     "data": [{ "name": "Isla X" }, { "name": "Isla Y" }]
//! }));
//!
//! match response {
//!     Response::Cards { module, records } => {
//!         assert_eq!(module, CardModule::Places);
//!         assert_eq!(records.len(), 2);
//!     }
//!     other => panic!("unexpected {other:?}"),
//! }
//! ```

use serde::Deserialize;
use serde_json::{Value, json};

/// Literal shown for a field the record does not carry.
pub const MISSING_FIELD: &str = "undefined";

/// Message synthesized when the chat request itself fails.
pub const CONNECTION_FAILED: &str = "connection failed";

/// Module tag used when a `cards` envelope carries no `modulo`.
const GENERAL_MODULE: &str = "general";

/// Domain tag selecting the card template for a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardModule {
    /// `notificaciones`
    Notifications,
    /// `lugares`
    Places,
    /// Any other tag; records render as a pretty-printed dump.
    Other(String),
}

impl CardModule {
    /// Map a wire tag onto a module. Empty tags become `general`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "notificaciones" => Self::Notifications,
            "lugares" => Self::Places,
            "" => Self::Other(GENERAL_MODULE.to_string()),
            other => Self::Other(other.to_string()),
        }
    }

    /// The wire tag, also used for the `card-<tag>` CSS class.
    #[must_use]
    pub fn tag(&self) -> &str {
        match self {
            Self::Notifications => "notificaciones",
            Self::Places => "lugares",
            Self::Other(tag) => tag,
        }
    }
}

/// A decoded chat response.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// One card per record, in order. A single-object `data` is a batch of one.
    Cards {
        /// Template selector.
        module: CardModule,
        /// Records to summarize.
        records: Vec<Value>,
    },
    /// Plain text bubble.
    Text(String),
    /// Application-level error reported by the backend.
    Error(String),
    /// Nothing matched; the whole envelope is kept for a raw dump.
    Unknown(Value),
}

impl Response {
    /// Decode an envelope. First matching rule wins:
    ///
    /// 1. `cards` with an object `data`
    /// 2. `cards` with an array `data`
    /// 3. `text`
    /// 4. `error`, or any truthy `error` field
    /// 5. anything else
    #[must_use]
    pub fn from_value(envelope: &Value) -> Self {
        let Some(obj) = envelope.as_object() else {
            return Self::Unknown(envelope.clone());
        };

        let kind = obj.get("type").and_then(Value::as_str);
        let data = obj.get("data");

        if kind == Some("cards") {
            let module = obj
                .get("modulo")
                .filter(|m| is_truthy(m))
                .map_or_else(
                    || CardModule::from_tag(GENERAL_MODULE),
                    |m| CardModule::from_tag(&display_value(m)),
                );
            match data {
                Some(record @ Value::Object(_)) => {
                    return Self::Cards {
                        module,
                        records: vec![record.clone()],
                    };
                }
                Some(Value::Array(records)) => {
                    return Self::Cards {
                        module,
                        records: records.clone(),
                    };
                }
                _ => {}
            }
        }

        if kind == Some("text") {
            return Self::Text(field_text(data));
        }

        let error = obj.get("error").filter(|e| is_truthy(e));
        if kind == Some("error") || error.is_some() {
            let message = data.filter(|d| is_truthy(d)).or(error);
            return Self::Error(field_text(message));
        }

        Self::Unknown(envelope.clone())
    }

    /// Envelope rendered when the request never produced a usable body.
    #[must_use]
    pub fn connection_failed() -> Value {
        json!({ "type": "error", "data": CONNECTION_FAILED })
    }
}

/// Body of the `/estado` endpoint. Every field is optional and tolerant of
/// non-string values; unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StatusSnapshot {
    #[serde(default)]
    pub acceso: Option<Value>,
    #[serde(default)]
    pub lugares_visibles: Option<Value>,
    #[serde(default)]
    pub notificaciones: Option<Value>,
}

impl StatusSnapshot {
    /// Access line, falling back to `Yes`.
    #[must_use]
    pub fn access(&self) -> String {
        text_or(self.acceso.as_ref(), "Yes")
    }

    /// Visible places line, falling back to `Accepted`.
    #[must_use]
    pub fn places(&self) -> String {
        text_or(self.lugares_visibles.as_ref(), "Accepted")
    }

    /// Notifications line, falling back to `Available`.
    #[must_use]
    pub fn notifications(&self) -> String {
        text_or(self.notificaciones.as_ref(), "Available")
    }
}

/// JS-style truthiness: `null`, `false`, `0` and `""` are falsy.
#[must_use]
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Display text for a present value: strings verbatim, everything else as JSON.
#[must_use]
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => MISSING_FIELD.to_string(),
        other => other.to_string(),
    }
}

/// Display text for an optional field; absent reads as [`MISSING_FIELD`].
#[must_use]
pub fn field_text(value: Option<&Value>) -> String {
    value.map_or_else(|| MISSING_FIELD.to_string(), display_value)
}

/// Display text for an optional field, substituting `fallback` when falsy.
#[must_use]
pub fn text_or(value: Option<&Value>, fallback: &str) -> String {
    value
        .filter(|v| is_truthy(v))
        .map_or_else(|| fallback.to_string(), display_value)
}

/// Pretty-printed JSON, the form used by dump cards and the raw fallback.
#[must_use]
pub fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}
