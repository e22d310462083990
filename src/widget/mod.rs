//! In-memory widget surfaces.
//!
//! These stand in for the page elements the controller writes to. Each is a
//! cheap `Clone` handle over shared state, so the controller, the status
//! poller and the HTTP handlers all observe the same log, input and panel.
//!
//! - [`ChatLog`]: append-only list of rendered [`LogEntry`] values
//! - [`InputField`]: the text box holding the pending message
//! - [`StatusPanel`]: the latest [`StatusView`]
//!
//! # Example
//!
//! ```rust
//! use nextstop_widget::widget::{ChatLog, LogEntry};
//!
//! let log = ChatLog::new();
//! log.append(LogEntry::user("hola"));
//! log.scroll_to_end();
//!
//! assert_eq!(log.len(), 1);
//! assert!(log.is_scrolled_to_end());
//! ```

mod entry;
mod surfaces;

pub use entry::{Card, CardBody, EntryKind, LogEntry};
pub use surfaces::{ChatLog, InputField, StatusPanel, StatusView};
