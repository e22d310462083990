//! Shared surface handles.

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};

use super::LogEntry;
use crate::envelope::StatusSnapshot;

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ─────────────────────────────────────────────────────────────────────────────
// Chat log
// ─────────────────────────────────────────────────────────────────────────────

/// Scrolling chat log.
#[derive(Debug, Clone, Default)]
pub struct ChatLog {
    inner: Arc<RwLock<LogInner>>,
}

#[derive(Debug, Default)]
struct LogInner {
    entries: Vec<LogEntry>,
    /// Number of entries visible above the viewport bottom.
    scroll_position: usize,
}

impl ChatLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry.
    pub fn append(&self, entry: LogEntry) {
        write(&self.inner).entries.push(entry);
    }

    /// Append a batch contiguously; concurrent appends cannot interleave with it.
    pub fn append_all(&self, entries: impl IntoIterator<Item = LogEntry>) {
        write(&self.inner).entries.extend(entries);
    }

    /// Drop every entry; the next page load starts an empty conversation.
    pub fn clear(&self) {
        let mut guard = write(&self.inner);
        guard.entries.clear();
        guard.scroll_position = 0;
    }

    /// Move the viewport to the newest entry.
    pub fn scroll_to_end(&self) {
        let mut guard = write(&self.inner);
        guard.scroll_position = guard.entries.len();
    }

    #[must_use]
    pub fn is_scrolled_to_end(&self) -> bool {
        let guard = read(&self.inner);
        guard.scroll_position == guard.entries.len()
    }

    /// Snapshot of every entry, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<LogEntry> {
        read(&self.inner).entries.clone()
    }

    /// Entries appended at or after `index`.
    #[must_use]
    pub fn entries_since(&self, index: usize) -> Vec<LogEntry> {
        read(&self.inner)
            .entries
            .get(index..)
            .map(<[LogEntry]>::to_vec)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        read(&self.inner).entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Input field
// ─────────────────────────────────────────────────────────────────────────────

/// The message text box.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    value: Arc<RwLock<String>>,
}

impl InputField {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn value(&self) -> String {
        read(&self.value).clone()
    }

    pub fn set_value(&self, value: impl Into<String>) {
        *write(&self.value) = value.into();
    }

    pub fn clear(&self) {
        write(&self.value).clear();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Status panel
// ─────────────────────────────────────────────────────────────────────────────

/// What the status panel currently shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusView {
    /// No refresh has completed yet.
    Pending,
    /// Last refresh succeeded; fallbacks already substituted.
    Snapshot {
        access: String,
        places: String,
        notifications: String,
        refreshed_at: DateTime<Utc>,
    },
    /// Last refresh failed.
    Unreachable { at: DateTime<Utc> },
}

impl StatusView {
    #[must_use]
    pub fn from_snapshot(snapshot: &StatusSnapshot) -> Self {
        Self::Snapshot {
            access: snapshot.access(),
            places: snapshot.places(),
            notifications: snapshot.notifications(),
            refreshed_at: Utc::now(),
        }
    }

    #[must_use]
    pub fn unreachable() -> Self {
        Self::Unreachable { at: Utc::now() }
    }
}

/// The status panel.
#[derive(Debug, Clone)]
pub struct StatusPanel {
    view: Arc<RwLock<StatusView>>,
}

impl Default for StatusPanel {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusPanel {
    #[must_use]
    pub fn new() -> Self {
        Self {
            view: Arc::new(RwLock::new(StatusView::Pending)),
        }
    }

    pub fn show(&self, view: StatusView) {
        *write(&self.view) = view;
    }

    #[must_use]
    pub fn view(&self) -> StatusView {
        read(&self.view).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_scroll_tracks_appends() {
        let log = ChatLog::new();
        assert!(log.is_empty());
        assert!(log.is_scrolled_to_end());

        log.append(LogEntry::user("a"));
        assert!(!log.is_scrolled_to_end());

        log.scroll_to_end();
        assert!(log.is_scrolled_to_end());
    }

    #[test]
    fn test_clear_empties_every_handle() {
        let log = ChatLog::new();
        let other = log.clone();
        log.append_all([LogEntry::user("a"), LogEntry::text("b")]);
        log.scroll_to_end();

        other.clear();

        assert!(log.is_empty());
        assert!(log.is_scrolled_to_end());
        log.append(LogEntry::user("c"));
        assert_eq!(other.entries()[0].text_content(), "c");
    }

    #[test]
    fn test_entries_since() {
        let log = ChatLog::new();
        log.append_all([LogEntry::user("a"), LogEntry::text("b"), LogEntry::text("c")]);

        let tail = log.entries_since(1);
        assert_eq!(tail.len(), 2);
        assert_eq!(tail[0].text_content(), "b");
        assert!(log.entries_since(10).is_empty());
    }

    #[test]
    fn test_handles_share_state() {
        let input = InputField::new();
        let other = input.clone();
        input.set_value("hola");
        assert_eq!(other.value(), "hola");
        other.clear();
        assert_eq!(input.value(), "");
    }

    #[test]
    fn test_status_panel_starts_pending() {
        let panel = StatusPanel::new();
        assert_eq!(panel.view(), StatusView::Pending);
        panel.show(StatusView::from_snapshot(&StatusSnapshot::default()));
        match panel.view() {
            StatusView::Snapshot { access, .. } => assert_eq!(access, "Yes"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
