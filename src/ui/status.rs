//! Status panel fragment.

use std::time::Duration;

use maud::{Markup, html};

use crate::widget::StatusView;

/// Notice shown when the status endpoint cannot be reached.
pub const UNREACHABLE_NOTICE: &str = "Could not connect to the server";

/// The status panel. It re-requests itself every `poll` via htmx.
pub fn render_status(view: &StatusView, poll: Duration) -> Markup {
    let trigger = format!("every {}s", poll.as_secs().max(1));
    html! {
        div id="status-panel" class="estado-usuario"
            hx-get="/ui/status" hx-trigger=(trigger) hx-swap="outerHTML" {
            @match view {
                StatusView::Pending => {
                    p class="muted" { "Checking status..." }
                }
                StatusView::Snapshot { access, places, notifications, refreshed_at } => {
                    p { "Limited access: " span { (access) } }
                    p { "Visible places: " span { (places) } }
                    p { "Notifications: " span { (notifications) } }
                    p class="muted" {
                        "Updated " time datetime=(refreshed_at.to_rfc3339()) {
                            (refreshed_at.format("%H:%M:%S").to_string())
                        }
                    }
                }
                StatusView::Unreachable { .. } => {
                    p class="error" { (UNREACHABLE_NOTICE) }
                }
            }
        }
    }
}
