//! Application event handling.
//!
//! Applies background task events (poller output, panics) to the app state.

use crate::app::{App, AppEvent};

/// Handle one event from a background task.
pub(super) fn handle_app_event(app: &mut App, event: AppEvent) {
    match event {
        AppEvent::Stories { generation, event } => {
            if app.handle_stories_event(generation, event) {
                app.needs_redraw = true;
            }
        }
        AppEvent::TaskPanicked { task, error } => {
            tracing::error!(task, error, "Background task panicked");
            app.set_status(format!("Internal error in {} task", task));
            app.needs_redraw = true;
        }
    }
}
