//! Input handling for the TUI.
//!
//! Keys are dispatched on the route at the top of the stack. The stories
//! screen has a separate search mode that captures printable keys.

use crate::app::{App, AppEvent};
use crate::list::ListEvent;
use crate::nav::{Route, RouteName};
use crate::util::{validate_url_for_open, MAX_SEARCH_QUERY_LENGTH};
use crossterm::event::{KeyCode, KeyModifiers};
use tokio::sync::mpsc;

use super::Action;

/// Lines moved per j/k press in the details screen.
const DETAIL_SCROLL_STEP: i32 = 1;
/// Lines moved per Ctrl+d / Ctrl+u in the details screen.
const DETAIL_PAGE_STEP: i32 = 10;

/// Main input dispatch function.
pub(super) fn handle_input(
    app: &mut App,
    code: KeyCode,
    modifiers: KeyModifiers,
    event_tx: &mpsc::Sender<AppEvent>,
) -> Action {
    if modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
        return Action::Quit;
    }

    match app.nav.current().name() {
        RouteName::Stories if app.search_mode => handle_search_input(app, code),
        RouteName::Stories => handle_stories_input(app, code, event_tx),
        RouteName::Details => handle_details_input(app, code, modifiers),
        RouteName::Counter => handle_counter_input(app, code, event_tx),
    }
}

/// Search box editing. Every edit re-filters immediately.
fn handle_search_input(app: &mut App, code: KeyCode) -> Action {
    match code {
        KeyCode::Esc => {
            app.search_mode = false;
            app.apply_list_event(ListEvent::QueryChanged(String::new()));
        }
        KeyCode::Enter => {
            app.search_mode = false;
        }
        KeyCode::Backspace => {
            let mut query = app.stories.search_query.clone();
            query.pop();
            app.apply_list_event(ListEvent::QueryChanged(query));
        }
        KeyCode::Char(c) => {
            if app.stories.search_query.chars().count() >= MAX_SEARCH_QUERY_LENGTH {
                app.set_status(format!(
                    "Search query too long (max {} chars)",
                    MAX_SEARCH_QUERY_LENGTH
                ));
            } else {
                let mut query = app.stories.search_query.clone();
                query.push(c);
                app.apply_list_event(ListEvent::QueryChanged(query));
            }
        }
        _ => {}
    }
    Action::Continue
}

fn handle_stories_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char('j') | KeyCode::Down => app.apply_list_event(ListEvent::SelectionMoved(1)),
        KeyCode::Char('k') | KeyCode::Up => app.apply_list_event(ListEvent::SelectionMoved(-1)),
        KeyCode::Char('l') | KeyCode::Right | KeyCode::PageDown => {
            if let Some(event) = app.stories.next_window_page() {
                app.apply_list_event(event);
            }
        }
        KeyCode::Char('h') | KeyCode::Left | KeyCode::PageUp => {
            if let Some(event) = app.stories.prev_window_page() {
                app.apply_list_event(event);
            }
        }
        KeyCode::Char(c @ '1'..='9') => {
            let page = c as usize - '0' as usize;
            if page <= app.stories.total_pages() {
                app.apply_list_event(ListEvent::PageSelected(page));
            }
        }
        KeyCode::Char('/') => app.search_mode = true,
        KeyCode::Enter => app.open_selected_story(event_tx),
        KeyCode::Char('c') => {
            let message = app.counter.message.clone();
            app.navigate(Route::Counter { message }, event_tx);
        }
        KeyCode::Esc => {
            if app.stories.search_query.is_empty() {
                app.go_back();
            } else {
                app.apply_list_event(ListEvent::QueryChanged(String::new()));
            }
        }
        _ => {}
    }
    Action::Continue
}

fn handle_details_input(app: &mut App, code: KeyCode, modifiers: KeyModifiers) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Esc | KeyCode::Char('b') | KeyCode::Backspace => {
            app.go_back();
        }
        KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_detail(DETAIL_PAGE_STEP)
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.scroll_detail(-DETAIL_PAGE_STEP)
        }
        KeyCode::Char('j') | KeyCode::Down => app.scroll_detail(DETAIL_SCROLL_STEP),
        KeyCode::Char('k') | KeyCode::Up => app.scroll_detail(-DETAIL_SCROLL_STEP),
        KeyCode::Char('o') => open_story_url(app),
        _ => {}
    }
    Action::Continue
}

fn handle_counter_input(app: &mut App, code: KeyCode, event_tx: &mpsc::Sender<AppEvent>) -> Action {
    match code {
        KeyCode::Char('q') => return Action::Quit,
        KeyCode::Char(' ') | KeyCode::Char('+') | KeyCode::Enter => app.increment_counter(),
        KeyCode::Char('s') => app.navigate(Route::Stories, event_tx),
        KeyCode::Esc | KeyCode::Char('b') => {
            app.go_back();
        }
        _ => {}
    }
    Action::Continue
}

/// Open the detail story's link in the system browser.
fn open_story_url(app: &mut App) {
    let Some(url) = app.detail_story().map(|s| s.url.clone()) else {
        return;
    };
    // Only http(s) reaches open::that()
    match validate_url_for_open(&url) {
        Err(e) => app.set_status(e.to_string()),
        Ok(url) => {
            if let Err(e) = open::that(url.as_str()) {
                tracing::warn!(url = %url, error = %e, "Failed to open browser");
                app.set_status(format!("Failed to open browser: {}", e));
            } else {
                app.set_status("Opening in browser...");
            }
        }
    }
}
