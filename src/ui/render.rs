//! Render dispatch: one screen per route, plus a header and status bar.

use crate::app::App;
use crate::nav::RouteName;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{counter, detail, status, stories};

/// Minimum terminal dimensions required for normal operation.
pub(super) const MIN_WIDTH: u16 = 40;
pub(super) const MIN_HEIGHT: u16 = 8;

/// Main render function.
///
/// Handles terminal size validation before dispatching on the top route.
pub(super) fn render(f: &mut Frame, app: &App) {
    let area = f.area();

    // Guard against zero-width/height to prevent panics
    if area.width < 1 || area.height < 1 {
        return;
    }

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = if area.height < 3 || area.width < 20 {
            Paragraph::new("Too small")
        } else {
            Paragraph::new(format!(
                "Terminal too small\n\nMinimum: {}x{}\nCurrent: {}x{}",
                MIN_WIDTH, MIN_HEIGHT, area.width, area.height
            ))
            .alignment(Alignment::Center)
        };
        f.render_widget(msg, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(f, app, chunks[0]);
    match app.nav.current().name() {
        RouteName::Stories => stories::render(f, app, chunks[1]),
        RouteName::Details => detail::render(f, app, chunks[1]),
        RouteName::Counter => counter::render(f, app, chunks[1]),
    }
    status::render(f, app, chunks[2]);
}

/// Breadcrumb of the route stack, e.g. "hnfeed > Stories > Details".
fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        "hnfeed",
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    )];
    for name in app.nav.names() {
        spans.push(Span::raw(" > "));
        spans.push(Span::raw(name.title()));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
