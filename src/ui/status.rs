use crate::app::App;
use crate::nav::RouteName;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};
use std::borrow::Cow;

/// Render the status bar
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    // Borrow the status message; hints are static
    let text: Cow<'_, str> = if let Some((msg, _)) = &app.status_message {
        Cow::Borrowed(&**msg)
    } else {
        match app.nav.current().name() {
            RouteName::Stories if app.search_mode => {
                Cow::Borrowed("Type to search | ESC clear | ENTER keep")
            }
            RouteName::Stories => Cow::Borrowed(
                "[j/k]move [h/l]page [/]search [Enter]details [c]ounter [q]uit",
            ),
            RouteName::Details => Cow::Borrowed("[b]ack [j/k]scroll [o]pen [q]uit"),
            RouteName::Counter => Cow::Borrowed("[space]+1 [s]tories [b]ack [q]uit"),
        }
    };

    let style = Style::default().bg(Color::DarkGray).fg(Color::White);
    f.render_widget(Paragraph::new(text).style(style), area);
}
