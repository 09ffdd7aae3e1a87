use crate::app::App;
use crate::list::Phase;
use crate::story::Story;
use crate::util::{display_width, sanitize_line, truncate_to_width};
use chrono::{DateTime, Utc};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Braille spinner, one frame per tick.
pub(super) const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// The three display lines of a story row: title, author, date and tags.
pub fn listing_lines(story: &Story) -> [String; 3] {
    [
        sanitize_line(&story.title).into_owned(),
        format!("By {}", sanitize_line(&story.author)),
        format!(
            "{} - Tags: {}",
            sanitize_line(&story.created_at),
            sanitize_line(&story.tag_line())
        ),
    ]
}

/// Compact age of a unix timestamp: "42m", "5h", "3d", or "Sep 10" past a week.
pub(super) fn format_age(timestamp: Option<i64>, now: i64) -> String {
    let Some(ts) = timestamp else {
        return String::new();
    };

    let diff = now - ts;
    if diff < 0 {
        return "now".to_string();
    }
    if diff < 3600 {
        return format!("{}m", diff / 60);
    }
    if diff < 86400 {
        return format!("{}h", diff / 3600);
    }
    if diff < 604800 {
        return format!("{}d", diff / 86400);
    }
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%b %d").to_string())
        .unwrap_or_default()
}

/// Render the stories screen
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    // Guard against zero-width/height areas
    if area.width < 1 || area.height < 1 {
        return;
    }

    let state = &app.stories;

    // Nothing loaded yet: either the error alone, or a loading placeholder.
    if state.items.is_empty() {
        if let Some(message) = &state.error_message {
            f.render_widget(Paragraph::new(message.as_str()), area);
            return;
        }
        let frame = SPINNER[app.spinner_frame % SPINNER.len()];
        let placeholder = Paragraph::new(format!("{} Loading stories...", frame))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title("Stories"));
        f.render_widget(placeholder, area);
        return;
    }

    let banner_height = u16::from(state.error_message.is_some());
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(banner_height),
            Constraint::Length(1),
        ])
        .split(area);

    render_search_bar(f, app, chunks[0]);
    render_list(f, app, chunks[1]);
    if let Some(message) = &state.error_message {
        let banner = Paragraph::new(format!("! {}", message))
            .style(Style::default().fg(Color::Red));
        f.render_widget(banner, chunks[2]);
    }
    render_pagination(f, app, chunks[3]);
}

fn render_search_bar(f: &mut Frame, app: &App, area: Rect) {
    let query = &app.stories.search_query;
    let line = if app.search_mode {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Cyan)),
            Span::raw(format!("{}_", query)),
        ])
    } else if query.is_empty() {
        Line::from(Span::styled(
            "Search: (press / to filter)",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Cyan)),
            Span::raw(query.as_str()),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_list(f: &mut Frame, app: &App, area: Rect) {
    let state = &app.stories;
    let visible = state.visible();
    // Borders take 2 columns
    let max_width = area.width.saturating_sub(2) as usize;
    let now = Utc::now().timestamp();

    let items: Vec<ListItem> = if visible.is_empty() {
        vec![ListItem::new("No matching stories")]
    } else {
        visible
            .iter()
            .enumerate()
            .map(|(i, story)| {
                let [title, author, meta] = listing_lines(story);
                let title_style = if i == state.selected {
                    Style::default()
                        .bg(Color::DarkGray)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                let dim = Style::default().fg(Color::Gray);

                // Leave room for the age suffix
                let age = format_age(story.published(), now);
                let title_width = max_width.saturating_sub(display_width(&age) + 2);
                let mut title_spans = vec![Span::styled(
                    truncate_to_width(&title, title_width).into_owned(),
                    title_style,
                )];
                if !age.is_empty() {
                    title_spans.push(Span::styled(
                        format!("  {}", age),
                        Style::default().fg(Color::DarkGray),
                    ));
                }

                ListItem::new(vec![
                    Line::from(title_spans),
                    Line::from(Span::styled(
                        truncate_to_width(&author, max_width).into_owned(),
                        dim,
                    )),
                    Line::from(Span::styled(
                        truncate_to_width(&meta, max_width).into_owned(),
                        Style::default().fg(Color::DarkGray),
                    )),
                ])
            })
            .collect()
    };

    let title = format!("Stories ({})", state.filtered_count());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(title),
    );
    f.render_widget(list, area);
}

fn render_pagination(f: &mut Frame, app: &App, area: Rect) {
    let state = &app.stories;
    let mut text = format!(
        "Page {}/{}  [h/l] prev/next  [1-9] jump",
        state.current_page,
        state.total_pages().max(1)
    );
    if state.phase() == Phase::Loading {
        text.push_str(&format!("  {} loading", SPINNER[app.spinner_frame % SPINNER.len()]));
    }
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::list::ListEvent;
    use crate::source::{FetchError, StorySource};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    struct EmptySource;

    impl StorySource for EmptySource {
        async fn fetch_page(&self, _page: u32) -> Result<Vec<Story>, FetchError> {
            Ok(Vec::new())
        }
    }

    fn story(id: &str, title: &str) -> Story {
        Story {
            id: id.into(),
            title: title.into(),
            author: "alice".into(),
            url: String::new(),
            created_at: "2024-09-10T12:00:00Z".into(),
            tags: vec!["story".into(), "author_alice".into()],
        }
    }

    fn mounted_app() -> App {
        let mut app = App::new(Arc::new(EmptySource), &Config::default());
        let (tx, _rx) = tokio::sync::mpsc::channel(4);
        app.start(&tx);
        app
    }

    fn apply(app: &mut App, event: ListEvent) {
        let generation = app.stories_generation();
        assert!(app.handle_stories_event(generation, event));
    }

    fn draw(app: &App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                render(f, app, area);
            })
            .unwrap();
        let buffer = terminal.backend().buffer();
        (0..height)
            .map(|y| {
                (0..width)
                    .map(|x| buffer[(x, y)].symbol())
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_format_age() {
        let now = 1_726_000_000;
        assert_eq!(format_age(None, now), "");
        assert_eq!(format_age(Some(now + 60), now), "now");
        assert_eq!(format_age(Some(now - 300), now), "5m");
        assert_eq!(format_age(Some(now - 7200), now), "2h");
        assert_eq!(format_age(Some(now - 3 * 86400), now), "3d");
        // 2024-09-10T12:00:00Z
        assert_eq!(format_age(Some(1_725_969_600), now + 30 * 86400), "Sep 10");
    }

    #[test]
    fn test_listing_lines() {
        let lines = listing_lines(&story("1", "Show HN: hnfeed"));
        assert_eq!(lines[0], "Show HN: hnfeed");
        assert_eq!(lines[1], "By alice");
        assert_eq!(lines[2], "2024-09-10T12:00:00Z - Tags: story, author_alice");
    }

    #[tokio::test]
    async fn test_error_with_no_items_renders_only_message() {
        let mut app = mounted_app();
        apply(
            &mut app,
            ListEvent::FetchFailed {
                page: 0,
                message: "Failed to fetch".into(),
            },
        );

        let screen = draw(&app, 40, 6);
        assert_eq!(screen.trim(), "Failed to fetch");
    }

    #[tokio::test]
    async fn test_loaded_stories_render_rows() {
        let mut app = mounted_app();
        apply(
            &mut app,
            ListEvent::FetchSucceeded {
                page: 0,
                hits: vec![story("a", "Alpha"), story("b", "Beta")],
            },
        );

        let screen = draw(&app, 70, 14);
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("Beta"));
        assert!(screen.contains("By alice"));
        assert!(screen.contains("Page 1/1"));
        assert!(!screen.contains("Loading"));
    }

    #[tokio::test]
    async fn test_error_banner_keeps_list_visible() {
        let mut app = mounted_app();
        apply(
            &mut app,
            ListEvent::FetchSucceeded {
                page: 0,
                hits: vec![story("a", "Alpha")],
            },
        );
        apply(
            &mut app,
            ListEvent::FetchFailed {
                page: 1,
                message: "HTTP error: status 503".into(),
            },
        );

        let screen = draw(&app, 70, 12);
        assert!(screen.contains("Alpha"));
        assert!(screen.contains("! HTTP error: status 503"));
    }

    #[tokio::test]
    async fn test_pagination_shows_loading_while_fetching_more() {
        let mut app = mounted_app();
        apply(
            &mut app,
            ListEvent::FetchSucceeded {
                page: 0,
                hits: vec![story("a", "Alpha")],
            },
        );
        assert!(!draw(&app, 70, 12).contains("loading"));

        apply(&mut app, ListEvent::FetchStarted { page: 1 });
        assert_eq!(app.stories.phase(), Phase::Loading);
        assert!(draw(&app, 70, 12).contains("loading"));
    }

    #[tokio::test]
    async fn test_empty_and_loading_shows_placeholder() {
        let mut app = mounted_app();
        apply(&mut app, ListEvent::FetchStarted { page: 0 });
        let screen = draw(&app, 40, 5);
        assert!(screen.contains("Loading stories..."));
    }
}
