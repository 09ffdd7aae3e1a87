use crate::app::App;
use crate::story::Story;
use crate::util::sanitize_line;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Lines of the details screen for one story.
///
/// Header fields first, then a blank line and the full record as pretty JSON.
/// Missing fields render as empty values.
pub fn detail_lines(story: &Story) -> Vec<String> {
    let mut lines = vec![
        sanitize_line(&story.title).into_owned(),
        format!("By {}", sanitize_line(&story.author)),
        format!("Created at: {}", sanitize_line(&story.created_at)),
        format!("URL: {}", sanitize_line(&story.url)),
        format!("Tags: {}", sanitize_line(&story.tag_line())),
        String::new(),
    ];

    match serde_json::to_string_pretty(story) {
        Ok(json) => lines.extend(json.lines().map(|l| sanitize_line(l).into_owned())),
        Err(e) => {
            tracing::warn!(id = %story.id, error = %e, "Failed to serialize story");
            lines.push(format!("(record unavailable: {})", e));
        }
    }
    lines
}

/// Render the details screen
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    if area.width < 3 || area.height < 3 {
        return;
    }

    let Some(story) = app.detail_story() else {
        let paragraph = Paragraph::new("No story selected")
            .block(Block::default().borders(Borders::ALL).title("Details"));
        f.render_widget(paragraph, area);
        return;
    };

    let lines: Vec<Line> = detail_lines(story)
        .into_iter()
        .enumerate()
        .map(|(i, line)| match i {
            0 => Line::from(Span::styled(line, Style::default().add_modifier(Modifier::BOLD))),
            1..=4 => Line::from(Span::styled(line, Style::default().fg(Color::Gray))),
            _ => Line::from(Span::styled(line, Style::default().fg(Color::DarkGray))),
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    f.render_widget(paragraph, area);
}
