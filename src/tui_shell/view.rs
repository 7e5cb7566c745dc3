use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

/// Draw a bordered panel titled `title` (plus an optional grey note) and
/// return the area inside the border.
pub(super) fn render_view_chrome(
    frame: &mut ratatui::Frame,
    title: &str,
    note: &str,
    focused: bool,
    area: Rect,
) -> Rect {
    let title_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let mut spans = vec![Span::styled(title.to_string(), title_style)];
    if !note.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(note.to_string(), Style::default().fg(Color::DarkGray)));
    }
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(spans));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    inner
}
