use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Tabs, Wrap};

use crate::artifacts::Pane;
use crate::error::Severity;
use crate::model::NodeState;
use crate::monitor::Connection;
use crate::remote::ArtifactKind;

use super::super::{modal, render_view_chrome};
use super::App;

const KEY_HELP: &str = "q quit  r refresh  l load  s/u/k/f/R suspend/resume/kill/force/requeue  F filter  / search  c find  w why  v vars  e edit  t live";

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let header = Line::from(vec![
        Span::styled("flowtop", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
        Span::styled(KEY_HELP, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(header), chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[1]);
    draw_tree(frame, app, body[0]);
    draw_content(frame, app, body[1]);
    draw_status(frame, app, chunks[2]);
    draw_toast(frame, app, chunks[3]);

    if let Some(m) = &app.modal {
        modal::draw_modal(frame, m, app);
    }
}

fn state_color(state: Option<NodeState>) -> Color {
    match state {
        Some(NodeState::Aborted) => Color::Red,
        Some(NodeState::Active) => Color::LightRed,
        Some(NodeState::Complete) => Color::Green,
        Some(NodeState::Queued) => Color::Blue,
        Some(NodeState::Submitted) => Color::Yellow,
        Some(NodeState::Suspended) => Color::Magenta,
        Some(NodeState::Unknown) => Color::Gray,
        None => Color::White,
    }
}

fn draw_tree(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let dashboard = app.monitor.dashboard();
    let tree = dashboard.tree();
    let note = format!("filter: {}", dashboard.filter());
    let inner = render_view_chrome(frame, "Suites", &note, app.modal.is_none(), area);

    let rendered = tree.rendered_rows();
    let selected_pos = rendered
        .iter()
        .position(|i| *i == tree.selected_index())
        .unwrap_or(0);
    let height = inner.height as usize;
    let offset = if height == 0 {
        0
    } else {
        selected_pos.saturating_sub(height.saturating_sub(1))
    };

    let lines: Vec<Line> = rendered
        .iter()
        .skip(offset)
        .take(height)
        .map(|idx| {
            let row = &tree.rows()[*idx];
            let marker = if !row.has_children {
                "  "
            } else if tree.is_collapsed(*idx) {
                "▸ "
            } else {
                "▾ "
            };
            let indent = "  ".repeat(row.depth);
            let mut style = Style::default().fg(state_color(row.state));
            if *idx == tree.selected_index() {
                style = style.add_modifier(Modifier::REVERSED);
            }
            if row.path.is_none() && dashboard.connection() == Connection::Failed {
                style = style.fg(Color::Red);
            }
            Line::from(Span::styled(format!("{}{}{}", indent, marker, row.label()), style))
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_content(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let dashboard = app.monitor.dashboard();
    let active = dashboard.active_view();
    let owner = dashboard
        .artifacts()
        .owner()
        .map(|p| p.to_string())
        .unwrap_or_default();
    let title = if dashboard.is_live() {
        format!("{}  [LIVE]", active.title())
    } else {
        active.title().to_string()
    };
    let inner = render_view_chrome(frame, &title, &owner, false, area);
    if inner.height == 0 {
        return;
    }

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let titles: Vec<Line> = ArtifactKind::ALL
        .iter()
        .map(|k| Line::from(format!("{} {}", k.index() + 1, k.title())))
        .collect();
    frame.render_widget(
        Tabs::new(titles)
            .select(active.index())
            .highlight_style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        parts[0],
    );

    let (text, style) = match dashboard.artifacts().pane(active) {
        Pane::Text(text) => (text.as_str(), Style::default()),
        Pane::Unavailable(msg) => (msg.as_str(), Style::default().fg(Color::Red)),
        Pane::Empty => ("Press l to load files for the selected node.", Style::default().fg(Color::Gray)),
    };
    let line_count = text.lines().count() as u16;
    let view_h = parts[1].height;
    // Follow the tail while live.
    let scroll = if dashboard.is_live() && active == ArtifactKind::Output {
        line_count.saturating_sub(view_h)
    } else {
        app.content_scroll.min(line_count.saturating_sub(1))
    };
    frame.render_widget(
        Paragraph::new(text.to_string())
            .style(style)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0)),
        parts[1],
    );
}

fn draw_status(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let dashboard = app.monitor.dashboard();
    let status = dashboard.status();
    let server_color = match status.server_label() {
        "RUNNING" => Color::Green,
        "HALTED" | "SHUTDOWN" => Color::Red,
        _ => Color::Gray,
    };
    let busy = if app.monitor.is_busy() { "  working..." } else { "" };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", status.endpoint_label()),
            Style::default().fg(Color::Black).bg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::styled(status.server_label(), Style::default().fg(server_color)),
        Span::raw(format!("  Last sync: {}", status.last_sync_label())),
        Span::raw(format!("  Filter: {}", dashboard.filter())),
        Span::raw(format!(
            "  Live: {}",
            if dashboard.is_live() { "ON" } else { "OFF" }
        )),
        Span::styled(busy, Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_toast(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(n) = app.toast() else {
        return;
    };
    let color = match n.severity {
        Severity::Info => Color::White,
        Severity::Warning => Color::Yellow,
        Severity::Error => Color::Red,
    };
    frame.render_widget(
        Paragraph::new(Span::styled(n.message.as_str(), Style::default().fg(color))),
        area,
    );
}

#[cfg(test)]
#[path = "../../tests/tui_shell/render_tests.rs"]
mod tests;
