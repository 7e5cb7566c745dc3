use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::monitor::Confirm;
use crate::remote::ArtifactKind;
use crate::variables::{Origin, VariableSet};

use super::App;
use super::input::Input;

pub(super) enum ModalKind {
    /// Read-only scrollable text.
    Viewer,
    Confirm(Confirm),
    TreeSearch,
    ContentSearch(ArtifactKind),
    Variables { selected: usize },
}

pub(super) struct Modal {
    pub(super) kind: ModalKind,
    pub(super) title: String,
    pub(super) lines: Vec<String>,
    pub(super) scroll: usize,
    pub(super) input: Input,
}

impl Modal {
    fn new(kind: ModalKind, title: impl Into<String>, lines: Vec<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            lines,
            scroll: 0,
            input: Input::default(),
        }
    }

    pub(super) fn viewer(title: impl Into<String>, lines: Vec<String>) -> Self {
        Self::new(ModalKind::Viewer, title, lines)
    }

    pub(super) fn confirm(confirm: Confirm) -> Self {
        let lines = vec![confirm.prompt(), String::new(), "y = yes   n = no".to_string()];
        Self::new(ModalKind::Confirm(confirm), "Confirm", lines)
    }

    pub(super) fn tree_search() -> Self {
        Self::new(ModalKind::TreeSearch, "Search nodes", Vec::new())
    }

    pub(super) fn content_search(kind: ArtifactKind) -> Self {
        Self::new(
            ModalKind::ContentSearch(kind),
            format!("Search {}", kind),
            Vec::new(),
        )
    }

    pub(super) fn variables() -> Self {
        Self::new(ModalKind::Variables { selected: 0 }, "Variables", Vec::new())
    }

    fn is_search(&self) -> bool {
        matches!(self.kind, ModalKind::TreeSearch | ModalKind::ContentSearch(_))
    }
}

fn centered(area: Rect, max_w: u16, max_h: u16) -> Rect {
    let w = area.width.saturating_sub(6).clamp(20, max_w).min(area.width);
    let h = area.height.saturating_sub(6).clamp(5, max_h).min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

fn variable_lines(set: Option<&VariableSet>, selected: usize) -> Vec<Line<'static>> {
    let Some(set) = set else {
        return vec![Line::from(Span::styled(
            "loading...",
            Style::default().fg(Color::Gray),
        ))];
    };
    let mut lines = vec![Line::from(Span::styled(
        format!("Node: {}", set.path()),
        Style::default().fg(Color::Cyan),
    ))];
    let mut inherited_header = false;
    for (i, entry) in set.entries().enumerate() {
        if entry.origin == Origin::Inherited && !inherited_header {
            inherited_header = true;
            lines.push(Line::from(Span::styled(
                "Inherited:",
                Style::default().fg(Color::Gray),
            )));
        }
        let text = match entry.origin {
            Origin::Own => format!("  {} = {}", entry.name, entry.value),
            Origin::Inherited => {
                format!("  {} = {}  (from {})", entry.name, entry.value, entry.source)
            }
        };
        let mut style = match entry.origin {
            Origin::Own => Style::default().fg(Color::White),
            Origin::Inherited => Style::default().fg(Color::DarkGray),
        };
        if i == selected {
            style = style.add_modifier(Modifier::REVERSED);
        }
        lines.push(Line::from(Span::styled(text, style)));
    }
    if set.is_empty() {
        lines.push(Line::from("  (no variables)"));
    }
    lines
}

pub(super) fn draw_modal(frame: &mut ratatui::Frame, modal: &Modal, app: &App) {
    let area = frame.area();

    if modal.is_search() {
        let box_area = Rect {
            x: area.x,
            y: area.y + area.height.saturating_sub(4),
            width: area.width,
            height: area.height.min(3),
        };
        frame.render_widget(Clear, box_area);
        let prompt = "> ";
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(prompt, Style::default().fg(Color::Yellow)),
                Span::raw(modal.input.buf.as_str()),
            ]))
            .block(Block::default().borders(Borders::ALL).title(modal.title.as_str())),
            box_area,
        );
        let x = (prompt.len() + modal.input.cursor) as u16;
        frame.set_cursor_position((box_area.x + 1 + x, box_area.y + 1));
        return;
    }

    let box_area = centered(area, 90, 22);
    frame.render_widget(Clear, box_area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(modal.title.as_str());
    frame.render_widget(block.clone(), box_area);
    let inner = block.inner(box_area);

    match &modal.kind {
        ModalKind::Viewer | ModalKind::Confirm(_) => {
            let lines: Vec<Line> = modal.lines.iter().map(|s| Line::from(s.as_str())).collect();
            let scroll = modal.scroll.min(modal.lines.len().saturating_sub(1)) as u16;
            frame.render_widget(
                Paragraph::new(lines)
                    .wrap(Wrap { trim: false })
                    .scroll((scroll, 0)),
                inner,
            );
        }
        ModalKind::Variables { selected } => {
            let parts = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)])
                .split(inner);
            let lines = variable_lines(app.monitor.dashboard().variables(), *selected);
            frame.render_widget(Paragraph::new(lines), parts[0]);

            let prompt = "name=value: ";
            frame.render_widget(
                Paragraph::new(Line::from(vec![
                    Span::styled(prompt, Style::default().fg(Color::Yellow)),
                    Span::raw(modal.input.buf.as_str()),
                ]))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Enter: set  Del: delete  Esc: close"),
                ),
                parts[1],
            );
            let x = (prompt.len() + modal.input.cursor) as u16;
            frame.set_cursor_position((parts[1].x + 1 + x, parts[1].y + 1));
        }
        ModalKind::TreeSearch | ModalKind::ContentSearch(_) => {}
    }
}

pub(super) fn handle_modal_key(app: &mut App, key: KeyEvent) {
    enum ModalAction {
        None,
        Close,
        Confirm(bool),
        SearchTyped(String),
        SearchSubmit(String),
        ContentSearch(String),
        SubmitVariable(String),
        DeleteVariable(usize),
    }

    let var_count = app
        .monitor
        .dashboard()
        .variables()
        .map(|set| set.len())
        .unwrap_or(0);

    let action = {
        let Some(m) = app.modal.as_mut() else {
            return;
        };
        let tree_search = matches!(m.kind, ModalKind::TreeSearch);

        match &mut m.kind {
            ModalKind::Viewer => match key.code {
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => ModalAction::Close,
                KeyCode::Up => {
                    m.scroll = m.scroll.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::Down => {
                    if m.scroll < m.lines.len().saturating_sub(1) {
                        m.scroll += 1;
                    }
                    ModalAction::None
                }
                _ => ModalAction::None,
            },

            ModalKind::Confirm(_) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                    ModalAction::Confirm(true)
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    ModalAction::Confirm(false)
                }
                _ => ModalAction::None,
            },

            ModalKind::TreeSearch | ModalKind::ContentSearch(_) => {
                let tree = tree_search;
                match key.code {
                    KeyCode::Esc => ModalAction::Close,
                    KeyCode::Enter => {
                        let query = m.input.buf.clone();
                        m.input.push_history(&query);
                        if tree {
                            ModalAction::SearchSubmit(query)
                        } else {
                            ModalAction::ContentSearch(query)
                        }
                    }
                    KeyCode::Up => {
                        m.input.history_up();
                        ModalAction::None
                    }
                    KeyCode::Down => {
                        m.input.history_down();
                        ModalAction::None
                    }
                    KeyCode::Left => {
                        m.input.move_left();
                        ModalAction::None
                    }
                    KeyCode::Right => {
                        m.input.move_right();
                        ModalAction::None
                    }
                    KeyCode::Backspace | KeyCode::Delete | KeyCode::Char(_) => {
                        match key.code {
                            KeyCode::Backspace => m.input.backspace(),
                            KeyCode::Delete => m.input.delete(),
                            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                                m.input.insert_char(c)
                            }
                            _ => {}
                        }
                        if tree {
                            ModalAction::SearchTyped(m.input.buf.clone())
                        } else {
                            ModalAction::None
                        }
                    }
                    _ => ModalAction::None,
                }
            }

            ModalKind::Variables { selected } => match key.code {
                KeyCode::Esc => ModalAction::Close,
                KeyCode::Up => {
                    *selected = selected.saturating_sub(1);
                    ModalAction::None
                }
                KeyCode::Down => {
                    if *selected + 1 < var_count {
                        *selected += 1;
                    }
                    ModalAction::None
                }
                KeyCode::Enter => {
                    let value = m.input.buf.clone();
                    m.input.clear();
                    ModalAction::SubmitVariable(value)
                }
                KeyCode::Delete if m.input.buf.is_empty() => ModalAction::DeleteVariable(*selected),
                KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                    ModalAction::DeleteVariable(*selected)
                }
                KeyCode::Backspace => {
                    m.input.backspace();
                    ModalAction::None
                }
                KeyCode::Delete => {
                    m.input.delete();
                    ModalAction::None
                }
                KeyCode::Left => {
                    m.input.move_left();
                    ModalAction::None
                }
                KeyCode::Right => {
                    m.input.move_right();
                    ModalAction::None
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    m.input.insert_char(c);
                    ModalAction::None
                }
                _ => ModalAction::None,
            },
        }
    };

    match action {
        ModalAction::None => {}
        ModalAction::Close => {
            if matches!(
                app.modal.as_ref().map(|m| &m.kind),
                Some(ModalKind::Variables { .. })
            ) {
                app.monitor.close_variables();
            }
            app.modal = None;
        }
        ModalAction::Confirm(accepted) => {
            app.modal = None;
            app.monitor.resolve_confirm(accepted);
        }
        ModalAction::SearchTyped(query) => {
            app.monitor.search_typed(&query);
        }
        ModalAction::SearchSubmit(query) => {
            app.monitor.search_submit(&query);
        }
        ModalAction::ContentSearch(query) => {
            app.monitor.search_content(&query);
            app.modal = None;
        }
        ModalAction::SubmitVariable(input) => {
            app.monitor.submit_variable(&input);
        }
        ModalAction::DeleteVariable(idx) => {
            let name = app
                .monitor
                .dashboard()
                .variables()
                .and_then(|set| set.entries().nth(idx))
                .map(|entry| entry.name.clone());
            if let Some(name) = name {
                app.monitor.delete_variable(&name);
            }
        }
    }
}
