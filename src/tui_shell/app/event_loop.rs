use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::remote::{ArtifactKind, CommandVerb};

use super::super::Modal;
use super::super::modal;
use super::App;
use super::runtime::{Term, with_terminal_released};

pub(super) fn run_loop(terminal: &mut Term, app: &mut App) -> Result<()> {
    loop {
        let now = Instant::now();
        app.on_tick(now);

        if let Some(edit) = app.monitor.take_pending_edit() {
            tracing::debug!(path = %edit.path, "handing terminal to editor");
            let monitor = &mut app.monitor;
            with_terminal_released(terminal, || monitor.run_editor(edit))?;
        }

        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k, now),
                _ => {}
            }
        }
    }
}

fn step_view(current: ArtifactKind, forward: bool) -> ArtifactKind {
    let n = ArtifactKind::ALL.len();
    let idx = current.index();
    let next = if forward { (idx + 1) % n } else { (idx + n - 1) % n };
    ArtifactKind::ALL[next]
}

pub(super) fn handle_key(app: &mut App, key: KeyEvent, now: Instant) {
    if app.modal.is_some() {
        modal::handle_modal_key(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.quit = true;
        }
        KeyCode::Char('q') | KeyCode::Esc => {
            app.quit = true;
        }

        KeyCode::Char('r') => app.monitor.refresh(),
        KeyCode::Char('l') => {
            app.content_scroll = 0;
            app.monitor.load_node();
        }
        KeyCode::Char('s') => app.monitor.command(CommandVerb::Suspend),
        KeyCode::Char('u') => app.monitor.command(CommandVerb::Resume),
        KeyCode::Char('k') => app.monitor.command(CommandVerb::Kill),
        KeyCode::Char('f') => app.monitor.command(CommandVerb::ForceComplete),
        KeyCode::Char('R') => app.monitor.ask_requeue(),
        KeyCode::Char('F') => app.monitor.cycle_filter(),
        KeyCode::Char('t') => app.monitor.toggle_live(now),
        KeyCode::Char('e') => app.monitor.begin_edit_script(),

        KeyCode::Char('/') => app.modal = Some(Modal::tree_search()),
        KeyCode::Char('c') => {
            let kind = app.monitor.dashboard().active_view();
            app.modal = Some(Modal::content_search(kind));
        }
        KeyCode::Char('w') => {
            if let Some(report) = app.monitor.why() {
                app.modal = Some(Modal::viewer(format!("Why: {}", report.path), report.lines()));
            }
        }
        KeyCode::Char('v') => {
            app.monitor.open_variables();
            if app.monitor.dashboard().selected_path().is_some() {
                app.modal = Some(Modal::variables());
            }
        }

        KeyCode::Tab | KeyCode::BackTab => {
            let current = app.monitor.dashboard().active_view();
            app.monitor
                .set_active_view(step_view(current, key.code == KeyCode::Tab));
            app.content_scroll = 0;
        }
        KeyCode::Char(c @ '1'..='3') => {
            let idx = c as usize - '1' as usize;
            app.monitor.set_active_view(ArtifactKind::ALL[idx]);
            app.content_scroll = 0;
        }

        KeyCode::Up => app.monitor.move_up(),
        KeyCode::Down => app.monitor.move_down(),
        KeyCode::Left | KeyCode::Right | KeyCode::Enter | KeyCode::Char(' ') => {
            app.monitor.toggle_collapse()
        }
        KeyCode::PageUp => app.content_scroll = app.content_scroll.saturating_sub(10),
        KeyCode::PageDown => app.content_scroll = app.content_scroll.saturating_add(10),

        _ => {}
    }
}

#[cfg(test)]
#[path = "../../tests/tui_shell/event_loop_tests.rs"]
mod tests;
