use anyhow::Result;

mod app;
mod input;
mod modal;
mod view;

use app::App;
use modal::Modal;
use view::render_view_chrome;

pub fn run(opts: crate::tui::TuiRunOptions) -> Result<()> {
    app::run(opts)
}
