use anyhow::Result;

use crate::model::ClientConfig;
use crate::remote::SharedClient;

pub struct TuiRunOptions {
    pub client: SharedClient,
    pub config: ClientConfig,
}

pub fn run(opts: TuiRunOptions) -> Result<()> {
    crate::tui_shell::run(opts)
}
