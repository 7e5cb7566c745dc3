use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;

use flowtop::filter::StateFilter;
use flowtop::logging;
use flowtop::model::ClientConfig;
use flowtop::monitor::{Connection, Monitor};
use flowtop::remote::{HttpWorkflowClient, MemoryClient, SharedClient};
use flowtop::tui::{self, TuiRunOptions};

#[derive(Parser)]
#[command(name = "flowtop")]
#[command(about = "Terminal dashboard for a hierarchical workflow server", long_about = None)]
struct Cli {
    /// Server host (default: $FLOWTOP_HOST or localhost)
    #[arg(long, global = true)]
    host: Option<String>,
    /// Server port (default: $FLOWTOP_PORT or 3141)
    #[arg(long, global = true)]
    port: Option<u16>,
    /// Append logs here instead of the temp dir
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
    /// Seconds between live-tail fetches
    #[arg(long, global = true)]
    live_interval_secs: Option<u64>,
    /// Run against the built-in demo workflow instead of a server
    #[arg(long, global = true)]
    demo: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the (filtered) node tree and exit
    Dump {
        /// Only show nodes in this state, plus their ancestors
        #[arg(long)]
        filter: Option<String>,
        /// Emit JSON
        #[arg(long)]
        json: bool,
        /// Give up after this many seconds
        #[arg(long, default_value_t = 10)]
        timeout_secs: u64,
    },
}

#[derive(Serialize)]
struct DumpRow<'a> {
    path: &'a str,
    kind: &'a str,
    state: &'a str,
    depth: usize,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config =
        ClientConfig::from_env().with_overrides(cli.host, cli.port, cli.live_interval_secs);

    match cli.command {
        None => {
            let log_path = cli.log_file.unwrap_or_else(logging::default_log_path);
            logging::init_file_logging(&log_path)?;
            tracing::info!(endpoint = %config.endpoint(), demo = cli.demo, "starting dashboard");
            let client = build_client(&config, cli.demo)?;
            tui::run(TuiRunOptions { client, config })
        }
        Some(Commands::Dump {
            filter,
            json,
            timeout_secs,
        }) => {
            match cli.log_file {
                Some(path) => logging::init_file_logging(&path)?,
                None => logging::init_stderr_logging()?,
            }
            let client = build_client(&config, cli.demo)?;
            dump(
                client,
                &config,
                filter.as_deref(),
                json,
                Duration::from_secs(timeout_secs),
            )
        }
    }
}

fn build_client(config: &ClientConfig, demo: bool) -> Result<SharedClient> {
    if demo {
        let client = Arc::new(MemoryClient::demo().context("build demo workflow")?);
        spawn_demo_activity(client.clone(), config.live_interval);
        return Ok(client);
    }
    let client = HttpWorkflowClient::new(config).context("create http client")?;
    Ok(Arc::new(client))
}

/// Keep the demo's running tasks writing output so live tail has something
/// to follow.
fn spawn_demo_activity(client: Arc<MemoryClient>, every: Duration) {
    let spawned = std::thread::Builder::new()
        .name("flowtop-demo".to_string())
        .spawn(move || {
            for tick in 1u64.. {
                std::thread::sleep(every);
                let grown = client.workflow().grow_active_logs(tick);
                tracing::trace!(tick, grown, "demo logs grew");
            }
        });
    if let Err(err) = spawned {
        tracing::warn!(error = %err, "demo activity thread not started");
    }
}

fn dump(
    client: SharedClient,
    config: &ClientConfig,
    filter: Option<&str>,
    json: bool,
    timeout: Duration,
) -> Result<()> {
    let filter: StateFilter = filter
        .unwrap_or("all")
        .parse()
        .context("parse --filter")?;

    let mut monitor = Monitor::new(client, config);
    monitor.set_filter(filter);
    monitor.connect();
    if !monitor.wait_idle(timeout) {
        anyhow::bail!("timed out after {:?} waiting for {}", timeout, config.endpoint());
    }

    let dashboard = monitor.dashboard();
    let last_message = || {
        dashboard
            .last_notification()
            .map(|n| n.message.clone())
            .unwrap_or_else(|| "no response".to_string())
    };
    if dashboard.connection() != Connection::Connected || dashboard.tree_generation() == 0 {
        anyhow::bail!(last_message());
    }

    let rows = &dashboard.tree().rows()[1..];
    if json {
        let out: Vec<DumpRow> = rows
            .iter()
            .filter_map(|row| {
                Some(DumpRow {
                    path: row.path.as_ref()?.as_str(),
                    kind: row.kind?.as_str(),
                    state: row.state?.as_str(),
                    depth: row.depth,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&out).context("serialize tree")?);
        return Ok(());
    }

    let status = dashboard.status();
    println!(
        "{}  {}  filter={}",
        status.endpoint_label(),
        status.server_label(),
        filter
    );
    for row in rows {
        let state = row.state.map(|s| s.as_str()).unwrap_or("-");
        println!(
            "{}{}  [{}]",
            "  ".repeat(row.depth.saturating_sub(1)),
            row.label(),
            state
        );
    }
    Ok(())
}
