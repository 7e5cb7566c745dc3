use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;

use super::*;

#[derive(Parser)]
#[command(name = "flowtop-server")]
#[command(about = "In-memory workflow server for flowtop (development)", long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3141")]
    addr: SocketAddr,

    /// Write bound address to this file (dev/test convenience)
    #[arg(long)]
    addr_file: Option<PathBuf>,

    /// JSON seed with suites and files (built-in demo when absent)
    #[arg(long)]
    defs: Option<PathBuf>,

    /// Append a line to every active task's output at this interval; 0 disables
    #[arg(long, default_value_t = 0)]
    grow_logs_ms: u64,
}

fn load_seed(path: Option<&PathBuf>) -> Result<WorkflowSeed> {
    let Some(path) = path else {
        return Ok(demo_seed());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("read defs {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parse defs {}", path.display()))
}

pub(super) async fn run() -> Result<()> {
    let args = Args::parse();
    flowtop::logging::init_stderr_logging()?;

    let seed = load_seed(args.defs.as_ref())?;
    let workflow = MemoryWorkflow::new(seed).context("validate seed")?;
    let state = Arc::new(AppState {
        workflow: Arc::new(RwLock::new(workflow)),
    });

    if args.grow_logs_ms > 0 {
        spawn_log_growth(state.clone(), Duration::from_millis(args.grow_logs_ms));
    }

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .with_context(|| format!("bind {}", args.addr))?;
    let local_addr = listener.local_addr().context("read listener local addr")?;
    eprintln!("flowtop-server listening on {}", local_addr);

    if let Some(addr_file) = &args.addr_file {
        std::fs::write(addr_file, local_addr.to_string())
            .with_context(|| format!("write addr file {}", addr_file.display()))?;
    }

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn spawn_log_growth(state: Arc<AppState>, every: Duration) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        let mut tick = 0u64;
        loop {
            interval.tick().await;
            tick += 1;
            let grown = state.workflow.write().await.grow_active_logs(tick);
            tracing::trace!(tick, grown, "grew active logs");
        }
    });
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
