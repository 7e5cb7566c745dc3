use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use flowtop::model::ClientConfig;
use flowtop::remote::WorkflowSeed;

pub struct ServerGuard {
    pub base_url: String,
    pub host: String,
    pub port: u16,
    _data_dir: tempfile::TempDir,
    child: Child,
}

impl ServerGuard {
    #[allow(dead_code)]
    pub fn config(&self) -> ClientConfig {
        ClientConfig::default().with_overrides(Some(self.host.clone()), Some(self.port), Some(1))
    }
}

impl Drop for ServerGuard {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Dev server seeded with the built-in demo workflow.
#[allow(dead_code)]
pub fn spawn_server() -> Result<ServerGuard> {
    spawn_server_with(None, 0)
}

#[allow(dead_code)]
/// Dev server with an optional seed and log growth every `grow_logs_ms`.
pub fn spawn_server_with(seed: Option<&WorkflowSeed>, grow_logs_ms: u64) -> Result<ServerGuard> {
    let data_dir = tempfile::tempdir().context("create server tempdir")?;
    let addr_file = data_dir.path().join("addr.txt");
    let grow = grow_logs_ms.to_string();

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_flowtop-server"));
    cmd.args([
        "--addr",
        "127.0.0.1:0",
        "--addr-file",
        addr_file.to_str().unwrap(),
        "--grow-logs-ms",
        &grow,
    ]);
    if let Some(seed) = seed {
        let defs = data_dir.path().join("defs.json");
        std::fs::write(&defs, serde_json::to_vec(seed)?).context("write seed")?;
        cmd.arg("--defs").arg(&defs);
    }
    let child = cmd
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .context("spawn flowtop-server")?;

    let addr = read_addr_file(&addr_file)?;
    let (host, port) = addr.rsplit_once(':').context("addr has no port")?;
    let port: u16 = port.parse().context("parse port")?;
    let base_url = format!("http://{}", addr);
    wait_for_healthz(&base_url)?;

    Ok(ServerGuard {
        base_url,
        host: host.to_string(),
        port,
        _data_dir: data_dir,
        child,
    })
}

fn read_addr_file(addr_file: &Path) -> Result<String> {
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("addr file not written at {}", addr_file.display());
        }

        if let Ok(s) = std::fs::read_to_string(addr_file) {
            let s = s.trim();
            if !s.is_empty() {
                return Ok(s.to_string());
            }
        }
        thread::sleep(Duration::from_millis(10));
    }
}

pub fn wait_for_healthz(base_url: &str) -> Result<()> {
    let client = reqwest::blocking::Client::new();
    let start = Instant::now();
    loop {
        if start.elapsed() > Duration::from_secs(5) {
            anyhow::bail!("server did not become healthy at {}/healthz", base_url);
        }
        match client.get(format!("{}/healthz", base_url)).send() {
            Ok(resp) if resp.status().is_success() => return Ok(()),
            _ => {
                thread::sleep(Duration::from_millis(50));
            }
        }
    }
}
