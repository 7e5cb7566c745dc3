use std::process::Command;

use anyhow::{Context, Result};

fn flowtop(args: &[&str]) -> Result<std::process::Output> {
    Command::new(env!("CARGO_BIN_EXE_flowtop"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .context("run flowtop")
}

#[test]
fn dump_demo_tree_as_json_with_filter() -> Result<()> {
    let out = flowtop(&["--demo", "dump", "--json", "--filter", "aborted"])?;
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let rows: serde_json::Value = serde_json::from_slice(&out.stdout).context("parse dump")?;
    let paths: Vec<&str> = rows
        .as_array()
        .context("rows")?
        .iter()
        .filter_map(|r| r["path"].as_str())
        .collect();
    assert_eq!(paths, vec!["/forecast", "/forecast/products", "/forecast/products/plots"]);
    assert_eq!(rows[2]["state"], "aborted");
    assert_eq!(rows[2]["depth"], 3);
    Ok(())
}

#[test]
fn dump_plain_text_lists_every_node() -> Result<()> {
    let out = flowtop(&["--demo", "dump"])?;
    assert!(out.status.success());
    let text = String::from_utf8(out.stdout)?;
    assert!(text.starts_with("demo  RUNNING  filter=all"));
    assert!(text.contains("run_model  [active]"));
    assert!(text.contains("rotate_logs  [unknown]"));
    Ok(())
}

#[test]
fn dump_rejects_unknown_filter() -> Result<()> {
    let out = flowtop(&["--demo", "dump", "--filter", "broken"])?;
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("unknown node state 'broken'"));
    Ok(())
}

#[test]
fn dump_fails_cleanly_when_server_is_down() -> Result<()> {
    let out = flowtop(&["--host", "127.0.0.1", "--port", "1", "dump", "--timeout-secs", "10"])?;
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("Connection Failed"));
    Ok(())
}
