//! Host boot-time query.
//!
//! Lets a calling bot ask how long the monitoring host itself has been up.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

/// Boot-time lookup result, serialized as-is for callers.
#[derive(Debug, Clone, Serialize)]
pub struct UptimeInfo {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uptime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Local>,
    pub command: &'static str,
    pub system: &'static str,
}

/// Query the host boot time with the platform's tool.
pub async fn system_uptime() -> UptimeInfo {
    let (command, result) = if cfg!(windows) {
        ("systeminfo", windows_boot_time().await)
    } else {
        ("uptime -s", unix_boot_time().await)
    };

    let (uptime, error) = match result {
        Ok(value) => (Some(value), None),
        Err(e) => (None, Some(format!("{:#}", e))),
    };

    UptimeInfo {
        success: uptime.is_some(),
        uptime,
        error,
        timestamp: Local::now(),
        command,
        system: std::env::consts::OS,
    }
}

async fn run(program: &str, args: &[&str], limit: Duration) -> Result<String> {
    let output = timeout(
        limit,
        Command::new(program).args(args).kill_on_drop(true).output(),
    )
    .await
    .with_context(|| format!("{} timed out", program))?
    .with_context(|| format!("failed to run {}", program))?;

    if !output.status.success() {
        bail!("{} exited with {}", program, output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

async fn unix_boot_time() -> Result<String> {
    let out = run("uptime", &["-s"], Duration::from_secs(10)).await?;
    Ok(out.trim().to_string())
}

async fn windows_boot_time() -> Result<String> {
    let out = run("systeminfo", &[], Duration::from_secs(15)).await?;
    parse_boot_time_line(&out).context("no boot time line in systeminfo output")
}

/// Pick the boot time out of `systeminfo` output (English or Spanish).
fn parse_boot_time_line(output: &str) -> Option<String> {
    output
        .lines()
        .find(|line| line.contains("System Boot Time") || line.contains("Hora de inicio del sistema"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, value)| value.trim().to_string())
}
