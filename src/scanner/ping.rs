//! Ping-based probers.
//!
//! Reachability is checked by running the operating system's `ping` binary,
//! one short-lived process per attempt. The command line and the output
//! parsing differ between OS families, so each family is a [`PingFamily`]
//! strategy plugged into the shared [`PingProber`] retry loop.
//!
//! A probe succeeds only when the output carries the family's reply marker
//! *and* the process exits successfully. Partial or garbled output with a
//! zero exit code is not a reply.

use crate::config::ProbeSettings;
use crate::scanner::traits::{ProbeOutcome, ProbeReason, Prober, ReplyMarker, SharedProber};
use async_trait::async_trait;
use regex::Regex;
use std::process::Stdio;
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::{sleep, timeout};
use tracing::debug;

/// Command construction and output parsing for one OS family.
pub trait PingFamily: Send + Sync + 'static {
    /// Build the command for a single echo request.
    fn command(&self, address: &str, timeout: Duration) -> Command;

    /// Marker reported on success.
    fn marker(&self) -> ReplyMarker;

    /// Whether stdout shows a reply from the host.
    fn is_reply(&self, stdout: &str) -> bool;

    /// Extract the round-trip time in milliseconds.
    fn parse_latency(&self, stdout: &str) -> Option<f64>;
}

/// `ping` from iputils (Linux) and the BSD family, including macOS.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnixPing;

/// Windows `ping.exe`, whose output labels are localized.
#[derive(Debug, Clone, Copy, Default)]
pub struct WindowsPing;

impl UnixPing {
    /// `-W` argument: milliseconds on macOS and FreeBSD, whole seconds elsewhere.
    fn wait_arg(timeout: Duration) -> String {
        if cfg!(any(target_os = "macos", target_os = "freebsd")) {
            timeout.as_millis().max(1).to_string()
        } else {
            timeout.as_millis().div_ceil(1000).max(1).to_string()
        }
    }
}

impl PingFamily for UnixPing {
    fn command(&self, address: &str, timeout: Duration) -> Command {
        let mut cmd = Command::new("ping");
        cmd.args(["-c", "1", "-W"])
            .arg(Self::wait_arg(timeout))
            .arg(address);
        cmd
    }

    fn marker(&self) -> ReplyMarker {
        ReplyMarker::BytesFrom
    }

    fn is_reply(&self, stdout: &str) -> bool {
        let lower = stdout.to_lowercase();
        lower.contains("bytes from") || lower.contains("time=")
    }

    fn parse_latency(&self, stdout: &str) -> Option<f64> {
        capture_number(unix_time_re(), stdout)
    }
}

impl PingFamily for WindowsPing {
    fn command(&self, address: &str, timeout: Duration) -> Command {
        let mut cmd = Command::new("ping");
        cmd.args(["-n", "1", "-w"])
            .arg(timeout.as_millis().to_string())
            .arg(address);
        #[cfg(windows)]
        {
            const CREATE_NO_WINDOW: u32 = 0x0800_0000;
            cmd.creation_flags(CREATE_NO_WINDOW);
        }
        cmd
    }

    fn marker(&self) -> ReplyMarker {
        ReplyMarker::Ttl
    }

    fn is_reply(&self, stdout: &str) -> bool {
        stdout.to_uppercase().contains("TTL=")
    }

    fn parse_latency(&self, stdout: &str) -> Option<f64> {
        capture_number(windows_average_re(), stdout)
            .or_else(|| capture_number(windows_time_re(), stdout))
    }
}

fn unix_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)time[=<]\s*([\d.]+)\s*ms").expect("valid regex"))
}

fn windows_average_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:average|promedio|media|mittelwert|moyenne)\s*=\s*(\d+)\s*ms")
            .expect("valid regex")
    })
}

fn windows_time_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(?:time|tiempo|zeit|temps)\s*[=<]\s*(\d+)\s*ms").expect("valid regex")
    })
}

fn capture_number(re: &Regex, text: &str) -> Option<f64> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// A prober that shells out to `ping`, retrying with backoff.
#[derive(Debug, Clone)]
pub struct PingProber<F> {
    family: F,
    settings: ProbeSettings,
}

/// Prober for Unix-like hosts.
pub type UnixPingProber = PingProber<UnixPing>;

/// Prober for Windows hosts.
pub type WindowsPingProber = PingProber<WindowsPing>;

impl<F: PingFamily> PingProber<F> {
    /// Create a prober for the given family.
    pub fn new(family: F, settings: ProbeSettings) -> Self {
        Self { family, settings }
    }

    /// Run one attempt. `Err` carries the reason the attempt failed.
    async fn attempt(&self, address: &str) -> Result<ProbeOutcome, ProbeReason> {
        let mut cmd = self.family.command(address, self.settings.attempt_timeout);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let child = cmd.spawn().map_err(|e| ProbeReason::Error(e.to_string()))?;

        // Dropping the wait future on timeout drops the child, which kills it.
        let output = match timeout(self.settings.hard_timeout(), child.wait_with_output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return Err(ProbeReason::Error(e.to_string())),
            Err(_) => return Err(ProbeReason::Timeout),
        };

        let stdout = String::from_utf8_lossy(&output.stdout);
        if output.status.success() && self.family.is_reply(&stdout) {
            Ok(ProbeOutcome::reachable(
                self.family.parse_latency(&stdout),
                self.family.marker(),
            ))
        } else {
            Err(ProbeReason::Failed {
                exit_code: output.status.code(),
            })
        }
    }
}

#[async_trait]
impl<F: PingFamily> Prober for PingProber<F> {
    async fn probe(&self, address: &str) -> ProbeOutcome {
        let mut last_reason = ProbeReason::NoAttempt;

        for attempt in 0..self.settings.retries {
            match self.attempt(address).await {
                Ok(outcome) => return outcome,
                Err(reason) => {
                    debug!(address, attempt, %reason, "probe attempt failed");
                    last_reason = reason;
                }
            }

            if attempt + 1 < self.settings.retries {
                sleep(self.settings.backoff(attempt)).await;
            }
        }

        ProbeOutcome::unreachable(last_reason)
    }
}

/// Build the prober matching the host operating system.
pub fn system_prober(settings: ProbeSettings) -> SharedProber {
    if cfg!(windows) {
        Arc::new(WindowsPingProber::new(WindowsPing, settings))
    } else {
        Arc::new(UnixPingProber::new(UnixPing, settings))
    }
}
