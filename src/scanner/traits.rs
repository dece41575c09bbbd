//! Prober trait abstraction.
//!
//! Defines the reachability contract shared by the OS-specific ping probers
//! and by test stubs.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a probe ended the way it did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum ProbeReason {
    /// A reply marker was found and the command exited successfully.
    Reply(ReplyMarker),
    /// The command ran but did not report a reply.
    Failed { exit_code: Option<i32> },
    /// The attempt exceeded its hard deadline and was killed.
    Timeout,
    /// The command could not be run.
    Error(String),
    /// The address is out of scope and was never probed.
    Excluded,
    /// No attempt was made (zero retries configured).
    NoAttempt,
}

/// Which success marker matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyMarker {
    /// Windows `TTL=` marker.
    Ttl,
    /// Unix `bytes from` / `time=` marker.
    BytesFrom,
}

impl fmt::Display for ProbeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reply(ReplyMarker::Ttl) => write!(f, "ttl_ok"),
            Self::Reply(ReplyMarker::BytesFrom) => write!(f, "bytesfrom_ok"),
            Self::Failed {
                exit_code: Some(code),
            } => write!(f, "fail_rc={}", code),
            Self::Failed { exit_code: None } => write!(f, "fail_rc=signal"),
            Self::Timeout => write!(f, "timeout"),
            Self::Error(msg) => write!(f, "error:{}", msg),
            Self::Excluded => write!(f, "excluded"),
            Self::NoAttempt => write!(f, "no_attempt"),
        }
    }
}

/// Result of probing one address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeOutcome {
    /// Whether the host answered.
    pub reachable: bool,
    /// Round-trip time, when the probe output reported one.
    pub latency_ms: Option<f64>,
    /// Diagnostic for the final attempt.
    pub reason: ProbeReason,
}

impl ProbeOutcome {
    /// A successful probe.
    pub fn reachable(latency_ms: Option<f64>, marker: ReplyMarker) -> Self {
        Self {
            reachable: true,
            latency_ms,
            reason: ProbeReason::Reply(marker),
        }
    }

    /// A failed probe.
    pub fn unreachable(reason: ProbeReason) -> Self {
        Self {
            reachable: false,
            latency_ms: None,
            reason,
        }
    }
}

/// Trait for reachability probers.
///
/// Implementations must not fail: every outcome, including spawn errors and
/// timeouts, is reported through [`ProbeOutcome`].
///
/// # Example
///
/// ```ignore
/// use vigil::scanner::{Prober, ProbeOutcome};
///
/// async fn check<P: Prober>(prober: &P) -> bool {
///     prober.probe("10.1.1.1").await.reachable
/// }
/// ```
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a single address.
    async fn probe(&self, address: &str) -> ProbeOutcome;
}

/// A shared prober for dynamic dispatch across worker tasks.
pub type SharedProber = std::sync::Arc<dyn Prober>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_reason_display() {
        assert_eq!(ProbeReason::Reply(ReplyMarker::Ttl).to_string(), "ttl_ok");
        assert_eq!(
            ProbeReason::Reply(ReplyMarker::BytesFrom).to_string(),
            "bytesfrom_ok"
        );
        assert_eq!(
            ProbeReason::Failed { exit_code: Some(1) }.to_string(),
            "fail_rc=1"
        );
        assert_eq!(ProbeReason::Timeout.to_string(), "timeout");
        assert_eq!(
            ProbeReason::Error("not found".into()).to_string(),
            "error:not found"
        );
    }

    #[test]
    fn test_probe_outcome_constructors() {
        let up = ProbeOutcome::reachable(Some(12.0), ReplyMarker::BytesFrom);
        assert!(up.reachable);
        assert_eq!(up.latency_ms, Some(12.0));

        let down = ProbeOutcome::unreachable(ProbeReason::Timeout);
        assert!(!down.reachable);
        assert_eq!(down.latency_ms, None);
    }
}
