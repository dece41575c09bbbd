//! Tracing subscriber setup.
//!
//! Logs always go to stderr so stdout carries only the report or the JSON
//! envelope. `RUST_LOG` overrides the level chosen from the CLI flags and
//! `VIGIL_LOG_FORMAT=json` switches to JSON lines.

use std::env::var;
use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt, Layer};

/// Pick the default level from the global CLI flags.
pub fn level_for(verbose: bool, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::WARN
    } else if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    }
}

/// Install the global subscriber.
pub fn init(level: LevelFilter) {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let log_layer = match var("VIGIL_LOG_FORMAT").unwrap_or_default().as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_filter(env_filter)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .compact()
            .with_writer(io::stderr)
            .with_target(false)
            .with_filter(env_filter)
            .boxed(),
    };

    tracing_subscriber::registry().with(log_layer).init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_for_flags() {
        assert_eq!(level_for(false, false), LevelFilter::INFO);
        assert_eq!(level_for(true, false), LevelFilter::DEBUG);
        assert_eq!(level_for(true, true), LevelFilter::WARN);
    }
}
