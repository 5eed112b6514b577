//! Subscriber setup for the binaries. The library itself only emits
//! `tracing` events.

use std::env;
use std::sync::Once;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub const ENV_LOG_LEVEL: &str = "APPDECK_LOG";
const DEFAULT_LEVEL: Level = Level::WARN;

#[derive(Debug, Clone, Default)]
pub struct LogOptions {
    pub level: Option<String>,
    pub verbose: bool,
    pub quiet: bool,
}

impl LogOptions {
    /// Explicit level, then `-v`/`-q`, then `APPDECK_LOG`, then `warn`.
    pub fn resolve_level(&self) -> Level {
        if let Some(level) = &self.level {
            return parse_level(level);
        }
        if self.verbose {
            return Level::DEBUG;
        }
        if self.quiet {
            return Level::ERROR;
        }
        env::var(ENV_LOG_LEVEL)
            .map(|raw| parse_level(&raw))
            .unwrap_or(DEFAULT_LEVEL)
    }
}

/// Install the stderr subscriber once. `RUST_LOG`, when set, wins.
pub fn init(options: &LogOptions) {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let level = options.resolve_level();
        let filter = if env::var_os("RUST_LOG").is_some() {
            EnvFilter::from_default_env()
        } else {
            EnvFilter::new(format!("appdeck={level}"))
        };

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .try_init();
    });
}

pub fn parse_level(raw: &str) -> Level {
    match raw.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        other => {
            eprintln!(
                "Invalid log level '{other}', defaulting to {DEFAULT_LEVEL}. Valid levels: trace, debug, info, warn, error"
            );
            DEFAULT_LEVEL
        }
    }
}
