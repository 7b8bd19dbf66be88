//! Logger installation for the injected runtime.
//!
//! The core logs through `tracing` with its `log` bridge, so an `env_logger`
//! backend receives every event without a tracing subscriber.

use std::fs::OpenOptions;

use anyhow::Context;
use textproxy_core::{LogLevel, ProxyConfig};

pub fn level_filter(level: LogLevel) -> log::LevelFilter {
    match level {
        LogLevel::Off => log::LevelFilter::Off,
        LogLevel::Error => log::LevelFilter::Error,
        LogLevel::Warn => log::LevelFilter::Warn,
        LogLevel::Info => log::LevelFilter::Info,
        LogLevel::Debug => log::LevelFilter::Debug,
        LogLevel::Trace => log::LevelFilter::Trace,
    }
}

/// Install the logger described by `config`: its level, written to
/// `log_file` when set and stderr otherwise.
pub fn init(config: &ProxyConfig) -> anyhow::Result<()> {
    let level = level_filter(config.log_level);
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).format_timestamp_millis();

    if let Some(path) = &config.log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("opening log file {path}"))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // The host may initialise the proxy twice; the first logger stays.
    let _ = builder.try_init();
    log::set_max_level(level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_one_to_one() {
        assert_eq!(level_filter(LogLevel::Off), log::LevelFilter::Off);
        assert_eq!(level_filter(LogLevel::default()), log::LevelFilter::Warn);
        assert_eq!(level_filter(LogLevel::Trace), log::LevelFilter::Trace);
    }

    #[test]
    fn unwritable_log_file_is_reported() {
        let config = ProxyConfig {
            log_file: Some("/nonexistent-dir/vntextproxy.log".to_string()),
            ..ProxyConfig::default()
        };
        let err = init(&config).unwrap_err();
        assert!(err.to_string().contains("opening log file"));
    }
}
