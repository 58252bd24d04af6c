use anyhow::Result;
use plumb_core::tracing::{InstrumentationConfig, init_tracing};
use std::fs::OpenOptions;
use std::path::Path;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file name inside the data directory
const LOG_FILE: &str = "cli.log";

/// Initialize logging for the CLI
///
/// Events go to stderr and, unless disabled, to `cli.log` in the data
/// directory. `RUST_LOG` overrides `log_level`.
pub fn init_logging(log_level: Level, data_dir: &Path, no_file_log: bool) -> Result<()> {
    if no_file_log {
        let mut config = InstrumentationConfig::from_env();
        config.service_name = "plumb-cli".to_string();
        if std::env::var_os("RUST_LOG").is_none() {
            config.log_level = default_directives(log_level);
        }
        init_tracing(&config)
    } else {
        init_file_logging(log_level, data_dir)
    }
}

fn default_directives(level: Level) -> String {
    let level_str = level.as_str().to_lowercase();
    format!("plumb={level_str},plumb_http={level_str},plumb_core={level_str}")
}

fn init_file_logging(level: Level, data_dir: &Path) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(level).into());

    std::fs::create_dir_all(data_dir)?;
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(data_dir.join(LOG_FILE))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file)
                .with_ansi(false),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(true),
        )
        .try_init()?;

    Ok(())
}
