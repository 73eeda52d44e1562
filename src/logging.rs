//! Logger setup for the `log` facade, backed by `env_logger`.

use std::sync::Once;

/// `env_filter` uses the `env_logger` filter syntax, e.g.
/// `"info"` or `"genesis_v=debug,wgpu=warn"`.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub env_filter: Option<String>,
    pub write_style: env_logger::WriteStyle,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            env_filter: None,
            write_style: env_logger::WriteStyle::Auto,
        }
    }
}

static INIT: Once = Once::new();

/// Installs the global logger. Only the first call has an effect.
///
/// The filter comes from the config, then `RUST_LOG`, then defaults to
/// `info`. A logger installed by someone else is reported and kept.
pub fn init(config: LoggingConfig) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match config.env_filter.or_else(|| std::env::var("RUST_LOG").ok()) {
            Some(filter) => {
                builder.parse_filters(&filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }
        builder.write_style(config.write_style);

        if let Err(e) = builder.try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
            return;
        }
        log::debug!("logging initialized");
    });
}
