//! Logging backend for the standard `log` crate
//!
//! Library code only uses the `log` macros (`debug!`, `info!`, `warn!`, ...).
//! Binaries call [`init_logging`] once at startup to install a stderr logger
//! configured from [`LoggingConfig`].
//!
//! ```rust,no_run
//! use vacina_core::config::LoggingConfig;
//!
//! vacina_core::logging::init_logging(&LoggingConfig::default()).unwrap();
//! log::info!("listing {}", "vacinas");
//! ```

pub mod formatter;

pub use crate::config::LoggingConfig;
pub use formatter::{LogEntry, LogFormat};

use std::io::Write;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initialize the logging system
///
/// Safe to call multiple times; only the first call installs a logger.
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<()> {
    config.validate()?;
    let level = level_filter(&config.level);
    let format = LogFormat::parse(&config.format).unwrap_or(LogFormat::Human);

    let mut result = Ok(());
    INIT.call_once(|| {
        result = log::set_boxed_logger(Box::new(StderrLogger { level, format }))
            .map(|()| log::set_max_level(level))
            .map_err(anyhow::Error::from);
    });
    result
}

fn level_filter(level: &str) -> log::LevelFilter {
    level.parse().unwrap_or(log::LevelFilter::Info)
}

struct StderrLogger {
    level: log::LevelFilter,
    format: LogFormat,
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let entry = LogEntry::from_log_record(record);
        let line = self.format.format_entry(&entry);
        let _ = writeln!(std::io::stderr().lock(), "{}", line);
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}
