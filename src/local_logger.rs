use std::env;
use std::io::Write;

use crate::prelude::*;
use console::Style;
use log::Log;
use simplelog::{CombinedLogger, SharedLogger};

/// Environment variable holding the log level filter.
pub const LOG_LEVEL_ENV: &str = "BM_LOG";

pub struct LocalLogger {
    log_level: log::LevelFilter,
}

impl LocalLogger {
    pub fn new() -> Self {
        let log_level = env::var(LOG_LEVEL_ENV)
            .ok()
            .and_then(|log_level| log_level.parse::<log::LevelFilter>().ok())
            .unwrap_or(log::LevelFilter::Info);

        LocalLogger { log_level }
    }
}

impl Default for LocalLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl Log for LocalLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.log_level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        print_record(record);
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

/// Print a log record to the console with the appropriate style
fn print_record(record: &log::Record) {
    let error_style = Style::new().red();
    let info_style = Style::new().white();
    let warn_style = Style::new().yellow();
    let debug_style = Style::new().blue().dim();
    let trace_style = Style::new().black().dim();

    match record.level() {
        log::Level::Error => eprintln!("{}", error_style.apply_to(record.args())),
        log::Level::Warn => eprintln!("{}", warn_style.apply_to(record.args())),
        // Info goes to stderr as well, stdout only carries the generated commands
        log::Level::Info => eprintln!("{}", info_style.apply_to(record.args())),
        log::Level::Debug => eprintln!(
            "{}",
            debug_style.apply_to(format!("[DEBUG::{}] {}", record.target(), record.args())),
        ),
        log::Level::Trace => eprintln!(
            "{}",
            trace_style.apply_to(format!("[TRACE::{}] {}", record.target(), record.args()))
        ),
    }
}

impl SharedLogger for LocalLogger {
    fn level(&self) -> log::LevelFilter {
        self.log_level
    }

    fn config(&self) -> Option<&simplelog::Config> {
        None
    }

    fn as_log(self: Box<Self>) -> Box<dyn Log> {
        Box::new(*self)
    }
}

pub fn get_local_logger() -> Box<dyn SharedLogger> {
    Box::new(LocalLogger::new())
}

pub fn init_local_logger() -> Result<()> {
    let logger = get_local_logger();
    CombinedLogger::init(vec![logger])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use temp_env::with_var;

    use super::*;

    #[test]
    fn test_log_level_from_env() {
        with_var(LOG_LEVEL_ENV, Some("debug"), || {
            let logger = LocalLogger::new();
            assert_eq!(logger.level(), log::LevelFilter::Debug);
            assert!(logger.enabled(&log::Metadata::builder().level(log::Level::Debug).build()));
            assert!(!logger.enabled(&log::Metadata::builder().level(log::Level::Trace).build()));
        });
    }

    #[test]
    fn test_log_level_defaults_to_info() {
        with_var(LOG_LEVEL_ENV, Some("not-a-level"), || {
            assert_eq!(LocalLogger::new().level(), log::LevelFilter::Info);
        });
    }
}
