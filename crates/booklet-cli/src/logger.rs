use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record};
use std::io::Write;

/// Writes log records to stderr, one timestamped line each
pub struct CliLogger {
    level: LevelFilter,
}

impl CliLogger {
    pub fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    /// Level from the `-v` count and `-q` flag
    pub fn level_for(verbose: u8, quiet: bool) -> LevelFilter {
        if quiet {
            return LevelFilter::Error;
        }
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn init(self) -> Result<(), log::SetLoggerError> {
        let level = self.level;
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format(record: &Record) -> String {
        let timestamp = Local::now().format("%H:%M:%S%.3f");
        match record.level() {
            Level::Info => format!("{} {}", timestamp, record.args()),
            level => format!(
                "{} {:<5} {}: {}",
                timestamp,
                level,
                record.target(),
                record.args()
            ),
        }
    }
}

impl log::Log for CliLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // Nothing sensible to do if stderr is gone
            let _ = writeln!(std::io::stderr().lock(), "{}", Self::format(record));
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_selection() {
        assert_eq!(CliLogger::level_for(0, false), LevelFilter::Info);
        assert_eq!(CliLogger::level_for(1, false), LevelFilter::Debug);
        assert_eq!(CliLogger::level_for(3, false), LevelFilter::Trace);
        assert_eq!(CliLogger::level_for(2, true), LevelFilter::Error);
    }

    #[test]
    fn test_enabled_respects_level() {
        use log::Log;
        let logger = CliLogger::new(LevelFilter::Info);
        let debug = Metadata::builder().level(Level::Debug).build();
        let warn = Metadata::builder().level(Level::Warn).build();
        assert!(!logger.enabled(&debug));
        assert!(logger.enabled(&warn));
    }
}
