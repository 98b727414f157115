use std::fmt::Write as _;
use std::io::Write as _;
use std::sync::OnceLock;

use log::{LevelFilter, Log, Metadata, Record, SetLoggerError, set_logger, set_max_level};
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::LogMode;

pub struct StreamLog {
    level: LevelFilter,
    mode: LogMode,
}

impl StreamLog {
    pub fn init(log_level: LevelFilter, mode: LogMode) -> Result<(), SetLoggerError> {
        static LOGGER: OnceLock<StreamLog> = OnceLock::new();

        let logger = LOGGER.get_or_init(|| StreamLog {
            level: log_level,
            mode,
        });
        set_logger(logger)?;
        set_max_level(log_level);
        Ok(())
    }
}

impl Log for StreamLog {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record<'_>) {
        if self.enabled(record.metadata()) {
            let line = format_record(record, OffsetDateTime::now_utc());
            // A failed write to our own stream has nowhere left to be reported.
            let _ = match self.mode {
                LogMode::Stderr => writeln!(std::io::stderr().lock(), "{line}"),
                LogMode::Stdout => writeln!(std::io::stdout().lock(), "{line}"),
            };
        }
    }

    fn flush(&self) {
        let _ = match self.mode {
            LogMode::Stderr => std::io::stderr().flush(),
            LogMode::Stdout => std::io::stdout().flush(),
        };
    }
}

fn format_record(record: &Record<'_>, now: OffsetDateTime) -> String {
    let mut buffer = String::with_capacity(128);
    let timestamp = now.format(&Rfc3339).unwrap_or("<unknown>".to_string());
    let level = record.level().as_str();
    let module = record.module_path().unwrap_or("<unknown>");
    let file = record.file().unwrap_or("<unknown>");
    let line = record.line().unwrap_or(0);
    let log_message = record.args();

    let _ = write!(
        &mut buffer,
        "{level} {timestamp} {module} {file}:{line} {log_message}"
    );
    buffer
}
