use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

/// `log` backend writing to the browser console.
///
/// Each line is tagged with the record's target so messages from the bill
/// list and the new bill form can be told apart.
pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    /// Install the console logger as the global `log` backend
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_boxed_logger(Box::new(ConsoleLogger { level }))?;
        log::set_max_level(level);
        Ok(())
    }

    fn format_line(record: &Record) -> String {
        format!("[{}] {}", record.target(), record.args())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let line = Self::format_line(record);
        match record.level() {
            Level::Error => gloo::console::error!(line),
            Level::Warn => gloo::console::warn!(line),
            Level::Info => gloo::console::info!(line),
            Level::Debug | Level::Trace => gloo::console::debug!(line),
        }
    }

    fn flush(&self) {}
}
