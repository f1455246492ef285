//! Console logger behind the `log` facade.
//!
//! Every record is printed as `LEVEL - message` and kept in a bounded ring
//! buffer so callers (and tests) can read back what a run said. Errors go to
//! stderr, everything else to stdout.

use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use once_cell::sync::OnceCell;
use std::collections::VecDeque;
use std::sync::Mutex;

const BUFFER_CAPACITY: usize = 1000;

pub struct ConsoleLogger {
    buffer: Mutex<VecDeque<String>>,
}

impl ConsoleLogger {
    fn new() -> Self {
        Self {
            buffer: Mutex::new(VecDeque::with_capacity(BUFFER_CAPACITY)),
        }
    }
}

static LOGGER: OnceCell<ConsoleLogger> = OnceCell::new();

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let msg = format!("{} - {}", record.level(), record.args());
            if record.level() == Level::Error {
                eprintln!("{}", msg);
            } else {
                println!("{}", msg);
            }
            if let Ok(mut buf) = self.buffer.lock() {
                buf.push_back(msg);
                if buf.len() > BUFFER_CAPACITY {
                    buf.pop_front();
                }
            }
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Fails if another logger is already installed.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    let logger = LOGGER.get_or_init(ConsoleLogger::new);
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Lines logged so far, oldest first.
pub fn get_logs() -> Vec<String> {
    LOGGER
        .get()
        .and_then(|l| l.buffer.lock().ok().map(|buf| buf.iter().cloned().collect()))
        .unwrap_or_default()
}
