//! Browser console logging for the worker.

use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use wasm_bindgen::JsValue;
use web_sys::console;

/// Redirects `log` records to `console.error`, `console.warn` and friends.
#[derive(Debug, Clone, Copy)]
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl ConsoleLogger {
    /// Installs the logger with the given maximum level.
    ///
    /// # Errors
    ///
    /// Fails if another logger is already installed.
    pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(&LOGGER)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let text = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&text),
            Level::Warn => console::warn_1(&text),
            Level::Info => console::info_1(&text),
            Level::Debug => console::debug_1(&text),
            Level::Trace => console::log_1(&text),
        }
    }

    fn flush(&self) {}
}

/// Forwards panic messages to `console.error` after the previous hook runs.
pub(super) fn install_panic_hook() {
    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        previous(panic_info);
        console::error_1(&JsValue::from_str(&format!(
            "scoring worker panicked: {panic_info}"
        )));
    }));
}
