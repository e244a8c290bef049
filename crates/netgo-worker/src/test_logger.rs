//! Log capture for tests.
//!
//! Records are kept per thread so tests running in parallel only see their
//! own output.

use std::{cell::RefCell, sync::Once};

use log::{Level, LevelFilter, Log, Metadata, Record};

struct CaptureLogger;

static LOGGER: CaptureLogger = CaptureLogger;
static INSTALL: Once = Once::new();

thread_local! {
    static RECORDS: RefCell<Vec<(Level, String)>> = const { RefCell::new(Vec::new()) };
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        let entry = (record.level(), record.args().to_string());
        RECORDS.with(|records| records.borrow_mut().push(entry));
    }

    fn flush(&self) {}
}

/// Installs the capture logger and clears this thread's records.
pub(crate) fn start() {
    INSTALL.call_once(|| {
        log::set_logger(&LOGGER).expect("no other logger in tests");
        log::set_max_level(LevelFilter::Trace);
    });
    RECORDS.with(|records| records.borrow_mut().clear());
}

/// Takes the records logged on this thread at `level`.
pub(crate) fn take(level: Level) -> Vec<String> {
    RECORDS.with(|records| {
        let mut records = records.borrow_mut();
        let (matching, rest) = records.drain(..).partition(|(l, _)| *l == level);
        *records = rest;
        matching.into_iter().map(|(_, text)| text).collect()
    })
}
