//! Capturing logger for the crate's own tests.
//!
//! Records every log line into a process-wide buffer so tests can assert
//! on emitted diagnostics. The buffer is shared by all tests in the
//! binary, so assertions must filter on content unique to their test.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use std::sync::{Mutex, Once};

use log::{LevelFilter, Log, Metadata, Record};

static RECORDS: Mutex<Vec<String>> = Mutex::new(Vec::new());
static INIT: Once = Once::new();

struct CaptureLogger;

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        let mut records = RECORDS.lock().unwrap();
        records.push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger;

/// Install the capturing logger. Safe to call from any number of tests.
pub fn install() {
    INIT.call_once(|| {
        log::set_logger(&LOGGER).ok();
        log::set_max_level(LevelFilter::Trace);
    });
}

/// All captured records containing `needle`.
pub fn grab(needle: &str) -> Vec<String> {
    RECORDS
        .lock()
        .unwrap()
        .iter()
        .filter(|record| record.contains(needle))
        .cloned()
        .collect()
}

/// True if any captured record contains `needle`.
pub fn contains(needle: &str) -> bool {
    !grab(needle).is_empty()
}
