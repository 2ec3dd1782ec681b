//! `log` backend printing to the browser console.
//!
//! Only installed from the wasm entry points; native builds (tests) keep the
//! default no-op logger so nothing reaches `web_sys::console` off-browser.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!(
            "[{}] {}: {}",
            record.level(),
            record.target(),
            record.args()
        ));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Installs the console logger once; later calls only adjust the level.
pub fn init(level: LevelFilter) {
    // set_logger fails if a logger is already installed, which is fine here
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
