//! Browser console sink for the `log` facade.
//!
//! Native hosts bring their own logger (`env_logger` in tests). In the
//! browser, call [`init`] once at startup.

#[cfg(target_arch = "wasm32")]
use log::{Log, Metadata};
use log::{Level, LevelFilter, Record};

pub struct ConsoleLogger {
    level: LevelFilter,
}

impl ConsoleLogger {
    pub const fn new(level: LevelFilter) -> Self {
        Self { level }
    }

    fn allows(&self, level: Level) -> bool {
        level <= self.level
    }

    fn format(record: &Record) -> String {
        format!("[{}] {}", record.target(), record.args())
    }
}

#[cfg(target_arch = "wasm32")]
impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        self.allows(metadata.level())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let value = js_sys::JsString::from(Self::format(record).as_str());
        match record.level() {
            Level::Error => web_sys::console::error_1(&value),
            Level::Warn => web_sys::console::warn_1(&value),
            Level::Info | Level::Debug | Level::Trace => web_sys::console::log_1(&value),
        }
    }

    fn flush(&self) {}
}

#[cfg(target_arch = "wasm32")]
static LOGGER: ConsoleLogger = ConsoleLogger::new(LevelFilter::Info);

/// Install the panic hook and console logger. Safe to call more than once.
#[cfg(target_arch = "wasm32")]
pub fn init() {
    console_error_panic_hook::set_once();
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LOGGER.level);
    }
}
