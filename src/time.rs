//! Wall-clock source for save timestamps.
//!
//! Timestamps are epoch milliseconds as `f64`, the same unit `Date.now()`
//! returns, so saves written by the browser build and a native host agree.

use std::cell::Cell;

pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> f64;
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now_ms(&self) -> f64 {
        (**self).now_ms()
    }
}

/// The real clock: `Date.now()` in the browser, `SystemTime` elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[cfg(target_arch = "wasm32")]
    fn now_ms(&self) -> f64 {
        js_sys::Date::now()
    }

    #[cfg(not(target_arch = "wasm32"))]
    fn now_ms(&self) -> f64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as f64)
            .unwrap_or(0.0)
    }
}

/// Manually driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Cell::new(start_ms),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance_secs(&self, secs: f64) {
        self.now.set(self.now.get() + secs * 1000.0);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}
