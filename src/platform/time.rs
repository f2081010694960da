//! Time sources

use std::cell::Cell;
use std::rc::Rc;

use crate::consts::{MAX_DT, NOMINAL_DT};

/// Monotonic millisecond time source
pub trait Clock {
    fn now_ms(&self) -> f64;
}

/// Hand-driven clock for tests and headless runs.
///
/// Clones share the same time, so one handle can be given to a session
/// while another advances it.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new(start_ms: f64) -> Self {
        Self {
            now: Rc::new(Cell::new(start_ms)),
        }
    }

    pub fn set(&self, ms: f64) {
        self.now.set(ms);
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> f64 {
        self.now.get()
    }
}

/// `performance.now()` in the browser
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Default)]
pub struct PerformanceClock;

#[cfg(target_arch = "wasm32")]
impl Clock for PerformanceClock {
    fn now_ms(&self) -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }
}

/// Turns per-frame timestamps into simulation deltas
#[derive(Debug, Clone, Default)]
pub struct FrameDelta {
    last_ms: Option<f64>,
}

impl FrameDelta {
    /// Forget the previous timestamp (next frame uses the nominal delta)
    pub fn reset(&mut self) {
        self.last_ms = None;
    }

    /// Seconds since the previous timestamp, clamped to `MAX_DT`.
    ///
    /// Falls back to `NOMINAL_DT` when there is no usable previous frame.
    pub fn delta(&mut self, timestamp_ms: f64) -> f32 {
        let dt = match self.last_ms {
            Some(last) => ((timestamp_ms - last) / 1000.0) as f32,
            None => NOMINAL_DT,
        };
        self.last_ms = Some(timestamp_ms);

        if dt.is_finite() && dt > 0.0 {
            dt.min(MAX_DT)
        } else {
            NOMINAL_DT
        }
    }
}
