//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Time (monotonic milliseconds, frame deltas)
//! - The repeating frame task and its cancellation

pub mod frame_loop;
pub mod time;

pub use frame_loop::{FrameLoop, FrameToken};
pub use time::{Clock, FrameDelta, ManualClock};

#[cfg(target_arch = "wasm32")]
pub use time::PerformanceClock;
