//! Mochi Cafe - a cozy cafe rush arcade game
//!
//! Core modules:
//! - `sim`: Session simulation (customers, patience, serving, difficulty)
//! - `session`: Session lifecycle, frame loop and presentation dispatch
//! - `platform`: Browser/native platform abstraction (time, frame loop)
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `highscores`: Best score tracking
//! - `settings`: Player preferences
//! - `audio`: Procedural sound effects

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::BestScore;
pub use session::{FrameStatus, Presenter, Session, Snapshot};
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    /// Lives at the start of a session
    pub const START_LIVES: i32 = 3;
    /// Maximum customers waiting at once
    pub const MAX_CUSTOMERS: usize = 2;

    /// Patience every customer arrives with
    pub const START_PATIENCE: f32 = 100.0;
    /// Patience drain per second (before difficulty scaling)
    pub const NORMAL_DRAIN: f32 = 10.0;
    pub const IMPATIENT_DRAIN: f32 = 16.0;
    /// Probability a new customer is impatient
    pub const IMPATIENT_CHANCE: f64 = 0.35;

    /// Seconds between spawns at session start
    pub const START_SPAWN_INTERVAL: f32 = 4.5;
    /// Spawn interval never drops below this
    pub const MIN_SPAWN_INTERVAL: f32 = 2.4;
    pub const SPAWN_INTERVAL_STEP: f32 = 0.2;

    /// Patience drain multiplier bounds
    pub const START_PATIENCE_SCALE: f32 = 1.0;
    pub const MAX_PATIENCE_SCALE: f32 = 2.7;
    pub const PATIENCE_SCALE_STEP: f32 = 0.08;

    /// Seconds between difficulty ramps
    pub const DIFFICULTY_PERIOD: f32 = 12.0;

    /// Hits closer together than this continue the combo (ms)
    pub const COMBO_WINDOW_MS: f64 = 3000.0;
    pub const MAX_COMBO: u32 = 6;

    /// Rewards per serve (before combo)
    pub const BASE_SCORE: u64 = 15;
    pub const BASE_COINS: u64 = 8;
    /// Extra coins per combo level above 1
    pub const COMBO_COIN_BONUS: u64 = 3;

    /// Frame delta used when the real one can't be measured (first frame)
    pub const NOMINAL_DT: f32 = 0.016;
    /// Frame delta ceiling, bounds simulation error after stalls
    pub const MAX_DT: f32 = 0.05;
}

/// Combo multiplier for a run of consecutive on-time serves
#[inline]
pub fn combo_for(combo_count: u32) -> u32 {
    (1 + combo_count / 2).min(consts::MAX_COMBO)
}
