//! Session simulation module
//!
//! All gameplay logic lives here. This module must stay free of platform code:
//! - Time only arrives as `dt` seconds or explicit timestamps
//! - Randomness only through an injected `Rng`
//! - Stable iteration order (queue order)
//! - No rendering, audio or storage dependencies

pub mod difficulty;
pub mod patience;
pub mod serve;
pub mod spawn;
pub mod state;
pub mod tick;

pub use difficulty::update_difficulty;
pub use patience::update_patience;
pub use serve::{ServeOutcome, serve};
pub use spawn::spawn_customer;
pub use state::{AVATARS, Customer, GameEvent, ORDERS, Personality, SessionPhase, SessionState};
pub use tick::tick;
