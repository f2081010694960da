//! Difficulty ramp

use super::state::SessionState;
use crate::consts::*;

/// Every `DIFFICULTY_PERIOD` seconds customers arrive faster and lose
/// patience quicker. Never eases off within a session.
///
/// Returns true when a ramp step was applied.
pub fn update_difficulty(state: &mut SessionState, dt: f32) -> bool {
    if !state.is_running() {
        return false;
    }

    state.difficulty_timer += dt;
    if state.difficulty_timer < DIFFICULTY_PERIOD {
        return false;
    }

    state.spawn_interval = (state.spawn_interval - SPAWN_INTERVAL_STEP).max(MIN_SPAWN_INTERVAL);
    state.patience_scale = (state.patience_scale + PATIENCE_SCALE_STEP).min(MAX_PATIENCE_SCALE);
    state.difficulty_timer = 0.0;
    log::debug!(
        "Difficulty up: spawn every {:.1}s, patience x{:.2}",
        state.spawn_interval,
        state.patience_scale
    );
    true
}
