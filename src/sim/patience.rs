//! Patience decay and walk-outs

use super::state::{GameEvent, SessionPhase, SessionState};

/// Drain every waiting customer's patience by `dt` seconds.
///
/// All customers drain first; exhausted ones are then removed in queue order,
/// each costing a life and the combo. Ends the session when lives run out.
/// Returns how many customers left.
pub fn update_patience(state: &mut SessionState, dt: f32) -> usize {
    if !state.is_running() {
        return 0;
    }

    let scale = state.patience_scale;
    for customer in &mut state.customers {
        customer.patience -= customer.base_drain * scale * dt;
    }

    let left: Vec<u32> = state
        .customers
        .iter()
        .filter(|c| c.is_exhausted())
        .map(|c| c.id)
        .collect();
    if left.is_empty() {
        return 0;
    }

    for &id in &left {
        state.customers.retain(|c| c.id != id);
        state.lives -= 1;
        state.missed += 1;
        state.reset_combo();
        log::debug!("Customer {} left, {} lives remaining", id, state.lives);
        state.push_event(GameEvent::CustomerLeft { id });
    }
    state.request_render();

    if state.lives <= 0 {
        log::info!("Out of lives with score {}", state.score);
        state.phase = SessionPhase::Ended;
    }

    left.len()
}
