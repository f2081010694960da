//! Serving items to the head of the queue

use super::state::{GameEvent, SessionState};
use crate::combo_for;
use crate::consts::*;

/// Result of putting an item on the tray
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServeOutcome {
    /// The head customer got their order
    Hit {
        id: u32,
        combo: u32,
        score: u64,
        coins: u64,
    },
    /// Wrong item, the combo is lost
    Miss,
}

/// Serve `item` to the first customer in line at time `now_ms`.
///
/// Returns `None` when nobody is waiting or the session isn't running.
/// Unknown item names never match an order and count as a miss.
pub fn serve(state: &mut SessionState, item: &str, now_ms: f64) -> Option<ServeOutcome> {
    if !state.is_running() {
        return None;
    }
    let target = state.customers.first()?;

    let outcome = if target.order == item {
        let id = target.id;
        if now_ms - state.last_serve_ms <= COMBO_WINDOW_MS {
            state.combo_count += 1;
        } else {
            state.combo_count = 0;
        }
        state.combo = combo_for(state.combo_count);
        state.last_serve_ms = now_ms;

        let combo = u64::from(state.combo);
        let score = BASE_SCORE * combo;
        let coins = BASE_COINS + combo.saturating_sub(1) * COMBO_COIN_BONUS;
        state.score += score;
        state.coins += coins;
        state.served += 1;
        state.customers.remove(0);

        log::debug!("Served {} to customer {} (x{})", item, id, state.combo);
        state.push_event(GameEvent::Served {
            id,
            item: item.to_string(),
            combo: state.combo,
            score,
            coins,
        });
        ServeOutcome::Hit {
            id,
            combo: state.combo,
            score,
            coins,
        }
    } else {
        log::debug!("Wrong item {:?}, customer wanted {}", item, target.order);
        state.reset_combo();
        state.push_event(GameEvent::WrongItem {
            item: item.to_string(),
        });
        ServeOutcome::Miss
    };

    state.request_render();
    Some(outcome)
}
