//! Customer generation

use rand::Rng;

use super::state::{AVATARS, Customer, GameEvent, ORDERS, Personality, SessionState};
use crate::consts::*;

/// Add one random customer to the back of the queue.
///
/// Does nothing while the queue is full or the session isn't running.
/// Returns the new customer's id.
pub fn spawn_customer<R: Rng + ?Sized>(state: &mut SessionState, rng: &mut R) -> Option<u32> {
    if !state.is_running() || state.customers.len() >= MAX_CUSTOMERS {
        return None;
    }

    let personality = if rng.random_bool(IMPATIENT_CHANCE) {
        Personality::Impatient
    } else {
        Personality::Normal
    };
    let avatar = AVATARS[rng.random_range(0..AVATARS.len())];
    let order = ORDERS[rng.random_range(0..ORDERS.len())];

    let id = state.next_customer_id();
    state.customers.push(Customer::new(id, order, avatar, personality));
    log::debug!("Customer {} arrived ({}, wants {})", id, personality.as_str(), order);

    state.push_event(GameEvent::CustomerArrived { id });
    state.request_render();
    Some(id)
}
