//! Per-frame simulation step
//!
//! Advances a running session by one frame: spawn, then patience, then difficulty.

use rand::Rng;

use super::difficulty::update_difficulty;
use super::patience::update_patience;
use super::spawn::spawn_customer;
use super::state::SessionState;

/// Advance the session by `dt` seconds
pub fn tick<R: Rng + ?Sized>(state: &mut SessionState, rng: &mut R, dt: f32) {
    if !state.is_running() {
        return;
    }

    state.spawn_timer += dt;
    if state.spawn_timer >= state.spawn_interval {
        // Timer restarts even when the queue is full
        spawn_customer(state, rng);
        state.spawn_timer = 0.0;
    }

    update_patience(state, dt);

    // Nothing moves after the last life is lost
    if !state.is_running() {
        return;
    }
    update_difficulty(state, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{AVATARS, Customer, GameEvent, Personality, SessionPhase};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn running() -> SessionState {
        let mut state = SessionState::new();
        state.reset(0.0);
        state
    }

    #[test]
    fn test_spawn_after_interval() {
        let mut state = running();
        let mut rng = Pcg32::seed_from_u64(3);

        // 4.4s of frames: no spawn yet
        for _ in 0..88 {
            tick(&mut state, &mut rng, 0.05);
        }
        assert!(state.customers.is_empty());

        for _ in 0..3 {
            tick(&mut state, &mut rng, 0.05);
        }
        assert_eq!(state.customers.len(), 1);
        assert!(state.spawn_timer < 0.11);
    }

    #[test]
    fn test_two_walkouts_in_one_tick() {
        let mut state = running();
        let mut rng = Pcg32::seed_from_u64(3);
        for p in [Personality::Normal, Personality::Impatient] {
            let id = state.next_customer_id();
            let mut customer = Customer::new(id, "Coffee", AVATARS[2], p);
            customer.patience = 0.1;
            state.customers.push(customer);
        }
        state.combo_count = 3;
        state.combo = 2;

        tick(&mut state, &mut rng, 0.05);

        assert_eq!(state.lives, START_LIVES - 2);
        assert_eq!(state.combo, 1);
        assert_eq!(state.combo_count, 0);
        assert!(state.customers.is_empty());
        let left = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::CustomerLeft { .. }))
            .count();
        assert_eq!(left, 2);
    }

    #[test]
    fn test_no_difficulty_after_game_over() {
        let mut state = running();
        let mut rng = Pcg32::seed_from_u64(3);
        state.lives = 1;
        state.difficulty_timer = 11.99;
        let id = state.next_customer_id();
        let mut customer = Customer::new(id, "Boba", AVATARS[0], Personality::Normal);
        customer.patience = 0.01;
        state.customers.push(customer);

        tick(&mut state, &mut rng, 0.05);

        assert_eq!(state.phase, SessionPhase::Ended);
        assert_eq!(state.difficulty_timer, 11.99);
        assert_eq!(state.spawn_interval, START_SPAWN_INTERVAL);

        let before = state.clone();
        tick(&mut state, &mut rng, 0.05);
        assert_eq!(state.spawn_timer, before.spawn_timer);
        assert_eq!(state.lives, before.lives);
    }

    #[test]
    fn test_determinism() {
        let mut a = running();
        let mut b = running();
        let mut rng_a = Pcg32::seed_from_u64(99999);
        let mut rng_b = Pcg32::seed_from_u64(99999);

        for _ in 0..2000 {
            tick(&mut a, &mut rng_a, 0.016);
            tick(&mut b, &mut rng_b, 0.016);
        }

        assert_eq!(a.lives, b.lives);
        assert_eq!(a.customers, b.customers);
        assert_eq!(a.events, b.events);
        assert_eq!(a.spawn_interval, b.spawn_interval);
    }

    proptest! {
        #[test]
        fn prop_queue_never_exceeds_limit(seed in any::<u64>(), dts in prop::collection::vec(0.0f32..0.05, 1..400)) {
            let mut state = running();
            let mut rng = Pcg32::seed_from_u64(seed);
            // Hammer the generator too
            state.spawn_interval = MIN_SPAWN_INTERVAL;
            for dt in dts {
                spawn_customer(&mut state, &mut rng);
                tick(&mut state, &mut rng, dt);
                prop_assert!(state.customers.len() <= MAX_CUSTOMERS);
            }
        }

        #[test]
        fn prop_patience_never_increases(seed in any::<u64>(), dts in prop::collection::vec(0.0f32..0.05, 1..400)) {
            let mut state = running();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut seen: Vec<(u32, f32)> = Vec::new();
            for dt in dts {
                tick(&mut state, &mut rng, dt);
                for c in &state.customers {
                    if let Some((_, last)) = seen.iter_mut().find(|(id, _)| *id == c.id) {
                        prop_assert!(c.patience <= *last);
                        *last = c.patience;
                    } else {
                        seen.push((c.id, c.patience));
                    }
                }
            }
        }
    }
}
