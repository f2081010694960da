//! Session lifecycle
//!
//! `Session` owns one game's state and drives it through
//! `Idle -> Running -> Ended`, with `Ended -> Running` on restart.
//! Time, randomness and storage are injected so the whole lifecycle can be
//! stepped deterministically.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::highscores::BestScore;
use crate::persistence::KeyValueStore;
use crate::platform::{Clock, FrameDelta, FrameLoop, FrameToken};
use crate::sim::{self, Customer, GameEvent, ServeOutcome, SessionPhase, SessionState};

/// Whether the frame loop should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStatus {
    Continue,
    Stopped,
}

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: SessionPhase,
    pub score: u64,
    pub coins: u64,
    pub combo: u32,
    pub lives: i32,
    pub best_score: u64,
    /// Customers served and lost this session
    pub served: u32,
    pub missed: u32,
    pub customers: Vec<Customer>,
}

/// Presentation adapter (DOM, terminal, test recorder...)
pub trait Presenter {
    /// Redraw HUD and customer queue
    fn render(&mut self, snapshot: &Snapshot);
    /// Transient cue (sound, shake, glow) for one event
    fn feedback(&mut self, event: &GameEvent);
}

/// One player's game, from start screen to game over and back
pub struct Session<C: Clock, S: KeyValueStore, R: Rng = Pcg32> {
    state: SessionState,
    clock: C,
    store: S,
    rng: R,
    frames: FrameLoop,
    delta: FrameDelta,
    best: BestScore,
}

impl<C: Clock, S: KeyValueStore> Session<C, S, Pcg32> {
    /// Session with a seeded PCG generator
    pub fn new(clock: C, store: S, seed: u64) -> Self {
        log::info!("Session created with seed: {}", seed);
        Self::with_rng(clock, store, Pcg32::seed_from_u64(seed))
    }
}

impl<C: Clock, S: KeyValueStore, R: Rng> Session<C, S, R> {
    pub fn with_rng(clock: C, store: S, rng: R) -> Self {
        let best = BestScore::load(&store);
        Self {
            state: SessionState::new(),
            clock,
            store,
            rng,
            frames: FrameLoop::default(),
            delta: FrameDelta::default(),
            best,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> SessionPhase {
        self.state.phase
    }

    pub fn best_score(&self) -> u64 {
        self.best.0
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// Start (or restart after game over).
    ///
    /// Returns the token the frame loop must pass to `frame`, or `None`
    /// while a session is already running.
    pub fn start(&mut self) -> Option<FrameToken> {
        if self.state.is_running() {
            return None;
        }

        self.state.reset(self.clock.now_ms());
        self.delta.reset();
        sim::spawn_customer(&mut self.state, &mut self.rng);
        log::info!("Session started (best {})", self.best.0);
        Some(self.frames.start())
    }

    /// Start, and only on success drop the previous loop's pending callback.
    ///
    /// A start request while running changes nothing, so the live loop
    /// keeps its scheduled frame.
    pub fn restart<F: FnOnce()>(&mut self, cancel_pending: F) -> Option<FrameToken> {
        let token = self.start()?;
        cancel_pending();
        Some(token)
    }

    /// Run one frame at `timestamp_ms`.
    ///
    /// Stale tokens and frames after game over are ignored.
    pub fn frame(&mut self, token: FrameToken, timestamp_ms: f64) -> FrameStatus {
        if !self.frames.accepts(token) || !self.state.is_running() {
            return FrameStatus::Stopped;
        }

        let dt = self.delta.delta(timestamp_ms);
        sim::tick(&mut self.state, &mut self.rng, dt);

        if self.state.phase == SessionPhase::Ended {
            self.finish();
            return FrameStatus::Stopped;
        }
        FrameStatus::Continue
    }

    /// Put `item` on the tray for the first customer in line
    pub fn serve(&mut self, item: &str) -> Option<ServeOutcome> {
        let now = self.clock.now_ms();
        sim::serve(&mut self.state, item, now)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.state.phase,
            score: self.state.score,
            coins: self.state.coins,
            combo: self.state.combo,
            lives: self.state.lives,
            best_score: self.best.0,
            served: self.state.served,
            missed: self.state.missed,
            customers: self.state.customers.clone(),
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    pub fn take_render_request(&mut self) -> bool {
        self.state.take_render_request()
    }

    /// Deliver pending feedback, then redraw if anything changed
    pub fn present<P: Presenter + ?Sized>(&mut self, presenter: &mut P) {
        for event in self.state.drain_events() {
            presenter.feedback(&event);
        }
        if self.state.take_render_request() {
            presenter.render(&self.snapshot());
        }
    }

    /// Stop the loop and record the final score
    fn finish(&mut self) {
        self.frames.cancel();
        let score = self.state.score;
        self.best = BestScore::record(&mut self.store, score);
        log::info!(
            "Game over: score {}, best {}, served {}, missed {}",
            score,
            self.best.0,
            self.state.served,
            self.state.missed
        );
        self.state.push_event(GameEvent::GameOver {
            score,
            best: self.best.0,
            served: self.state.served,
            missed: self.state.missed,
        });
        self.state.request_render();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::persistence::MemoryStore;
    use crate::platform::ManualClock;

    type TestSession = Session<ManualClock, MemoryStore>;

    fn session_at(start_ms: f64) -> (TestSession, ManualClock) {
        let clock = ManualClock::new(start_ms);
        let session = Session::new(clock.clone(), MemoryStore::new(), 42);
        (session, clock)
    }

    /// Run frames 16ms apart until the session stops or `max` frames pass
    fn run_frames(session: &mut TestSession, clock: &ManualClock, token: FrameToken, max: usize) -> usize {
        for i in 0..max {
            clock.advance(16.0);
            if session.frame(token, clock.now_ms()) == FrameStatus::Stopped {
                return i + 1;
            }
        }
        max
    }

    #[derive(Default)]
    struct Recorder {
        renders: Vec<Snapshot>,
        events: Vec<GameEvent>,
    }

    impl Presenter for Recorder {
        fn render(&mut self, snapshot: &Snapshot) {
            self.renders.push(snapshot.clone());
        }

        fn feedback(&mut self, event: &GameEvent) {
            self.events.push(event.clone());
        }
    }

    #[test]
    fn test_start_spawns_first_customer() {
        let (mut session, _clock) = session_at(1000.0);
        assert_eq!(session.phase(), SessionPhase::Idle);

        let token = session.start();
        assert!(token.is_some());
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.state().customers.len(), 1);
        assert_eq!(session.state().lives, START_LIVES);

        // Already running
        assert_eq!(session.start(), None);
    }

    #[test]
    fn test_actions_ignored_while_idle() {
        let (mut session, _clock) = session_at(0.0);
        assert_eq!(session.serve("Coffee"), None);
        let mut other = FrameLoop::default();
        assert_eq!(session.frame(other.start(), 16.0), FrameStatus::Stopped);
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_quick_serves_after_start_build_combo() {
        let (mut session, clock) = session_at(5000.0);
        session.start().unwrap();
        let first = session.state().customers[0].order.clone();

        clock.advance(800.0);
        assert!(matches!(
            session.serve(&first),
            Some(ServeOutcome::Hit { combo: 1, score: 15, coins: 8, .. })
        ));

        // Force a second customer in and serve it quickly
        sim::spawn_customer(&mut session.state, &mut session.rng);
        let second = session.state().customers[0].order.clone();
        clock.advance(900.0);
        assert!(matches!(
            session.serve(&second),
            Some(ServeOutcome::Hit { combo: 2, score: 30, coins: 11, .. })
        ));
        assert_eq!(session.snapshot().score, 45);
    }

    #[test]
    fn test_game_over_persists_best_and_stops() {
        let (mut session, clock) = session_at(0.0);
        let token = session.start().unwrap();
        session.state.score = 210;

        // Unserved customers eventually cost every life
        let frames = run_frames(&mut session, &clock, token, 100_000);
        assert!(frames < 100_000);
        assert_eq!(session.phase(), SessionPhase::Ended);
        assert!(session.state().lives <= 0);
        assert_eq!(session.best_score(), 210);
        assert_eq!(BestScore::load(session.store()), BestScore(210));

        let events = session.drain_events();
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver { score: 210, best: 210, served: 0, .. })
        ));

        // Stale loop callbacks are ignored
        let frozen = session.snapshot();
        clock.advance(16.0);
        assert_eq!(session.frame(token, clock.now_ms()), FrameStatus::Stopped);
        assert_eq!(session.serve("Coffee"), None);
        assert_eq!(session.snapshot(), frozen);
    }

    #[test]
    fn test_lower_score_keeps_previous_best() {
        let clock = ManualClock::new(0.0);
        let store = MemoryStore::with_entry(BestScore::STORAGE_KEY, "500");
        let mut session = Session::new(clock.clone(), store, 7);
        assert_eq!(session.best_score(), 500);

        let token = session.start().unwrap();
        session.state.score = 120;
        run_frames(&mut session, &clock, token, 100_000);

        assert_eq!(session.best_score(), 500);
        assert_eq!(BestScore::load(session.store()), BestScore(500));
    }

    #[test]
    fn test_restart_after_game_over() {
        let (mut session, clock) = session_at(0.0);
        let old = session.start().unwrap();
        run_frames(&mut session, &clock, old, 100_000);
        assert_eq!(session.phase(), SessionPhase::Ended);

        let new = session.start().unwrap();
        assert_ne!(old, new);
        assert_eq!(session.phase(), SessionPhase::Running);
        assert_eq!(session.state().lives, START_LIVES);
        assert_eq!(session.state().score, 0);
        assert_eq!(session.state().customers.len(), 1);

        // The old loop can't drive the new session
        let before = session.state().customers[0].patience;
        clock.advance(16.0);
        assert_eq!(session.frame(old, clock.now_ms()), FrameStatus::Stopped);
        assert_eq!(session.state().customers[0].patience, before);
        assert_eq!(session.frame(new, clock.now_ms()), FrameStatus::Continue);
    }

    #[test]
    fn test_restart_while_running_keeps_pending_frame() {
        let (mut session, clock) = session_at(0.0);
        let token = session.start().unwrap();
        let mut cancelled = false;

        assert_eq!(session.restart(|| cancelled = true), None);
        assert!(!cancelled);

        // The original loop still drives the session
        clock.advance(16.0);
        assert_eq!(session.frame(token, clock.now_ms()), FrameStatus::Continue);
    }

    #[test]
    fn test_restart_after_game_over_cancels_old_frame() {
        let (mut session, clock) = session_at(0.0);
        let old = session.start().unwrap();
        run_frames(&mut session, &clock, old, 100_000);
        let mut cancelled = false;

        let new = session.restart(|| cancelled = true);

        assert!(cancelled);
        assert!(new.is_some_and(|t| t != old));
        assert_eq!(session.phase(), SessionPhase::Running);
    }

    #[test]
    fn test_game_over_snapshot_carries_served_and_missed() {
        let (mut session, clock) = session_at(0.0);
        let token = session.start().unwrap();
        let wanted = session.state().customers[0].order.clone();
        clock.advance(200.0);
        session.serve(&wanted);

        run_frames(&mut session, &clock, token, 100_000);

        let snapshot = session.snapshot();
        assert_eq!(snapshot.phase, SessionPhase::Ended);
        assert_eq!(snapshot.served, 1);
        assert!(snapshot.missed >= START_LIVES as u32);
        let events = session.drain_events();
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver { served: 1, missed, .. }) if *missed == snapshot.missed
        ));
    }

    #[test]
    fn test_stall_is_clamped() {
        let (mut session, clock) = session_at(0.0);
        let token = session.start().unwrap();
        session.frame(token, 0.0);

        // Ten seconds in the background count as one 50ms frame
        clock.advance(10_000.0);
        session.frame(token, clock.now_ms());
        let patience = session.state().customers[0].patience;
        let drain = session.state().customers[0].base_drain;
        let expected = START_PATIENCE - drain * (NOMINAL_DT + MAX_DT);
        assert!((patience - expected).abs() < 1e-3);
    }

    #[test]
    fn test_present_delivers_events_then_one_render() {
        let (mut session, clock) = session_at(0.0);
        session.start().unwrap();
        let mut recorder = Recorder::default();

        session.present(&mut recorder);
        assert_eq!(recorder.renders.len(), 1);
        assert_eq!(recorder.events.len(), 1);
        assert!(matches!(recorder.events[0], GameEvent::CustomerArrived { .. }));

        clock.advance(100.0);
        session.serve("Definitely not on the menu");
        session.serve("Also not");
        session.present(&mut recorder);
        assert_eq!(recorder.renders.len(), 2);
        assert_eq!(recorder.events.len(), 3);
        assert_eq!(recorder.renders[1].combo, 1);

        // Nothing new, nothing drawn
        session.present(&mut recorder);
        assert_eq!(recorder.renders.len(), 2);
    }
}
