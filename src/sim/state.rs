//! Session state and core simulation types
//!
//! Everything a running session mutates lives in `SessionState`.

use serde::{Deserialize, Serialize};

use crate::combo_for;
use crate::consts::*;

/// Menu items customers can order
pub const ORDERS: [&str; 5] = ["Coffee", "Peach ice tea", "Croissant", "Boba", "Latte"];

/// Customer avatars (cosmetic only)
pub const AVATARS: [&str; 5] = ["🧑‍🍳", "🧑‍💼", "🧑‍🎨", "🧑‍🏫", "🧑‍🚴"];

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Nothing started yet (start screen)
    #[default]
    Idle,
    /// Customers are arriving and the frame loop is live
    Running,
    /// Lives ran out
    Ended,
}

/// How quickly a customer loses patience
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Personality {
    Normal,
    Impatient,
}

impl Personality {
    /// Patience lost per second before difficulty scaling
    pub fn base_drain(self) -> f32 {
        match self {
            Personality::Normal => NORMAL_DRAIN,
            Personality::Impatient => IMPATIENT_DRAIN,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Personality::Normal => "normal",
            Personality::Impatient => "impatient",
        }
    }
}

/// A customer waiting in the queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u32,
    pub avatar: String,
    pub order: String,
    pub personality: Personality,
    /// Remaining patience, starts at 100 and only goes down
    pub patience: f32,
    pub base_drain: f32,
}

impl Customer {
    pub fn new(id: u32, order: &str, avatar: &str, personality: Personality) -> Self {
        Self {
            id,
            avatar: avatar.to_string(),
            order: order.to_string(),
            personality,
            patience: START_PATIENCE,
            base_drain: personality.base_drain(),
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.patience <= 0.0
    }
}

/// Feedback produced by the simulation for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A customer joined the queue
    CustomerArrived { id: u32 },
    /// The head customer got their order
    Served {
        id: u32,
        item: String,
        combo: u32,
        score: u64,
        coins: u64,
    },
    /// The tray held something the head customer didn't order
    WrongItem { item: String },
    /// A customer ran out of patience and left
    CustomerLeft { id: u32 },
    /// Lives ran out
    GameOver {
        score: u64,
        best: u64,
        served: u32,
        missed: u32,
    },
}

/// Complete session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub score: u64,
    pub coins: u64,
    pub lives: i32,
    /// Reward multiplier, always `combo_for(combo_count)`
    pub combo: u32,
    /// Consecutive on-time serves
    pub combo_count: u32,
    /// Waiting customers, head is served first
    pub customers: Vec<Customer>,
    pub spawn_timer: f32,
    pub spawn_interval: f32,
    pub difficulty_timer: f32,
    pub patience_scale: f32,
    /// Timestamp (ms) of the last successful serve
    pub last_serve_ms: f64,
    /// Customers served this session
    pub served: u32,
    /// Customers that left unserved this session
    pub missed: u32,
    /// Pending feedback for the presentation layer
    #[serde(skip)]
    pub events: Vec<GameEvent>,
    #[serde(skip)]
    render_pending: bool,
    next_id: u32,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Fresh idle state
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            score: 0,
            coins: 0,
            lives: START_LIVES,
            combo: 1,
            combo_count: 0,
            customers: Vec::with_capacity(MAX_CUSTOMERS),
            spawn_timer: 0.0,
            spawn_interval: START_SPAWN_INTERVAL,
            difficulty_timer: 0.0,
            patience_scale: START_PATIENCE_SCALE,
            last_serve_ms: 0.0,
            served: 0,
            missed: 0,
            events: Vec::new(),
            render_pending: false,
            next_id: 1,
        }
    }

    /// Reset every counter and enter `Running`.
    ///
    /// `now_ms` counts as the previous serve, so a serve right after the start
    /// continues the (empty) streak.
    pub fn reset(&mut self, now_ms: f64) {
        *self = Self {
            phase: SessionPhase::Running,
            last_serve_ms: now_ms,
            // Ids stay unique across restarts of the same session
            next_id: self.next_id,
            ..Self::new()
        };
        self.request_render();
    }

    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Allocate a new customer ID
    pub fn next_customer_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop the streak back to the baseline multiplier
    pub fn reset_combo(&mut self) {
        self.combo_count = 0;
        self.combo = combo_for(0);
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn request_render(&mut self) {
        self.render_pending = true;
    }

    /// Returns true once per batch of render requests
    pub fn take_render_request(&mut self) -> bool {
        std::mem::replace(&mut self.render_pending, false)
    }
}
