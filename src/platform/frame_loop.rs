//! Cancellable repeating frame task
//!
//! Each `start` opens a new generation. Frame callbacks carry the token of the
//! generation that scheduled them; once the loop is cancelled or restarted,
//! older tokens are ignored, so a stale callback can't touch a fresh session.

/// Identifies one generation of the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    generation: u64,
    active: bool,
}

impl FrameLoop {
    /// Begin a new generation, invalidating any earlier token
    pub fn start(&mut self) -> FrameToken {
        self.generation += 1;
        self.active = true;
        FrameToken(self.generation)
    }

    pub fn cancel(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// True if a callback holding `token` should still run
    pub fn accepts(&self, token: FrameToken) -> bool {
        self.active && token.0 == self.generation
    }
}
