//! Countdown clock
//!
//! Ticks every frame once started and fires its expiry signal exactly once.

#[derive(Debug, Clone)]
pub struct GameClock {
    remaining: f32,
    running: bool,
    expired: bool,
}

impl GameClock {
    /// Create a stopped clock with the given budget (seconds)
    pub fn new(seconds: f32) -> Self {
        let mut clock = Self {
            remaining: 0.0,
            running: false,
            expired: false,
        };
        clock.restore(seconds);
        clock
    }

    pub fn start(&mut self) {
        if !self.expired {
            self.running = true;
        }
    }

    /// Reset the countdown to a saved value. A value of zero (or less) counts
    /// as already expired and will not fire again.
    pub fn restore(&mut self, seconds: f32) {
        if seconds.is_finite() && seconds > 0.0 {
            self.remaining = seconds;
            self.expired = false;
        } else {
            self.remaining = 0.0;
            self.expired = true;
            self.running = false;
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Advance the countdown. Returns true exactly once, on the tick that
    /// reaches zero.
    pub fn tick(&mut self, dt: f32) -> bool {
        if !self.running || self.expired {
            return false;
        }

        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = 0.0;
            self.expired = true;
            self.running = false;
            return true;
        }
        false
    }
}
