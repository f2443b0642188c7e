use serde::{Deserialize, Serialize};

/// Elapsed-time counter for a play session.
///
/// The timer only counts steps; whoever owns the wall clock calls [`SessionTimer::tick`] once
/// per interval. A cancelled timer ignores ticks until it is resumed or restarted.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTimer {
    steps: u32,
    running: bool,
}

impl SessionTimer {
    /// Resets the count to zero and starts stepping.
    pub fn start(&mut self) {
        self.steps = 0;
        self.running = true;
    }

    pub fn cancel(&mut self) {
        self.running = false;
    }

    /// Continues stepping from the current count.
    pub fn resume(&mut self) {
        self.running = true;
    }

    /// Advances one step, returns the new count or `None` when not running.
    pub fn tick(&mut self) -> Option<u32> {
        if !self.running {
            return None;
        }
        self.steps = self.steps.saturating_add(1);
        Some(self.steps)
    }

    pub fn total_steps(&self) -> u32 {
        self.steps
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}
