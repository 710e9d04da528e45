//! Liveness guard for results of in-flight fetches.
//!
//! A screen hands out a `FetchTicket` when a fetch starts and presents it
//! again when the result arrives on the UI thread. The result is applied only
//! if no newer fetch started and the screen was not dismissed meanwhile.

/// Identifies one started fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// Per-screen fetch generation counter.
#[derive(Debug, Clone)]
pub struct ScreenLiveness {
    generation: u64,
    alive: bool,
}

impl Default for ScreenLiveness {
    fn default() -> Self {
        Self {
            generation: 0,
            alive: true,
        }
    }
}

impl ScreenLiveness {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fetch, invalidating every earlier ticket.
    pub fn begin(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Whether a result carrying `ticket` may still be applied.
    pub fn accepts(&self, ticket: FetchTicket) -> bool {
        self.alive && ticket.generation == self.generation
    }

    /// Marks the screen as gone; all outstanding tickets become stale.
    pub fn dismiss(&mut self) {
        self.alive = false;
    }

    /// Shows the screen again. The generation keeps counting, so tickets
    /// handed out before the screen was dismissed stay stale.
    pub fn reopen(&mut self) {
        self.generation += 1;
        self.alive = true;
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }
}
