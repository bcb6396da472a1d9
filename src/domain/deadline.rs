use std::time::Duration;

use tokio::time::Instant;

/// Point in time after which an extraction stage must stop.
///
/// Blocking engines poll [`Deadline::is_expired`] between pages or passes; the
/// orchestrator additionally wraps every attempt in a hard task-level timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    at: Instant,
}

impl Deadline {
    pub fn after(budget: Duration) -> Self {
        Self {
            at: Instant::now() + budget,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.at
    }
}
