use std::time::{Duration, Instant};

/// Time and node budget of a search.
///
/// The clock is only consulted every `check_interval` nodes to keep the overhead negligible,
/// so the time limit can be exceeded by the duration of that many nodes.
#[derive(Debug, Clone)]
pub struct Budget {
    time_limit: Option<Duration>,
    node_limit: Option<u64>,
    check_interval: u64,
    start: Instant,
    nodes: u64,
    exhausted: bool,
}

impl Budget {
    pub fn new(time_limit_ms: Option<u64>, node_limit: Option<u64>) -> Self {
        Self {
            time_limit: time_limit_ms.map(Duration::from_millis),
            node_limit,
            check_interval: 1024,
            start: Instant::now(),
            nodes: 0,
            exhausted: false,
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    pub fn with_check_interval(mut self, check_interval: u64) -> Self {
        self.check_interval = check_interval.max(1);
        self
    }

    /// Registers a visited node. Returns `true` once the budget is exhausted.
    pub fn tick(&mut self) -> bool {
        if self.exhausted {
            return true;
        }
        self.nodes += 1;
        if self.node_limit.is_some_and(|limit| self.nodes > limit) {
            self.exhausted = true;
        } else if self.nodes % self.check_interval == 0 {
            self.exhausted = self.time_is_up();
        }
        self.exhausted
    }

    /// Checks the clock right away, for loops with expensive iterations.
    pub fn time_is_up(&self) -> bool {
        self.time_limit
            .is_some_and(|limit| self.start.elapsed() >= limit)
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn remaining_time(&self) -> Option<Duration> {
        self.time_limit
            .map(|limit| limit.saturating_sub(self.start.elapsed()))
    }
}
