//! Cooperative deadlines and playout results.

use std::time::{Duration, Instant};

use crate::state::Configuration;

/// A point in time after which long-running work should stop.
///
/// Checked between whole joint moves, never inside a propagation round.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Deadline(Option<Instant>);

impl Deadline {
    /// A deadline that never expires.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Expire `budget` from now.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self(Some(Instant::now() + budget))
    }

    /// Expire at `instant`.
    #[must_use]
    pub const fn at(instant: Instant) -> Self {
        Self(Some(instant))
    }

    /// True once the deadline has passed.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }

    /// Time left, `None` for an unbounded deadline.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.0.map(|at| at.saturating_duration_since(Instant::now()))
    }
}

/// Where a random playout stopped.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Playout {
    /// The last configuration reached.
    pub state: Configuration,

    /// Joint moves played.
    pub depth: u32,

    /// Whether `state` is terminal. False if the depth limit stopped the
    /// playout first.
    pub terminal: bool,
}
