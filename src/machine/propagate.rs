//! Change-driven propagation over a frozen net.
//!
//! The propagator owns the `current` and `next` buffers. A round is:
//!
//! 1. `force`: build the target values of the forced prefix (bases, inputs,
//!    init) on top of the pristine baseline, diff them against `current`
//!    and queue exactly the propositions whose value changes
//! 2. `drain`: pop components lowest rank first, re-evaluate, and queue the
//!    outputs of every component whose value changed
//!
//! Transitions write their input's value into `next` at their output's
//! slot and queue nothing, so a round never crosses into the following
//! configuration. Because every component is queued only after all of its
//! inputs were final, each one is evaluated at most once per round.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::propnet::{ComponentId, PropNet};
use crate::state::{BitVector, Configuration};

/// Work counters across every round run by a propagator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationStats {
    /// Calls to `force`.
    pub rounds: u64,

    /// Components evaluated while draining.
    pub evaluated: u64,

    /// Evaluations that changed a component's value.
    pub changed: u64,
}

impl PropagationStats {
    /// Average evaluations per round.
    #[must_use]
    pub fn evaluated_per_round(&self) -> f64 {
        if self.rounds == 0 {
            0.0
        } else {
            self.evaluated as f64 / self.rounds as f64
        }
    }
}

/// Bit-vector state and worklist of one machine.
#[derive(Clone, Debug)]
pub struct Propagator {
    current: BitVector,
    next: BitVector,
    pristine: BitVector,
    queue: BinaryHeap<Reverse<u32>>,
    queued: BitVector,
    stats: PropagationStats,
}

impl Propagator {
    /// Evaluate the whole net once with nothing forced.
    ///
    /// The result is the pristine baseline every round is forced from.
    /// Expects every explicit value of `net` to be false, as after `build`.
    pub fn new(net: &PropNet) -> Self {
        let n = net.len();
        let mut current = BitVector::zeros(n);
        let mut next = BitVector::zeros(n);

        for &id in net.order() {
            let c = net.component(id);
            let value = c.evaluate(&current);
            if c.is_transition() {
                next.set(c.outputs[0].index(), value);
            } else {
                current.set(id.index(), value);
            }
        }

        Self {
            pristine: current.clone(),
            current,
            next,
            queue: BinaryHeap::new(),
            queued: BitVector::zeros(n),
            stats: PropagationStats::default(),
        }
    }

    /// Force `config`, the given input propositions and optionally init.
    ///
    /// Slots of `config` past the net's base count are ignored. Returns the
    /// number of forced propositions whose value changed.
    pub fn force(
        &mut self,
        net: &mut PropNet,
        config: &Configuration,
        inputs: &[ComponentId],
        init: bool,
    ) -> usize {
        self.stats.rounds += 1;

        let forced = net.forced_len();
        let mut target = self.pristine.prefix(forced);
        for slot in config.true_slots().take_while(|&s| s < net.base_count()) {
            target.insert(slot);
        }
        for input in inputs {
            target.insert(input.index());
        }
        if init {
            target.insert(net.init().index());
        }

        let changed = target.difference(&self.current.prefix(forced));
        let mut count = 0;
        for slot in changed.ones() {
            let id = ComponentId::new(slot as u32);
            net.set_explicit(id, target.get(slot));
            self.enqueue(net.rank(id));
            count += 1;
        }
        count
    }

    /// Propagate until the queue is empty.
    pub fn drain(&mut self, net: &PropNet) {
        while let Some(Reverse(rank)) = self.queue.pop() {
            self.queued.set(rank as usize, false);
            let id = net.at_rank(rank);
            let c = net.component(id);
            let value = c.evaluate(&self.current);
            self.stats.evaluated += 1;
            trace!(component = %id, rank, value, "evaluate");

            if c.is_transition() {
                self.next.set(c.outputs[0].index(), value);
                continue;
            }
            if value == self.current.get(id.index()) {
                continue;
            }

            self.current.set(id.index(), value);
            self.stats.changed += 1;
            for out in &c.outputs {
                self.enqueue(net.rank(*out));
            }
        }
    }

    fn enqueue(&mut self, rank: u32) {
        if !self.queued.get(rank as usize) {
            self.queued.insert(rank as usize);
            self.queue.push(Reverse(rank));
        }
    }

    /// Value of a component after the last round.
    #[inline]
    #[must_use]
    pub fn value(&self, id: ComponentId) -> bool {
        self.current.get(id.index())
    }

    /// The configuration that follows the last round.
    #[must_use]
    pub fn snapshot(&self, net: &PropNet) -> Configuration {
        Configuration::from_bits(self.next.prefix(net.base_count()))
    }

    #[must_use]
    pub fn current(&self) -> &BitVector {
        &self.current
    }

    #[must_use]
    pub fn next(&self) -> &BitVector {
        &self.next
    }

    /// Work done so far.
    #[must_use]
    pub fn stats(&self) -> PropagationStats {
        self.stats
    }
}
