//! Single-role counter.
//!
//! One role, `player`, whose only move is `count`. The configuration holds
//! exactly one `(true (step k))`; counting advances it by one and the game
//! ends at the final step. The goal at step `k` is `k * 100 / steps`.
//!
//! With `island(true)` the net also carries a blinking lamp that nothing
//! connected to `terminal` reads, for exercising dead-component removal.

use crate::core::{Move, NetConfig, Role, Sentence, Term};
use crate::error::BuildError;
use crate::propnet::{NetBuilder, PropNet};

/// Builder for counter nets.
#[derive(Clone, Debug)]
pub struct CounterBuilder {
    steps: u32,
    island: bool,
}

impl Default for CounterBuilder {
    fn default() -> Self {
        Self {
            steps: 5,
            island: false,
        }
    }
}

impl CounterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of moves until the game ends.
    pub fn steps(mut self, steps: u32) -> Self {
        assert!((1..=100).contains(&steps), "Step count must be 1-100");
        self.steps = steps;
        self
    }

    /// Add a sub-circuit disconnected from `terminal`.
    pub fn island(mut self, island: bool) -> Self {
        self.island = island;
        self
    }

    /// The unoptimised graph.
    pub fn builder(&self) -> Result<NetBuilder, BuildError> {
        let player = Role::new("player");
        let mut b = NetBuilder::new(vec![player.clone()]);
        let n = self.steps as usize;

        let steps: Vec<_> = (0..=n)
            .map(|k| b.proposition(Sentence::base(step_fact(k))))
            .collect();
        let lamp = self
            .island
            .then(|| b.proposition(Sentence::base(Term::constant("lamp"))));

        let counting = b.proposition(Sentence::does(&player, &count()));
        let init = b.proposition(Sentence::proposition("INIT"));

        let not_done = b.not(steps[n])?;
        let legal = b.proposition(Sentence::legal(&player, &count()));
        b.connect(not_done, legal)?;

        let idle = b.not(counting)?;
        for k in 0..=n {
            let stay = b.and(&[steps[k], idle])?;
            let enter = if k == 0 {
                init
            } else {
                b.and(&[steps[k - 1], counting])?
            };
            let any = b.or(&[stay, enter])?;
            let next = b.proposition(Sentence::next(step_fact(k)));
            b.connect(any, next)?;
            b.transition_into(next, steps[k])?;

            let goal = b.proposition(Sentence::goal(&player, (k * 100 / n) as u32));
            b.connect(steps[k], goal)?;
        }

        let terminal = b.proposition(Sentence::proposition("terminal"));
        b.connect(steps[n], terminal)?;

        if let Some(lamp) = lamp {
            let off = b.not(lamp)?;
            b.transition_into(off, lamp)?;
            let glow = b.proposition(Sentence::proposition("glow"));
            b.connect(lamp, glow)?;
        }

        Ok(b)
    }

    /// Build with the given passes.
    pub fn build_with(&self, config: &NetConfig) -> Result<PropNet, BuildError> {
        self.builder()?.build_with(config)
    }
}

/// `count`
pub fn count() -> Move {
    Move::new(Term::constant("count"))
}

/// `(true (step k))`
pub fn step(k: usize) -> Sentence {
    Sentence::base(step_fact(k))
}

fn step_fact(k: usize) -> Term {
    Term::function("step", vec![Term::constant(k.to_string())])
}

/// Counter with `steps` moves and every optimisation pass.
pub fn build(steps: u32) -> Result<PropNet, BuildError> {
    CounterBuilder::new().steps(steps).build_with(&NetConfig::default())
}
