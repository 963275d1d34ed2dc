//! `StateMachine` backed by a propositional network.
//!
//! Each query is one propagation round: force the configuration (plus the
//! joint move for `next_state`, plus init for `initial_state`), drain, and
//! read the answer off the propositions. Consecutive queries on similar
//! configurations only re-evaluate what actually changed.

use tracing::{error, trace, warn};

use crate::core::{GameRng, MachineConfig, Move, Role, RoleId};
use crate::error::MachineError;
use crate::propnet::PropNet;
use crate::state::{BitVector, CacheCheck, Configuration, RoundCache};

use super::engine::StateMachine;
use super::playout::{Deadline, Playout};
use super::propagate::{PropagationStats, Propagator};

/// Incremental propnet state machine.
#[derive(Debug)]
pub struct PropNetMachine {
    net: PropNet,
    propagator: Propagator,
    config: MachineConfig,
    rounds: Option<RoundCache>,
    mismatches: u64,
}

impl PropNetMachine {
    /// Take ownership of a freshly built net with default options.
    pub fn new(net: PropNet) -> Self {
        Self::with_config(net, MachineConfig::default())
    }

    /// Take ownership of a freshly built net.
    pub fn with_config(net: PropNet, config: MachineConfig) -> Self {
        let propagator = Propagator::new(&net);
        let rounds = config
            .verify_rounds
            .then(|| RoundCache::new(config.round_cache_capacity));
        Self {
            net,
            propagator,
            config,
            rounds,
            mismatches: 0,
        }
    }

    /// The underlying net.
    #[must_use]
    pub fn net(&self) -> &PropNet {
        &self.net
    }

    #[must_use]
    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// Work counters across every query so far.
    #[must_use]
    pub fn propagation_stats(&self) -> PropagationStats {
        self.propagator.stats()
    }

    /// Rounds that disagreed with the recorded round for their configuration.
    #[must_use]
    pub fn round_mismatches(&self) -> u64 {
        self.mismatches
    }

    /// Rounds compared against a recorded round. Zero unless `verify_rounds` is set.
    #[must_use]
    pub fn verified_rounds(&self) -> u64 {
        self.rounds.as_ref().map_or(0, RoundCache::hits)
    }

    /// Like `is_terminal`, but reports a round that disagrees with the
    /// recorded round for `state` instead of only logging it.
    pub fn try_is_terminal(&mut self, state: &Configuration) -> Result<bool, MachineError> {
        self.settle(state)?;
        Ok(self.propagator.value(self.net.terminal()))
    }

    /// Random playout from `state`, bounded by `max_playout_depth`.
    pub fn playout(
        &mut self,
        state: &Configuration,
        rng: &mut GameRng,
        deadline: &Deadline,
    ) -> Result<Playout, MachineError> {
        let max_depth = self.config.max_playout_depth;
        self.perform_depth_charge(state, rng, deadline, max_depth)
    }

    /// Propagate `state` with no moves and check it against the round memo.
    fn settle(&mut self, state: &Configuration) -> Result<(), MachineError> {
        self.propagator.force(&mut self.net, state, &[], false);
        self.propagator.drain(&self.net);

        let Some(rounds) = &mut self.rounds else {
            return Ok(());
        };
        match rounds.check(state, self.propagator.current(), self.propagator.next()) {
            CacheCheck::Mismatch => {
                self.mismatches += 1;
                error!(
                    state = ?self.net.describe(state),
                    "propagation differs from the recorded round"
                );
                Err(MachineError::RoundMismatch {
                    configuration: state.clone(),
                })
            }
            CacheCheck::Recorded | CacheCheck::Verified | CacheCheck::Skipped => Ok(()),
        }
    }

    fn check_role(&self, role: RoleId) -> Result<(), MachineError> {
        if role.index() < self.net.roles().len() {
            Ok(())
        } else {
            Err(MachineError::UnknownRole(role))
        }
    }
}

impl StateMachine for PropNetMachine {
    fn roles(&self) -> &[Role] {
        self.net.roles()
    }

    fn initial_state(&mut self) -> Configuration {
        let empty = Configuration::from_bits(BitVector::zeros(self.net.base_count()));
        self.propagator.force(&mut self.net, &empty, &[], true);
        self.propagator.drain(&self.net);
        self.propagator.snapshot(&self.net)
    }

    fn is_terminal(&mut self, state: &Configuration) -> bool {
        let checked = self.try_is_terminal(state);
        debug_assert!(checked.is_ok(), "{:?}", checked);
        // A mismatching round still leaves the net propagated for `state`.
        self.propagator.value(self.net.terminal())
    }

    fn legal_moves(&mut self, state: &Configuration, role: RoleId) -> Result<Vec<Move>, MachineError> {
        self.check_role(role)?;
        self.settle(state)?;

        let moves: Vec<Move> = self
            .net
            .legal_propositions(role)
            .iter()
            .filter(|(id, _)| self.propagator.value(*id))
            .map(|(_, mv)| mv.clone())
            .collect();

        if moves.is_empty() {
            warn!(%role, state = ?self.net.describe(state), "no legal moves");
            return Err(MachineError::NoLegalMoves {
                role,
                configuration: state.clone(),
            });
        }
        Ok(moves)
    }

    fn goal(&mut self, state: &Configuration, role: RoleId) -> Result<u32, MachineError> {
        self.check_role(role)?;
        self.settle(state)?;

        let true_goals: Vec<u32> = self
            .net
            .goal_propositions(role)
            .iter()
            .filter(|(id, _)| self.propagator.value(*id))
            .map(|(_, value)| *value)
            .collect();

        if let [value] = true_goals.as_slice() {
            return Ok(*value);
        }
        warn!(
            %role,
            true_goals = true_goals.len(),
            state = ?self.net.describe(state),
            "goal is not uniquely defined"
        );
        Err(MachineError::GoalDefinition {
            role,
            configuration: state.clone(),
            true_goals: true_goals.len(),
        })
    }

    fn next_state(&mut self, state: &Configuration, joint: &[Move]) -> Result<Configuration, MachineError> {
        let expected = self.net.roles().len();
        if joint.len() != expected {
            return Err(MachineError::JointMoveShape {
                expected,
                got: joint.len(),
            });
        }

        let mut inputs = Vec::with_capacity(joint.len());
        for (role, mv) in RoleId::all(expected).zip(joint) {
            match self.net.input_for_move(role, mv) {
                Some(input) => inputs.push(input),
                // Inputs that never influence the terminal were pruned.
                None => trace!(%role, %mv, "move has no input proposition"),
            }
        }

        self.propagator.force(&mut self.net, state, &inputs, false);
        self.propagator.drain(&self.net);
        Ok(self.propagator.snapshot(&self.net))
    }
}
