//! State machine trait used by search layers.
//!
//! Search code (minimax, MCTS, random playouts) talks to a game only
//! through `StateMachine`:
//! - Which roles play
//! - What the initial configuration is
//! - Which moves are legal and what follows a joint move
//! - When the game ends and what each role scores
//!
//! A joint move is one `Move` per role, in role order.

use crate::core::{GameRng, Move, Role, RoleId};
use crate::error::MachineError;
use crate::state::Configuration;

use super::playout::{Deadline, Playout};

/// Game state machine.
///
/// Queries take `&mut self`: an implementation may reuse internal buffers
/// between calls, so one instance serves one search thread.
pub trait StateMachine {
    /// Roles in game order.
    fn roles(&self) -> &[Role];

    /// The configuration the game starts in.
    fn initial_state(&mut self) -> Configuration;

    /// Whether `state` ends the game.
    fn is_terminal(&mut self, state: &Configuration) -> bool;

    /// Legal moves of `role` in `state`. Never empty on success.
    fn legal_moves(&mut self, state: &Configuration, role: RoleId) -> Result<Vec<Move>, MachineError>;

    /// Payoff of `role` in `state`.
    fn goal(&mut self, state: &Configuration, role: RoleId) -> Result<u32, MachineError>;

    /// The configuration after every role plays its move in `joint`.
    fn next_state(&mut self, state: &Configuration, joint: &[Move]) -> Result<Configuration, MachineError>;

    // === Convenience Methods ===

    /// Number of roles.
    fn role_count(&self) -> usize {
        self.roles().len()
    }

    /// Index of `role` in the role list.
    fn role_id(&self, role: &Role) -> Option<RoleId> {
        self.roles()
            .iter()
            .position(|r| r == role)
            .map(|i| RoleId::new(i as u8))
    }

    /// Payoffs of every role, in role order.
    fn goals(&mut self, state: &Configuration) -> Result<Vec<u32>, MachineError> {
        RoleId::all(self.role_count())
            .map(|role| self.goal(state, role))
            .collect()
    }

    /// Every combination of legal moves, first role varying slowest.
    fn legal_joint_moves(&mut self, state: &Configuration) -> Result<Vec<Vec<Move>>, MachineError> {
        let mut joints: Vec<Vec<Move>> = vec![Vec::new()];
        for role in RoleId::all(self.role_count()) {
            let moves = self.legal_moves(state, role)?;
            joints = joints
                .into_iter()
                .flat_map(|prefix| {
                    moves.iter().map(move |mv| {
                        let mut joint = prefix.clone();
                        joint.push(mv.clone());
                        joint
                    })
                })
                .collect();
        }
        Ok(joints)
    }

    /// One uniformly random legal move per role.
    fn random_joint_move(&mut self, state: &Configuration, rng: &mut GameRng) -> Result<Vec<Move>, MachineError> {
        let mut joint = Vec::with_capacity(self.role_count());
        for role in RoleId::all(self.role_count()) {
            let moves = self.legal_moves(state, role)?;
            let mv = rng.choose(&moves).cloned().ok_or_else(|| MachineError::NoLegalMoves {
                role,
                configuration: state.clone(),
            })?;
            joint.push(mv);
        }
        Ok(joint)
    }

    /// Every legal joint move paired with the configuration it leads to.
    fn next_states(&mut self, state: &Configuration) -> Result<Vec<(Vec<Move>, Configuration)>, MachineError> {
        self.legal_joint_moves(state)?
            .into_iter()
            .map(|joint| {
                let next = self.next_state(state, &joint)?;
                Ok((joint, next))
            })
            .collect()
    }

    /// Play random joint moves from `state` until the game ends.
    ///
    /// Stops early after `max_depth` joint moves (0 = unlimited). The
    /// deadline is polled before each joint move; expiry is an error.
    fn perform_depth_charge(
        &mut self,
        state: &Configuration,
        rng: &mut GameRng,
        deadline: &Deadline,
        max_depth: u32,
    ) -> Result<Playout, MachineError> {
        let mut state = state.clone();
        let mut depth = 0;
        loop {
            if self.is_terminal(&state) {
                return Ok(Playout {
                    state,
                    depth,
                    terminal: true,
                });
            }
            if max_depth != 0 && depth >= max_depth {
                return Ok(Playout {
                    state,
                    depth,
                    terminal: false,
                });
            }
            if deadline.expired() {
                return Err(MachineError::DeadlineExpired { depth });
            }
            let joint = self.random_joint_move(&state, rng)?;
            state = self.next_state(&state, &joint)?;
            depth += 1;
        }
    }
}
