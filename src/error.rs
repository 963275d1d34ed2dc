//! Error types for net construction and state-machine queries.

use thiserror::Error;

use crate::core::{Role, RoleId, Sentence};
use crate::state::Configuration;

/// Errors that abort building a `PropNet`.
///
/// All of these describe a malformed compiled graph. None are recoverable
/// at runtime.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// The role list is empty.
    #[error("net has no roles")]
    NoRoles,

    /// More roles than a `RoleId` can address.
    #[error("net has {0} roles, at most 255 are supported")]
    TooManyRoles(usize),

    /// No `terminal` proposition.
    #[error("net has no terminal proposition")]
    MissingTerminal,

    /// No `INIT` proposition.
    #[error("net has no init proposition")]
    MissingInit,

    /// More than one proposition with a reserved singleton name.
    #[error("duplicate singleton proposition {0}")]
    DuplicateSingleton(Sentence),

    /// A `(true ...)` proposition whose single input is not a transition.
    #[error("base proposition {0} is not fed by a transition")]
    MalformedBase(Sentence),

    /// A transition without exactly one input and one proposition output.
    #[error("transition {0} must have one input and one proposition output")]
    MalformedTransition(u32),

    /// A gate with the wrong number of inputs for its kind.
    #[error("component {id} ({kind}) has {inputs} inputs")]
    GateArity {
        id: u32,
        kind: &'static str,
        inputs: usize,
    },

    /// A `legal`, `goal` or `does` proposition naming a role not in the role list.
    #[error("proposition {0} names an unknown role")]
    UnknownRole(Sentence),

    /// A role with no legal propositions left after optimisation.
    #[error("role {0} has no legal propositions")]
    NoLegalPropositions(Role),

    /// A goal proposition whose value is not a non-negative integer.
    #[error("goal proposition {0} has a non-numeric value")]
    InvalidGoalValue(Sentence),

    /// The graph has a cycle that does not pass through a transition.
    #[error("net has a cycle through {0} components")]
    Cycle(usize),

    /// An edge violates the topological ranking.
    #[error("edge {from} -> {to} is not rank-increasing")]
    RankViolation { from: u32, to: u32 },

    /// The init and terminal propositions cannot be removed.
    #[error("proposition {0} cannot be removed")]
    Irremovable(Sentence),

    /// A handle that does not refer to a live component.
    #[error("unknown component {0}")]
    UnknownComponent(u32),
}

/// Errors returned by state-machine queries.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MachineError {
    /// A role did not have exactly one true goal proposition.
    #[error("{role} has {true_goals} true goal propositions in {configuration}")]
    GoalDefinition {
        role: RoleId,
        configuration: Configuration,
        true_goals: usize,
    },

    /// A role has no legal move in a configuration.
    #[error("{role} has no legal moves in {configuration}")]
    NoLegalMoves {
        role: RoleId,
        configuration: Configuration,
    },

    /// A joint move with the wrong number of actions.
    #[error("joint move has {got} actions, expected {expected}")]
    JointMoveShape { expected: usize, got: usize },

    /// A role index outside the role list.
    #[error("{0} is not a role of this game")]
    UnknownRole(RoleId),

    /// A propagation round disagreed with the recorded round for the same
    /// configuration.
    #[error("propagation for {configuration} differs from its recorded round")]
    RoundMismatch { configuration: Configuration },

    /// A playout ran past its deadline.
    #[error("deadline expired after {depth} moves")]
    DeadlineExpired { depth: u32 },
}
