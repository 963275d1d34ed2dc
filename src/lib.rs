//! # propnet-machine
//!
//! A game state machine backed by a propositional network: the rules of a
//! turn-based game compiled into a boolean circuit of AND / OR / NOT /
//! constant / proposition / transition components.
//!
//! ## Design Principles
//!
//! 1. **Incremental**: Every query forces a configuration into the net and
//!    re-evaluates only the components whose inputs actually changed.
//!
//! 2. **Snapshots Are Values**: A `Configuration` is a packed bit vector
//!    over the base propositions, comparable and hashable, with no
//!    reference back into the net.
//!
//! 3. **Frozen After Build**: All graph surgery happens on `NetBuilder`.
//!    A built `PropNet` has fixed slots, ranks and indexes.
//!
//! ## Architecture
//!
//! - **Arena Graph**: Components live in a vector and refer to each other
//!   by `ComponentId`; after build a handle is also the component's bit slot.
//!
//! - **Rank-Ordered Worklist**: A min-heap over topological ranks evaluates
//!   each component at most once per round. Transitions write to the `next`
//!   buffer, which is how one configuration leads to the following one.
//!
//! ## Modules
//!
//! - `core`: Roles, proposition names, RNG, configuration
//! - `state`: Bit vectors, configuration snapshots, round memo
//! - `propnet`: Components, construction, optimisation, the frozen net
//! - `machine`: `StateMachine` trait and the propnet implementation
//! - `games`: Hand-wired fixture games

pub mod core;
pub mod error;
pub mod state;
pub mod propnet;
pub mod machine;
pub mod games;

// Re-export commonly used types
pub use crate::core::{
    Role, RoleId, RoleMap,
    Move, Sentence, Term, ParseError,
    GameRng,
    MachineConfig, NetConfig,
};

pub use crate::error::{BuildError, MachineError};

pub use crate::state::{BitVector, Configuration, RoundCache};

pub use crate::propnet::{
    Component, ComponentId, Gate, PropRole,
    NetBuilder, NetDescription, GateSpec,
    PropNet, NetStats,
};

pub use crate::machine::{
    StateMachine, PropNetMachine,
    Deadline, Playout,
    PropagationStats,
};
