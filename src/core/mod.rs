//! Core types: roles, proposition names, RNG, configuration.
//!
//! These are shared by the propnet, the state representation and the
//! machine layer, and know nothing about any of them.

pub mod role;
pub mod term;
pub mod rng;
pub mod config;

pub use role::{Role, RoleId, RoleMap};
pub use term::{Move, ParseError, Sentence, Term};
pub use rng::GameRng;
pub use config::{MachineConfig, NetConfig};
