//! Hand-wired fixture games.
//!
//! Small nets shaped like compiler output, used by tests, benchmarks and
//! documentation:
//! - `tictactoe`: two roles, simultaneous-move encoding with `noop`, view
//!   propositions for elision and init-driven transitions
//! - `counter`: one role counting to a fixed step, optionally carrying a
//!   disconnected sub-circuit

pub mod counter;
pub mod tictactoe;

pub use counter::CounterBuilder;
