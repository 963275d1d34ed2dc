//! State machines: the query interface and its propnet implementation.
//!
//! - `StateMachine`: what search code calls
//! - `PropNetMachine`: incremental implementation over a built `PropNet`
//! - `Propagator`: the bit-vector buffers and worklist behind it
//!
//! ```
//! use propnet_machine::games::tictactoe;
//! use propnet_machine::machine::{PropNetMachine, StateMachine};
//!
//! let mut machine = PropNetMachine::new(tictactoe::build().unwrap());
//! let start = machine.initial_state();
//! assert!(!machine.is_terminal(&start));
//! assert_eq!(machine.legal_joint_moves(&start).unwrap().len(), 9);
//! ```

pub mod engine;
pub mod playout;
pub mod propagate;
pub mod propnet_machine;

pub use engine::StateMachine;
pub use playout::{Deadline, Playout};
pub use propagate::{PropagationStats, Propagator};
pub use propnet_machine::PropNetMachine;
