//! Propositional network: components, construction and the frozen net.
//!
//! ## Lifecycle
//!
//! 1. `NetBuilder` (or a `NetDescription`) assembles a mutable `Graph`
//! 2. `build` validates, elides views, prunes, assigns slots and ranks
//! 3. The resulting `PropNet` is handed to a machine and never reshaped
//!
//! ```
//! use propnet_machine::games::counter;
//!
//! let net = counter::build(3).unwrap();
//! assert_eq!(net.base_count(), 4);
//! net.check_topology().unwrap();
//! ```

pub mod builder;
pub mod component;
pub mod graph;
pub mod net;
pub mod optimize;
pub mod order;
pub mod stats;

pub use builder::{GateSpec, NetBuilder, NetDescription};
pub use component::{Component, ComponentId, Gate, PropRole, PropSource, Proposition};
pub use graph::Graph;
pub use net::PropNet;
pub use stats::NetStats;
