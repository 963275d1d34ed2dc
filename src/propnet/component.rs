//! Components of a propositional network.
//!
//! A component is one gate of the circuit. Components live in an arena and
//! refer to each other through `ComponentId` handles, never references, so
//! the optimisation passes can unlink and delete nodes freely.
//!
//! Once a net is built the arena is compacted so that a component's handle
//! equals its slot in the machine's bit vectors; `evaluate` relies on that
//! and reads input values straight from the `current` buffer.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::Sentence;
use crate::state::BitVector;

/// Handle into a component arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId(pub u32);

impl ComponentId {
    /// Create a new component ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ComponentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Edge list. Most gates have a handful of neighbours.
pub type Edges = SmallVec<[ComponentId; 4]>;

/// Where a proposition's value comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropSource {
    /// The explicitly set value (base, input, init and input-less propositions).
    Explicit,
    /// The single input's value (view propositions).
    Input,
}

/// A named latch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposition {
    /// The proposition's name.
    pub name: Sentence,
    /// The explicitly set value, used when `source` is `Explicit`.
    pub value: bool,
    /// Decided when the net is built.
    pub source: PropSource,
}

impl Proposition {
    /// Create an unset proposition.
    pub fn new(name: Sentence) -> Self {
        Self {
            name,
            value: false,
            source: PropSource::Explicit,
        }
    }
}

/// The gate kind and its per-kind payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gate {
    /// True iff every input is true.
    And,
    /// True iff any input is true.
    Or,
    /// True iff the single input is false.
    Not,
    /// Fixed value.
    Constant(bool),
    /// Named latch.
    Proposition(Proposition),
    /// Delayed pass-through into the `next` buffer.
    Transition,
}

impl Gate {
    /// Short kind name for diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Gate::And => "and",
            Gate::Or => "or",
            Gate::Not => "not",
            Gate::Constant(_) => "constant",
            Gate::Proposition(_) => "proposition",
            Gate::Transition => "transition",
        }
    }
}

/// Structural role of a proposition, derived from its edges and name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropRole {
    Base,
    Input,
    Legal,
    Goal,
    Init,
    Terminal,
    View,
    Unclassified,
}

/// Role implied by a proposition's name alone.
#[must_use]
pub fn name_role(name: &Sentence) -> Option<PropRole> {
    if name.is_relation("does", 2) {
        Some(PropRole::Input)
    } else if name.is_relation("legal", 2) {
        Some(PropRole::Legal)
    } else if name.is_relation("goal", 2) {
        Some(PropRole::Goal)
    } else if name.is_proposition("terminal") {
        Some(PropRole::Terminal)
    } else if matches!(name, Sentence::Proposition(n) if n.eq_ignore_ascii_case("init")) {
        Some(PropRole::Init)
    } else {
        None
    }
}

/// A gate plus its edges.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    pub gate: Gate,
    pub inputs: Edges,
    pub outputs: Edges,
}

impl Component {
    /// Create an unconnected component.
    pub fn new(gate: Gate) -> Self {
        Self {
            gate,
            inputs: Edges::new(),
            outputs: Edges::new(),
        }
    }

    /// The proposition payload, if this is a proposition.
    #[must_use]
    pub fn proposition(&self) -> Option<&Proposition> {
        match &self.gate {
            Gate::Proposition(p) => Some(p),
            _ => None,
        }
    }

    /// The proposition name, if this is a proposition.
    #[must_use]
    pub fn name(&self) -> Option<&Sentence> {
        self.proposition().map(|p| &p.name)
    }

    /// True for transitions.
    #[must_use]
    pub fn is_transition(&self) -> bool {
        matches!(self.gate, Gate::Transition)
    }

    /// Compute this component's value from the `current` buffer.
    ///
    /// Input handles must be slots. A transition returns its input's value;
    /// the caller writes that into `next` at the output's slot.
    #[inline]
    #[must_use]
    pub fn evaluate(&self, current: &BitVector) -> bool {
        match &self.gate {
            Gate::And => self.inputs.iter().all(|i| current.get(i.index())),
            Gate::Or => self.inputs.iter().any(|i| current.get(i.index())),
            Gate::Not => !current.get(self.inputs[0].index()),
            Gate::Constant(value) => *value,
            Gate::Transition => current.get(self.inputs[0].index()),
            Gate::Proposition(p) => match p.source {
                PropSource::Explicit => p.value,
                PropSource::Input => current.get(self.inputs[0].index()),
            },
        }
    }
}
