//! Net statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

use super::component::{Component, Gate};

/// Shape of a built net.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetStats {
    /// Components left after optimisation.
    pub components: usize,

    /// Proposition components.
    pub propositions: usize,

    pub ands: usize,
    pub ors: usize,
    pub nots: usize,
    pub transitions: usize,
    pub constants: usize,

    /// Directed edges.
    pub links: usize,

    /// View propositions spliced out during construction.
    pub views_elided: usize,

    /// Components removed as disconnected from the terminal proposition.
    pub pruned: usize,
}

impl NetStats {
    /// Count gates and edges of `components`.
    pub fn from_components<'a>(components: impl IntoIterator<Item = &'a Component>) -> Self {
        let mut stats = Self::default();
        for c in components {
            stats.components += 1;
            stats.links += c.outputs.len();
            match c.gate {
                Gate::And => stats.ands += 1,
                Gate::Or => stats.ors += 1,
                Gate::Not => stats.nots += 1,
                Gate::Constant(_) => stats.constants += 1,
                Gate::Proposition(_) => stats.propositions += 1,
                Gate::Transition => stats.transitions += 1,
            }
        }
        stats
    }

    /// Components removed by optimisation.
    #[must_use]
    pub fn removed(&self) -> usize {
        self.views_elided + self.pruned
    }

    /// Average number of outputs per component.
    #[must_use]
    pub fn avg_fanout(&self) -> f64 {
        if self.components == 0 {
            0.0
        } else {
            self.links as f64 / self.components as f64
        }
    }
}
