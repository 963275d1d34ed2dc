//! Slot and rank assignment.
//!
//! Slots are bit positions: base propositions first, then input
//! propositions, then the init proposition, then everything else. That
//! puts every externally forced bit in one low prefix of the vector, and a
//! configuration snapshot is just the base prefix.
//!
//! Ranks are a topological order of the circuit with the edges out of
//! transitions removed; those edges are the loop between one configuration
//! and the next and are broken by the `next` buffer, not by ordering.

use std::collections::VecDeque;

use crate::error::BuildError;

use super::component::{Component, ComponentId, PropRole};
use super::graph::Graph;

/// Slot layout of a graph about to be frozen.
#[derive(Clone, Debug)]
pub struct SlotLayout {
    /// Graph handles in slot order.
    pub by_slot: Vec<ComponentId>,
    /// Number of base propositions (slots `0..base_count`).
    pub base_count: usize,
    /// Number of input propositions (slots following the bases).
    pub input_count: usize,
}

impl SlotLayout {
    /// Slot of the init proposition.
    #[must_use]
    pub fn init_slot(&self) -> usize {
        self.base_count + self.input_count
    }
}

/// Assign slots to every live component of `graph`.
///
/// Order within each group is creation order, so layouts are stable.
pub fn assign_slots(graph: &Graph, init: ComponentId) -> SlotLayout {
    let bases: Vec<ComponentId> = graph.with_role(PropRole::Base).collect();
    let inputs: Vec<ComponentId> = graph.with_role(PropRole::Input).collect();

    let mut by_slot = Vec::with_capacity(graph.len());
    by_slot.extend(&bases);
    by_slot.extend(&inputs);
    by_slot.push(init);
    by_slot.extend(graph.ids().filter(|&id| {
        id != init && !matches!(graph.role_of(id), Some(PropRole::Base | PropRole::Input))
    }));

    SlotLayout {
        base_count: bases.len(),
        input_count: inputs.len(),
        by_slot,
    }
}

/// Compute ranks for components addressed by slot.
///
/// Kahn's algorithm over the non-transition edges, seeded in slot order.
/// Returns `ranks[slot]`, or `Cycle` if some components can never be
/// ordered.
pub fn assign_ranks(components: &[Component]) -> Result<Vec<u32>, BuildError> {
    let n = components.len();
    let mut pending: Vec<usize> = components
        .iter()
        .map(|c| {
            c.inputs
                .iter()
                .filter(|i| !components[i.index()].is_transition())
                .count()
        })
        .collect();

    let mut ready: VecDeque<usize> = (0..n).filter(|&i| pending[i] == 0).collect();
    let mut ranks = vec![u32::MAX; n];
    let mut next_rank = 0u32;

    while let Some(slot) = ready.pop_front() {
        ranks[slot] = next_rank;
        next_rank += 1;

        let c = &components[slot];
        if c.is_transition() {
            continue;
        }
        for out in &c.outputs {
            let p = &mut pending[out.index()];
            *p -= 1;
            if *p == 0 {
                ready.push_back(out.index());
            }
        }
    }

    if (next_rank as usize) < n {
        return Err(BuildError::Cycle(n - next_rank as usize));
    }
    Ok(ranks)
}

/// Check that every non-transition edge strictly increases rank.
pub fn verify_ranks(components: &[Component], ranks: &[u32]) -> Result<(), BuildError> {
    for (slot, c) in components.iter().enumerate() {
        if c.is_transition() {
            continue;
        }
        for out in &c.outputs {
            if ranks[slot] >= ranks[out.index()] {
                return Err(BuildError::RankViolation {
                    from: slot as u32,
                    to: out.0,
                });
            }
        }
    }
    Ok(())
}
