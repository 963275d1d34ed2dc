//! Construction-time optimisation passes.
//!
//! Both passes only delete components. They run on the mutable `Graph`
//! before slots and ranks exist, so no query can observe a half-optimised
//! net.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;
use tracing::debug;

use crate::error::BuildError;

use super::component::{ComponentId, PropRole};
use super::graph::Graph;

/// Splice out view propositions with exactly one input and one output.
///
/// Only unnamed-role views qualify: legal, goal, terminal and init
/// propositions are kept even when they have the same shape. Runs to a
/// fixed point and returns the number of propositions removed.
pub fn elide_views(graph: &mut Graph) -> Result<usize, BuildError> {
    let mut removed = 0;
    loop {
        let candidates: Vec<ComponentId> = graph.with_role(PropRole::View).collect();
        let mut changed = false;
        for id in candidates {
            // Earlier splices can change a candidate's degree.
            let Some(c) = graph.get(id) else { continue };
            if c.inputs.len() != 1 || c.outputs.len() != 1 {
                continue;
            }
            if graph.role_of(id) != Some(PropRole::View) {
                continue;
            }
            graph.splice_out(id)?;
            removed += 1;
            changed = true;
        }
        if !changed {
            break;
        }
    }
    debug!(removed, "elided view propositions");
    Ok(removed)
}

/// Delete every component not weakly connected to `terminal`.
///
/// Components listed in `keep` survive even when disconnected. Returns the
/// number of components removed.
pub fn prune_disconnected(
    graph: &mut Graph,
    terminal: ComponentId,
    keep: &[ComponentId],
) -> Result<usize, BuildError> {
    let reachable = weakly_connected(graph, terminal)?;

    let dead: Vec<ComponentId> = graph
        .ids()
        .filter(|id| !reachable.contains(id) && !keep.contains(id))
        .collect();

    for &id in &dead {
        graph.remove(id)?;
    }

    debug!(
        removed = dead.len(),
        kept = graph.len(),
        "removed components disconnected from terminal"
    );
    Ok(dead.len())
}

/// Components reachable from `start` following edges in either direction.
pub fn weakly_connected(graph: &Graph, start: ComponentId) -> Result<FxHashSet<ComponentId>, BuildError> {
    graph.try_get(start)?;

    let mut visited = FxHashSet::default();
    let mut frontier = VecDeque::from([start]);
    visited.insert(start);

    while let Some(id) = frontier.pop_front() {
        let c = graph.try_get(id)?;
        for &next in c.inputs.iter().chain(c.outputs.iter()) {
            if visited.insert(next) {
                frontier.push_back(next);
            }
        }
    }
    Ok(visited)
}
