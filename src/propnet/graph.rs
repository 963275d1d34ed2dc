//! Mutable component arena used while a net is being assembled.
//!
//! Handles stay stable for the lifetime of the graph. Removing a component
//! leaves a tombstone and unlinks the handle from every neighbour's edge
//! lists; nothing else is renumbered until the net is frozen.

use crate::error::BuildError;

use super::component::{name_role, Component, ComponentId, Gate, PropRole};

/// Arena of components with tombstones.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Option<Component>>,
    live: usize,
}

impl Graph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live components.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live
    }

    /// True if no component is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Add an unconnected component.
    pub fn add(&mut self, gate: Gate) -> ComponentId {
        let id = ComponentId::new(self.nodes.len() as u32);
        self.nodes.push(Some(Component::new(gate)));
        self.live += 1;
        id
    }

    /// A live component.
    #[must_use]
    pub fn get(&self, id: ComponentId) -> Option<&Component> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    /// A live component, or `UnknownComponent`.
    pub fn try_get(&self, id: ComponentId) -> Result<&Component, BuildError> {
        self.get(id).ok_or(BuildError::UnknownComponent(id.0))
    }

    fn get_mut(&mut self, id: ComponentId) -> Result<&mut Component, BuildError> {
        self.nodes
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(BuildError::UnknownComponent(id.0))
    }

    /// True if `id` refers to a live component.
    #[must_use]
    pub fn contains(&self, id: ComponentId) -> bool {
        self.get(id).is_some()
    }

    /// Handles of all live components in creation order.
    pub fn ids(&self) -> impl Iterator<Item = ComponentId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, n)| n.is_some())
            .map(|(i, _)| ComponentId::new(i as u32))
    }

    /// Add the edge `from -> to`. Edge lists are sets; repeats are ignored.
    pub fn connect(&mut self, from: ComponentId, to: ComponentId) -> Result<(), BuildError> {
        self.try_get(to)?;
        let source = self.get_mut(from)?;
        if source.outputs.contains(&to) {
            return Ok(());
        }
        source.outputs.push(to);
        self.get_mut(to)?.inputs.push(from);
        Ok(())
    }

    /// Delete a component and unlink it from its neighbours.
    pub fn remove(&mut self, id: ComponentId) -> Result<Component, BuildError> {
        let component = self
            .nodes
            .get_mut(id.index())
            .and_then(Option::take)
            .ok_or(BuildError::UnknownComponent(id.0))?;
        self.live -= 1;

        for &parent in &component.inputs {
            if let Ok(p) = self.get_mut(parent) {
                p.outputs.retain(|c| *c != id);
            }
        }
        for &child in &component.outputs {
            if let Ok(c) = self.get_mut(child) {
                c.inputs.retain(|p| *p != id);
            }
        }
        Ok(component)
    }

    /// Remove a one-input, one-output component and wire its input straight
    /// to its output, keeping each neighbour's edge position.
    pub fn splice_out(&mut self, id: ComponentId) -> Result<(), BuildError> {
        let (source, target) = {
            let c = self.try_get(id)?;
            debug_assert!(c.inputs.len() == 1 && c.outputs.len() == 1);
            (c.inputs[0], c.outputs[0])
        };
        self.nodes[id.index()] = None;
        self.live -= 1;

        let src = self.get_mut(source)?;
        let already_linked = src.outputs.contains(&target);
        replace_or_drop(&mut src.outputs, id, target, already_linked);

        let dst = self.get_mut(target)?;
        replace_or_drop(&mut dst.inputs, id, source, already_linked);
        Ok(())
    }

    /// True if the component is a proposition fed by exactly one transition.
    #[must_use]
    pub fn is_base(&self, id: ComponentId) -> bool {
        match self.get(id) {
            Some(c) if c.proposition().is_some() && c.inputs.len() == 1 => self
                .get(c.inputs[0])
                .is_some_and(Component::is_transition),
            _ => false,
        }
    }

    /// Structural role of a proposition; `None` for other gates.
    #[must_use]
    pub fn role_of(&self, id: ComponentId) -> Option<PropRole> {
        let component = self.get(id)?;
        let name = component.name()?;
        if self.is_base(id) {
            return Some(PropRole::Base);
        }
        if let Some(role) = name_role(name) {
            return Some(role);
        }
        Some(if component.inputs.len() == 1 {
            PropRole::View
        } else {
            PropRole::Unclassified
        })
    }

    /// The live propositions whose role is `role`, in creation order.
    pub fn with_role(&self, role: PropRole) -> impl Iterator<Item = ComponentId> + '_ {
        self.ids().filter(move |&id| self.role_of(id) == Some(role))
    }

    /// Number of live edges.
    #[must_use]
    pub fn link_count(&self) -> usize {
        self.nodes.iter().flatten().map(|c| c.outputs.len()).sum()
    }
}

fn replace_or_drop(
    edges: &mut super::component::Edges,
    old: ComponentId,
    new: ComponentId,
    drop: bool,
) {
    if let Some(pos) = edges.iter().position(|e| *e == old) {
        if drop {
            edges.remove(pos);
        } else {
            edges[pos] = new;
        }
    }
}
