//! Net assembly and the interchange format.
//!
//! `NetBuilder` owns the mutable graph while a game compiler (or a test)
//! wires components together. `build` validates the graph, runs the
//! optimisation passes selected by `NetConfig`, assigns slots and ranks,
//! and resolves the name indexes into a frozen `PropNet`.
//!
//! `NetDescription` is the same graph as plain data, for compilers that
//! hand nets over as JSON rather than through the builder calls.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::role::MAX_ROLES;
use crate::core::{Move, NetConfig, Role, RoleId, RoleMap, Sentence};
use crate::error::BuildError;

use super::component::{name_role, Component, ComponentId, Gate, PropRole, PropSource, Proposition};
use super::graph::Graph;
use super::net::PropNet;
use super::optimize::{elide_views, prune_disconnected};
use super::order::{assign_ranks, assign_slots, verify_ranks};
use super::stats::NetStats;

/// Mutable net under construction.
#[derive(Clone, Debug)]
pub struct NetBuilder {
    roles: Vec<Role>,
    graph: Graph,
}

impl NetBuilder {
    /// Start an empty net for a game with the given ordered roles.
    pub fn new(roles: Vec<Role>) -> Self {
        Self {
            roles,
            graph: Graph::new(),
        }
    }

    /// The role list.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// The graph assembled so far.
    #[must_use]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Add an unconnected proposition.
    pub fn proposition(&mut self, name: Sentence) -> ComponentId {
        self.graph.add(Gate::Proposition(Proposition::new(name)))
    }

    /// Add an AND over `inputs`.
    pub fn and(&mut self, inputs: &[ComponentId]) -> Result<ComponentId, BuildError> {
        self.gate(Gate::And, inputs)
    }

    /// Add an OR over `inputs`.
    pub fn or(&mut self, inputs: &[ComponentId]) -> Result<ComponentId, BuildError> {
        self.gate(Gate::Or, inputs)
    }

    /// Add a NOT of `input`.
    pub fn not(&mut self, input: ComponentId) -> Result<ComponentId, BuildError> {
        self.gate(Gate::Not, &[input])
    }

    /// Add a constant.
    pub fn constant(&mut self, value: bool) -> ComponentId {
        self.graph.add(Gate::Constant(value))
    }

    /// Add a transition fed by `input`. Its output still has to be connected.
    pub fn transition(&mut self, input: ComponentId) -> Result<ComponentId, BuildError> {
        self.gate(Gate::Transition, &[input])
    }

    /// Add a transition from `source` into the base proposition `base`.
    pub fn transition_into(
        &mut self,
        source: ComponentId,
        base: ComponentId,
    ) -> Result<ComponentId, BuildError> {
        let t = self.transition(source)?;
        self.graph.connect(t, base)?;
        Ok(t)
    }

    /// Add the edge `from -> to`.
    pub fn connect(&mut self, from: ComponentId, to: ComponentId) -> Result<(), BuildError> {
        self.graph.connect(from, to)
    }

    /// Delete a component and all of its edges.
    ///
    /// The init and terminal propositions cannot be removed.
    pub fn remove_component(&mut self, id: ComponentId) -> Result<(), BuildError> {
        let component = self.graph.try_get(id)?;
        if let Some(name) = component.name() {
            if matches!(name_role(name), Some(PropRole::Init | PropRole::Terminal)) {
                return Err(BuildError::Irremovable(name.clone()));
            }
        }
        self.graph.remove(id)?;
        Ok(())
    }

    fn gate(&mut self, gate: Gate, inputs: &[ComponentId]) -> Result<ComponentId, BuildError> {
        for &input in inputs {
            self.graph.try_get(input)?;
        }
        let id = self.graph.add(gate);
        for &input in inputs {
            self.graph.connect(input, id)?;
        }
        Ok(id)
    }

    /// Build with every optimisation pass enabled.
    pub fn build(self) -> Result<PropNet, BuildError> {
        self.build_with(&NetConfig::default())
    }

    /// Validate, optimise and freeze the net.
    pub fn build_with(self, config: &NetConfig) -> Result<PropNet, BuildError> {
        let Self { roles, mut graph } = self;

        if roles.is_empty() {
            return Err(BuildError::NoRoles);
        }
        if roles.len() > MAX_ROLES {
            return Err(BuildError::TooManyRoles(roles.len()));
        }

        let terminal = find_singleton(&graph, PropRole::Terminal)?.ok_or(BuildError::MissingTerminal)?;
        let init = find_singleton(&graph, PropRole::Init)?.ok_or(BuildError::MissingInit)?;
        validate(&graph)?;

        let mut stats = NetStats::default();
        if config.elide_views {
            stats.views_elided = elide_views(&mut graph)?;
        }
        if config.prune_disconnected {
            stats.pruned = prune_disconnected(&mut graph, terminal, &[init])?;
        }

        let layout = assign_slots(&graph, init);
        let slot_of: FxHashMap<ComponentId, ComponentId> = layout
            .by_slot
            .iter()
            .enumerate()
            .map(|(slot, &old)| (old, ComponentId::new(slot as u32)))
            .collect();
        let remap = |edges: &super::component::Edges| -> Result<super::component::Edges, BuildError> {
            edges
                .iter()
                .map(|e| slot_of.get(e).copied().ok_or(BuildError::UnknownComponent(e.0)))
                .collect()
        };

        let mut components = Vec::with_capacity(layout.by_slot.len());
        let mut prop_roles = Vec::with_capacity(layout.by_slot.len());
        for &old in &layout.by_slot {
            let role = graph.role_of(old);
            let source = graph.try_get(old)?;
            let mut component = Component {
                gate: source.gate.clone(),
                inputs: remap(&source.inputs)?,
                outputs: remap(&source.outputs)?,
            };
            if let Gate::Proposition(p) = &mut component.gate {
                p.value = false;
                p.source = match role {
                    Some(PropRole::Base | PropRole::Input | PropRole::Init) => PropSource::Explicit,
                    _ if component.inputs.len() == 1 => PropSource::Input,
                    _ => PropSource::Explicit,
                };
            }
            components.push(component);
            prop_roles.push(role);
        }

        let ranks = assign_ranks(&components)?;
        verify_ranks(&components, &ranks)?;
        let mut order = vec![ComponentId::new(0); components.len()];
        for (slot, &rank) in ranks.iter().enumerate() {
            order[rank as usize] = ComponentId::new(slot as u32);
        }

        let terminal = slot_of[&terminal];
        let init = ComponentId::new(layout.init_slot() as u32);

        let role_count = roles.len();
        let mut bases = FxHashMap::default();
        let mut inputs = FxHashMap::default();
        let mut input_moves: RoleMap<FxHashMap<Move, ComponentId>> = RoleMap::with_default(role_count);
        let mut legals: RoleMap<Vec<(ComponentId, Move)>> = RoleMap::with_default(role_count);
        let mut goals: RoleMap<Vec<(ComponentId, u32)>> = RoleMap::with_default(role_count);

        for (slot, component) in components.iter().enumerate() {
            let id = ComponentId::new(slot as u32);
            let Some(name) = component.name() else { continue };
            match prop_roles[slot] {
                Some(PropRole::Base) => {
                    bases.insert(name.clone(), id);
                }
                Some(PropRole::Input) => {
                    let (role, mv) = role_and_move(&roles, name)?;
                    input_moves[role].insert(mv, id);
                    inputs.insert(name.clone(), id);
                }
                Some(PropRole::Legal) => {
                    let (role, mv) = role_and_move(&roles, name)?;
                    legals[role].push((id, mv));
                }
                Some(PropRole::Goal) => {
                    let role = role_of_name(&roles, name)?;
                    let value = name
                        .arg(1)
                        .and_then(|t| t.as_constant())
                        .and_then(|c| c.parse::<u32>().ok())
                        .ok_or_else(|| BuildError::InvalidGoalValue(name.clone()))?;
                    goals[role].push((id, value));
                }
                _ => {}
            }
        }

        if let Some((role, _)) = legals.iter().find(|(_, l)| l.is_empty()) {
            return Err(BuildError::NoLegalPropositions(roles[role.index()].clone()));
        }

        let mut legal_to_input = FxHashMap::default();
        let mut input_to_legal = FxHashMap::default();
        for (role, legal) in legals.iter() {
            for (legal_id, mv) in legal {
                if let Some(&input_id) = input_moves[role].get(mv) {
                    legal_to_input.insert(*legal_id, input_id);
                    input_to_legal.insert(input_id, *legal_id);
                }
            }
        }

        let counted = NetStats::from_components(&components);
        let stats = NetStats {
            views_elided: stats.views_elided,
            pruned: stats.pruned,
            ..counted
        };

        debug!(
            components = stats.components,
            propositions = stats.propositions,
            bases = layout.base_count,
            inputs = layout.input_count,
            links = stats.links,
            views_elided = stats.views_elided,
            pruned = stats.pruned,
            "built propnet"
        );

        Ok(PropNet {
            components,
            prop_roles,
            ranks,
            order,
            roles,
            base_count: layout.base_count,
            input_count: layout.input_count,
            init,
            terminal,
            bases,
            inputs,
            input_moves,
            legals,
            goals,
            legal_to_input,
            input_to_legal,
            stats,
        })
    }

    /// The graph as plain data. Handles are renumbered densely.
    #[must_use]
    pub fn to_description(&self) -> NetDescription {
        let ids: Vec<ComponentId> = self.graph.ids().collect();
        let dense: FxHashMap<ComponentId, u32> = ids
            .iter()
            .enumerate()
            .map(|(i, &id)| (id, i as u32))
            .collect();

        let mut components = Vec::with_capacity(ids.len());
        let mut edges = Vec::new();
        for (i, c) in ids.iter().filter_map(|&id| self.graph.get(id)).enumerate() {
            components.push(GateSpec::from(&c.gate));
            edges.extend(c.outputs.iter().map(|o| (i as u32, dense[o])));
        }

        NetDescription {
            roles: self.roles.clone(),
            components,
            edges,
        }
    }
}

/// The unique live proposition whose name has `role`.
fn find_singleton(graph: &Graph, role: PropRole) -> Result<Option<ComponentId>, BuildError> {
    let mut found = None;
    for id in graph.ids() {
        let Some(name) = graph.get(id).and_then(Component::name) else { continue };
        if name_role(name) != Some(role) {
            continue;
        }
        if found.is_some() {
            return Err(BuildError::DuplicateSingleton(name.clone()));
        }
        found = Some(id);
    }
    Ok(found)
}

/// Check per-kind arities and that base propositions are fed by transitions.
fn validate(graph: &Graph) -> Result<(), BuildError> {
    for id in graph.ids() {
        let c = graph.try_get(id)?;
        let inputs = c.inputs.len();
        let arity_ok = match &c.gate {
            Gate::And | Gate::Or => inputs >= 1,
            Gate::Not => inputs == 1,
            Gate::Constant(_) => inputs == 0,
            Gate::Proposition(p) => {
                if p.name.is_relation("true", 1) && !graph.is_base(id) {
                    return Err(BuildError::MalformedBase(p.name.clone()));
                }
                inputs <= 1
            }
            Gate::Transition => {
                let feeds_proposition = c.outputs.len() == 1
                    && graph.get(c.outputs[0]).is_some_and(|o| o.proposition().is_some());
                if inputs != 1 || !feeds_proposition {
                    return Err(BuildError::MalformedTransition(id.0));
                }
                true
            }
        };
        if !arity_ok {
            return Err(BuildError::GateArity {
                id: id.0,
                kind: c.gate.kind(),
                inputs,
            });
        }
    }
    Ok(())
}

fn role_of_name(roles: &[Role], name: &Sentence) -> Result<RoleId, BuildError> {
    name.arg(0)
        .and_then(|t| t.as_constant())
        .and_then(|r| roles.iter().position(|role| role.name() == r))
        .map(|i| RoleId::new(i as u8))
        .ok_or_else(|| BuildError::UnknownRole(name.clone()))
}

fn role_and_move(roles: &[Role], name: &Sentence) -> Result<(RoleId, Move), BuildError> {
    let role = role_of_name(roles, name)?;
    let mv = name
        .arg(1)
        .cloned()
        .map(Move::new)
        .ok_or_else(|| BuildError::UnknownRole(name.clone()))?;
    Ok((role, mv))
}

// === Interchange ===

/// A component kind as plain data.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GateSpec {
    And,
    Or,
    Not,
    Constant { value: bool },
    Proposition { name: Sentence },
    Transition,
}

impl From<&Gate> for GateSpec {
    fn from(gate: &Gate) -> Self {
        match gate {
            Gate::And => GateSpec::And,
            Gate::Or => GateSpec::Or,
            Gate::Not => GateSpec::Not,
            Gate::Constant(value) => GateSpec::Constant { value: *value },
            Gate::Proposition(p) => GateSpec::Proposition {
                name: p.name.clone(),
            },
            Gate::Transition => GateSpec::Transition,
        }
    }
}

impl From<GateSpec> for Gate {
    fn from(spec: GateSpec) -> Self {
        match spec {
            GateSpec::And => Gate::And,
            GateSpec::Or => Gate::Or,
            GateSpec::Not => Gate::Not,
            GateSpec::Constant { value } => Gate::Constant(value),
            GateSpec::Proposition { name } => Gate::Proposition(Proposition::new(name)),
            GateSpec::Transition => Gate::Transition,
        }
    }
}

/// A net as roles, components and directed edges.
///
/// Edges are `(from, to)` pairs of positions in `components`, listed in
/// each component's output order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetDescription {
    pub roles: Vec<Role>,
    pub components: Vec<GateSpec>,
    pub edges: Vec<(u32, u32)>,
}

impl NetDescription {
    /// Replay the description into a builder.
    pub fn into_builder(self) -> Result<NetBuilder, BuildError> {
        let mut builder = NetBuilder::new(self.roles);
        for spec in self.components {
            builder.graph.add(spec.into());
        }
        for (from, to) in self.edges {
            builder.graph.connect(ComponentId::new(from), ComponentId::new(to))?;
        }
        Ok(builder)
    }

    /// Replay and build with `config`.
    pub fn build_with(self, config: &NetConfig) -> Result<PropNet, BuildError> {
        self.into_builder()?.build_with(config)
    }
}
