//! The frozen propositional network.
//!
//! A `PropNet` is produced by `NetBuilder::build` and never changes shape
//! afterwards. Component handles equal slots, every component has a rank,
//! and all name indexes are resolved. The only mutable state is the
//! explicit value of forced propositions, written by the propagator.

use rustc_hash::FxHashMap;

use crate::core::{Move, Role, RoleId, RoleMap, Sentence};
use crate::error::BuildError;
use crate::state::Configuration;

use super::component::{Component, ComponentId, Gate, PropRole};
use super::order::verify_ranks;
use super::stats::NetStats;

/// Built, slot-ordered network with its indexes.
#[derive(Clone, Debug)]
pub struct PropNet {
    pub(crate) components: Vec<Component>,
    pub(crate) prop_roles: Vec<Option<PropRole>>,
    pub(crate) ranks: Vec<u32>,
    pub(crate) order: Vec<ComponentId>,
    pub(crate) roles: Vec<Role>,
    pub(crate) base_count: usize,
    pub(crate) input_count: usize,
    pub(crate) init: ComponentId,
    pub(crate) terminal: ComponentId,
    pub(crate) bases: FxHashMap<Sentence, ComponentId>,
    pub(crate) inputs: FxHashMap<Sentence, ComponentId>,
    pub(crate) input_moves: RoleMap<FxHashMap<Move, ComponentId>>,
    pub(crate) legals: RoleMap<Vec<(ComponentId, Move)>>,
    pub(crate) goals: RoleMap<Vec<(ComponentId, u32)>>,
    pub(crate) legal_to_input: FxHashMap<ComponentId, ComponentId>,
    pub(crate) input_to_legal: FxHashMap<ComponentId, ComponentId>,
    pub(crate) stats: NetStats,
}

impl PropNet {
    /// Number of components (and slots).
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// True if the net has no components. Never the case for a built net.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Component in `id`'s slot.
    #[inline]
    #[must_use]
    pub fn component(&self, id: ComponentId) -> &Component {
        &self.components[id.index()]
    }

    /// All components in slot order.
    #[must_use]
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Topological rank of a component.
    #[inline]
    #[must_use]
    pub fn rank(&self, id: ComponentId) -> u32 {
        self.ranks[id.index()]
    }

    /// The component with rank `rank`.
    #[inline]
    #[must_use]
    pub fn at_rank(&self, rank: u32) -> ComponentId {
        self.order[rank as usize]
    }

    /// Components in rank order.
    #[must_use]
    pub fn order(&self) -> &[ComponentId] {
        &self.order
    }

    /// Structural role of a proposition; `None` for other gates.
    #[must_use]
    pub fn prop_role(&self, id: ComponentId) -> Option<PropRole> {
        self.prop_roles[id.index()]
    }

    /// Proposition name in `id`'s slot, if it is a proposition.
    #[must_use]
    pub fn name(&self, id: ComponentId) -> Option<&Sentence> {
        self.component(id).name()
    }

    /// Ordered role list.
    #[must_use]
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Index of `role` in the role list.
    #[must_use]
    pub fn role_id(&self, role: &Role) -> Option<RoleId> {
        self.roles
            .iter()
            .position(|r| r == role)
            .map(|i| RoleId::new(i as u8))
    }

    /// Number of base propositions. Bases occupy slots `0..base_count`.
    #[must_use]
    pub fn base_count(&self) -> usize {
        self.base_count
    }

    /// Number of input propositions, in the slots after the bases.
    #[must_use]
    pub fn input_count(&self) -> usize {
        self.input_count
    }

    /// Length of the externally forced slot prefix: bases, inputs and init.
    #[must_use]
    pub fn forced_len(&self) -> usize {
        self.base_count + self.input_count + 1
    }

    /// The init proposition.
    #[must_use]
    pub fn init(&self) -> ComponentId {
        self.init
    }

    /// The terminal proposition.
    #[must_use]
    pub fn terminal(&self) -> ComponentId {
        self.terminal
    }

    /// Base proposition called `name`.
    #[must_use]
    pub fn base(&self, name: &Sentence) -> Option<ComponentId> {
        self.bases.get(name).copied()
    }

    /// Input proposition called `name`.
    #[must_use]
    pub fn input(&self, name: &Sentence) -> Option<ComponentId> {
        self.inputs.get(name).copied()
    }

    /// Input proposition for `role` playing `mv`. `None` if no such input
    /// survived construction.
    #[must_use]
    pub fn input_for_move(&self, role: RoleId, mv: &Move) -> Option<ComponentId> {
        self.input_moves.get(role).get(mv).copied()
    }

    /// Legal propositions of `role` and the moves they allow.
    #[must_use]
    pub fn legal_propositions(&self, role: RoleId) -> &[(ComponentId, Move)] {
        self.legals.get(role)
    }

    /// Goal propositions of `role` and their payoffs.
    #[must_use]
    pub fn goal_propositions(&self, role: RoleId) -> &[(ComponentId, u32)] {
        self.goals.get(role)
    }

    /// The input matching a legal proposition, or the legal matching an
    /// input. `None` if the partner was pruned or never existed.
    #[must_use]
    pub fn legal_input_partner(&self, id: ComponentId) -> Option<ComponentId> {
        self.legal_to_input
            .get(&id)
            .or_else(|| self.input_to_legal.get(&id))
            .copied()
    }

    /// Construction statistics.
    #[must_use]
    pub fn stats(&self) -> &NetStats {
        &self.stats
    }

    /// Names of the base propositions that hold in `config`.
    #[must_use]
    pub fn describe(&self, config: &Configuration) -> Vec<&Sentence> {
        config
            .true_slots()
            .filter_map(|slot| self.name(ComponentId::new(slot as u32)))
            .collect()
    }

    /// Check that every non-transition edge goes from a lower to a higher rank.
    pub fn check_topology(&self) -> Result<(), BuildError> {
        verify_ranks(&self.components, &self.ranks)
    }

    /// Overwrite a forced proposition's explicit value.
    #[inline]
    pub(crate) fn set_explicit(&mut self, id: ComponentId, value: bool) {
        if let Gate::Proposition(p) = &mut self.components[id.index()].gate {
            p.value = value;
        }
    }
}
