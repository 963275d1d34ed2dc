//! Role identification and per-role data storage.
//!
//! ## Role
//!
//! A named participant in the game, as it appears in `legal`, `goal`
//! and `does` proposition names.
//!
//! ## RoleId / RoleMap
//!
//! Roles are ordered by the compiled game. `RoleId` is the position in
//! that order; `RoleMap` stores one value per role backed by a `Vec`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// Largest number of roles a net may have. `RoleId` is a `u8`.
pub const MAX_ROLES: usize = u8::MAX as usize;

/// A game role, identified by name.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Role(String);

impl Role {
    /// Create a new role.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The role's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Position of a role in the game's ordered role list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoleId(pub u8);

impl RoleId {
    /// Create a new role ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw role index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all role IDs for a game with `role_count` roles,
    /// which must not exceed [`MAX_ROLES`].
    ///
    /// ```
    /// use propnet_machine::core::RoleId;
    ///
    /// let roles: Vec<_> = RoleId::all(2).collect();
    /// assert_eq!(roles, vec![RoleId::new(0), RoleId::new(1)]);
    /// ```
    pub fn all(role_count: usize) -> impl Iterator<Item = RoleId> {
        debug_assert!(role_count <= MAX_ROLES);
        (0..role_count).map(|i| RoleId(i as u8))
    }
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Role {}", self.0)
    }
}

/// Per-role data storage with O(1) access.
///
/// ```
/// use propnet_machine::core::{RoleId, RoleMap};
///
/// let mut legal_counts: RoleMap<usize> = RoleMap::with_default(2);
/// legal_counts[RoleId::new(1)] = 9;
/// assert_eq!(legal_counts[RoleId::new(1)], 9);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleMap<T> {
    data: Vec<T>,
}

impl<T> RoleMap<T> {
    /// Create a new RoleMap with values from a factory function.
    pub fn new(role_count: usize, factory: impl Fn(RoleId) -> T) -> Self {
        assert!(role_count > 0, "Must have at least 1 role");
        assert!(role_count <= MAX_ROLES, "At most 255 roles supported");

        let data = RoleId::all(role_count).map(factory).collect();

        Self { data }
    }

    /// Create a new RoleMap with default values.
    pub fn with_default(role_count: usize) -> Self
    where
        T: Default,
    {
        Self::new(role_count, |_| T::default())
    }

    /// Get a reference to a role's data.
    #[must_use]
    pub fn get(&self, role: RoleId) -> &T {
        &self.data[role.index()]
    }

    /// Get a mutable reference to a role's data.
    pub fn get_mut(&mut self, role: RoleId) -> &mut T {
        &mut self.data[role.index()]
    }

    /// Iterate over (RoleId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (RoleId, &T)> {
        self.data
            .iter()
            .enumerate()
            .map(|(i, v)| (RoleId(i as u8), v))
    }
}

impl<T> Index<RoleId> for RoleMap<T> {
    type Output = T;

    fn index(&self, role: RoleId) -> &Self::Output {
        self.get(role)
    }
}

impl<T> IndexMut<RoleId> for RoleMap<T> {
    fn index_mut(&mut self, role: RoleId) -> &mut Self::Output {
        self.get_mut(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_basics() {
        let role = Role::new("xplayer");
        assert_eq!(role.name(), "xplayer");
        assert_eq!(format!("{}", role), "xplayer");
        assert_eq!(format!("{}", RoleId::new(1)), "Role 1");
    }

    #[test]
    fn test_role_map_new() {
        let map: RoleMap<usize> = RoleMap::new(3, |r| r.index() * 10);

        assert_eq!(map[RoleId::new(0)], 0);
        assert_eq!(map[RoleId::new(2)], 20);
        assert_eq!(map.iter().count(), 3);
    }

    #[test]
    fn test_role_map_mutation_and_iter() {
        let mut map: RoleMap<Vec<u32>> = RoleMap::with_default(2);
        map[RoleId::new(1)].push(7);

        let pairs: Vec<_> = map.iter().map(|(r, v)| (r, v.len())).collect();
        assert_eq!(pairs, vec![(RoleId::new(0), 0), (RoleId::new(1), 1)]);
    }

    #[test]
    fn test_role_map_serialization() {
        let map: RoleMap<i32> = RoleMap::new(2, |r| r.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: RoleMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }

    #[test]
    #[should_panic(expected = "Must have at least 1 role")]
    fn test_role_map_zero_roles() {
        let _: RoleMap<i32> = RoleMap::with_default(0);
    }

    #[test]
    #[should_panic(expected = "At most 255 roles supported")]
    fn test_role_map_too_many_roles() {
        let _: RoleMap<i32> = RoleMap::with_default(MAX_ROLES + 1);
    }

    #[test]
    fn test_all_covers_largest_role_count() {
        let ids: Vec<_> = RoleId::all(MAX_ROLES).collect();
        assert_eq!(ids.len(), MAX_ROLES);
        assert_eq!(ids.last(), Some(&RoleId::new(254)));
    }
}
