//! Construction and runtime configuration.
//!
//! - `NetConfig`: which optimisation passes run while a net is built
//! - `MachineConfig`: runtime options of the state machine
//!
//! Both are plain serde structs with `Default` and `with_*` builders so they
//! can be loaded from a file or set up inline.

use serde::{Deserialize, Serialize};

/// Optimisation passes applied by `NetBuilder::build_with`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetConfig {
    /// Splice out view propositions with exactly one input and one output.
    pub elide_views: bool,

    /// Delete components not weakly connected to the terminal proposition.
    pub prune_disconnected: bool,
}

impl Default for NetConfig {
    fn default() -> Self {
        Self {
            elide_views: true,
            prune_disconnected: true,
        }
    }
}

impl NetConfig {
    /// A configuration with every optimisation pass disabled.
    #[must_use]
    pub fn unoptimized() -> Self {
        Self {
            elide_views: false,
            prune_disconnected: false,
        }
    }

    /// Enable or disable view elision.
    pub fn with_elide_views(mut self, enabled: bool) -> Self {
        self.elide_views = enabled;
        self
    }

    /// Enable or disable dead-component removal.
    pub fn with_prune_disconnected(mut self, enabled: bool) -> Self {
        self.prune_disconnected = enabled;
        self
    }
}

/// Runtime options for a `PropNetMachine`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Memoize the bit vectors of each configuration on first sight and
    /// compare every later round for the same configuration against them.
    /// Costs memory and a comparison per query; meant for debugging nets.
    pub verify_rounds: bool,

    /// Maximum number of configurations remembered by `verify_rounds`.
    pub round_cache_capacity: usize,

    /// Maximum number of joint moves in a single playout (0 = unlimited).
    pub max_playout_depth: u32,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            verify_rounds: false,
            round_cache_capacity: 4096,
            max_playout_depth: 0,
        }
    }
}

impl MachineConfig {
    /// Enable or disable round verification.
    pub fn with_verify_rounds(mut self, enabled: bool) -> Self {
        self.verify_rounds = enabled;
        self
    }

    /// Set the verification cache capacity.
    pub fn with_round_cache_capacity(mut self, capacity: usize) -> Self {
        self.round_cache_capacity = capacity;
        self
    }

    /// Set the playout depth limit.
    pub fn with_max_playout_depth(mut self, depth: u32) -> Self {
        self.max_playout_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_configs() {
        let net = NetConfig::default();
        assert!(net.elide_views);
        assert!(net.prune_disconnected);

        let machine = MachineConfig::default();
        assert!(!machine.verify_rounds);
        assert_eq!(machine.max_playout_depth, 0);
    }

    #[test]
    fn test_builder_pattern() {
        let net = NetConfig::unoptimized().with_prune_disconnected(true);
        assert!(!net.elide_views);
        assert!(net.prune_disconnected);

        let machine = MachineConfig::default()
            .with_verify_rounds(true)
            .with_round_cache_capacity(16)
            .with_max_playout_depth(200);
        assert!(machine.verify_rounds);
        assert_eq!(machine.round_cache_capacity, 16);
        assert_eq!(machine.max_playout_depth, 200);
    }

    #[test]
    fn test_serialization() {
        let config = MachineConfig::default().with_max_playout_depth(9);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: MachineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, deserialized);
    }
}
