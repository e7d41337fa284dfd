// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Planner configuration loaded from TOML files or constructed programmatically.
//!
//! All the constants the algorithms consume live here: group size, the
//! per-capability cap, the critical-capability set, the mutually-exclusive
//! member sets for the skeleton filler, the retry budgets, and the RNG
//! seed. Nothing in the engine infers these from globals.
//!
//! # TOML Format
//! ```toml
//! group_size = 3
//! ability_cap = 2
//! critical_abilities = ["ignite", "shadow_claw"]
//! exclusive_members = [["alice_main", "bob_main"]]
//! max_attempts = 60
//! fill_retries = 8
//! skeleton_candidates = 10
//! seed = 42
//! ```

use crate::PlannerError;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use std::path::Path;

/// Configuration for one partitioning run.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct PlannerConfig {
    /// Target members per group.
    #[serde(default = "default_group_size")]
    pub group_size: usize,
    /// Per-group carrier cap applied to every tracked capability.
    #[serde(default = "default_ability_cap")]
    pub ability_cap: usize,
    /// Capability names whose coverage shortfall is a hard failure.
    #[serde(default)]
    pub critical_abilities: Vec<String>,
    /// Sets of member ids that must never share a group.
    #[serde(default)]
    pub exclusive_members: Vec<Vec<String>>,
    /// Retry budget for the direct greedy constructor.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Retry budget for filling one skeleton.
    #[serde(default = "default_fill_retries")]
    pub fill_retries: usize,
    /// Number of independent skeletons the skeleton strategy generates.
    #[serde(default = "default_skeleton_candidates")]
    pub skeleton_candidates: usize,
    /// RNG seed; `None` draws from entropy (production default).
    pub seed: Option<u64>,
}

fn default_group_size() -> usize {
    3
}
fn default_ability_cap() -> usize {
    2
}
fn default_max_attempts() -> usize {
    60
}
fn default_fill_retries() -> usize {
    8
}
fn default_skeleton_candidates() -> usize {
    10
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
            ability_cap: default_ability_cap(),
            critical_abilities: Vec::new(),
            exclusive_members: Vec::new(),
            max_attempts: default_max_attempts(),
            fill_retries: default_fill_retries(),
            skeleton_candidates: default_skeleton_candidates(),
            seed: None,
        }
    }
}

impl PlannerConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, PlannerError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            PlannerError::ConfigError(format!("cannot read config '{}': {e}", path.display()))
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, PlannerError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| PlannerError::ConfigError(format!("TOML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, PlannerError> {
        toml::to_string_pretty(self)
            .map_err(|e| PlannerError::ConfigError(format!("TOML serialise error: {e}")))
    }

    /// Fail-fast boundary check for contract violations.
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.group_size == 0 {
            return Err(PlannerError::InvalidConfig("group_size must be ≥ 1".into()));
        }
        if self.ability_cap == 0 {
            return Err(PlannerError::InvalidConfig("ability_cap must be ≥ 1".into()));
        }
        if self.max_attempts == 0 {
            return Err(PlannerError::InvalidConfig(
                "max_attempts must be ≥ 1".into(),
            ));
        }
        Ok(())
    }

    /// Derives the group count for a roster of `num_members`.
    pub fn group_count(&self, num_members: usize) -> usize {
        num_members.div_ceil(self.group_size).max(1)
    }

    /// Returns `true` if a capability name is on the critical list.
    pub fn is_critical(&self, name: &str) -> bool {
        self.critical_abilities.iter().any(|c| c == name)
    }

    /// Returns `true` if the two member ids belong to one exclusive set.
    pub fn are_exclusive(&self, a: &str, b: &str) -> bool {
        self.exclusive_members
            .iter()
            .any(|set| set.iter().any(|m| m == a) && set.iter().any(|m| m == b))
    }

    /// Creates the RNG for this run: seeded when `seed` is set, entropy
    /// otherwise. Tests set the seed for determinism.
    pub fn rng(&self) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        }
    }
}
