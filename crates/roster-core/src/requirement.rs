// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Capability requirements: the demand side of the partitioning problem.
//!
//! A requirement list is translated externally from the weekly
//! capability-source catalog; this crate only consumes it. Only enabled
//! requirements participate in planning.

use crate::AbilityKey;

/// One capability demand: name, grade threshold, and an enabled flag.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AbilityRequirement {
    /// Capability name.
    pub name: String,
    /// Required grade threshold.
    pub threshold: u8,
    /// Disabled requirements are ignored entirely.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl AbilityRequirement {
    pub fn new(name: impl Into<String>, threshold: u8) -> Self {
        Self {
            name: name.into(),
            threshold,
            enabled: true,
        }
    }

    /// Returns the tracked-capability key for this requirement.
    pub fn key(&self) -> AbilityKey {
        AbilityKey::new(self.name.clone(), self.threshold)
    }
}

/// Returns the deduplicated tracked keys of the enabled requirements,
/// preserving requirement order. Order matters: the direct constructor
/// places carriers capability-by-capability in this order.
pub fn enabled_keys(requirements: &[AbilityRequirement]) -> Vec<AbilityKey> {
    let mut keys: Vec<AbilityKey> = Vec::new();
    for req in requirements.iter().filter(|r| r.enabled) {
        let key = req.key();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }
    keys
}
