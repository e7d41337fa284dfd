// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Members, role tags, and the typed ability key.

use std::collections::BTreeMap;
use std::fmt;

/// The coarse role a member plays inside a group.
///
/// `Support` is the role-critical tag: every group wants at least one
/// support member, and both construction strategies place supports first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Role {
    Damage,
    Tank,
    Support,
}

impl Role {
    /// Returns the canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Damage => "damage",
            Role::Tank => "tank",
            Role::Support => "support",
        }
    }

    /// Returns `true` for the role that group coverage is scored on.
    pub fn is_support(&self) -> bool {
        matches!(self, Role::Support)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A tracked capability: a name plus the grade threshold that counts.
///
/// Two requirements with the same name but different thresholds are
/// distinct tracked capabilities, so the key is the pair, not the name.
#[derive(
    Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct AbilityKey {
    /// Capability name as it appears in member grade maps.
    pub name: String,
    /// Minimum grade a carrier must hold.
    pub threshold: u8,
}

impl AbilityKey {
    pub fn new(name: impl Into<String>, threshold: u8) -> Self {
        Self {
            name: name.into(),
            threshold,
        }
    }
}

impl fmt::Display for AbilityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.name, self.threshold)
    }
}

/// One schedulable entity: identity, ownership account, role, and a
/// capability → grade map (grade 0 = not possessed).
///
/// Members are read-only inputs: the planner never mutates them, it only
/// assigns their roster indices to groups.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Member {
    /// Stable identifier, unique within a roster.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Ownership account; no two members of one account may share a group.
    pub account: String,
    /// Coarse role tag.
    pub role: Role,
    /// Capability name → integer grade.
    #[serde(default)]
    pub abilities: BTreeMap<String, u8>,
}

impl Member {
    /// Returns the member's grade for a capability (0 if absent).
    pub fn grade(&self, ability: &str) -> u8 {
        self.abilities.get(ability).copied().unwrap_or(0)
    }

    /// Returns `true` if this member carries the capability at or above
    /// the key's threshold.
    pub fn meets(&self, key: &AbilityKey) -> bool {
        self.grade(&key.name) >= key.threshold
    }
}
