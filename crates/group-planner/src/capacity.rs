// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The requirement resolver: per-capability supply, capacity, and
//! overflow budget.
//!
//! For every tracked capability the resolver derives how many carriers a
//! legal partition can hold (`group_count × cap`) and how far supply
//! exceeds that ceiling. The excess is the **overflow budget**: the
//! number of above-cap placements a single construction attempt may
//! accept because there is nowhere legal left to put those carriers.
//! The budget is consumed per attempt, never reused across attempts.

use crate::{PlannerConfig, PlannerError};
use roster_core::roster::Validated;
use roster_core::{enabled_keys, AbilityKey, AbilityRequirement, Roster};

/// Derived capacity data for one tracked capability.
#[derive(Debug, Clone, serde::Serialize)]
pub struct AbilityCapacity {
    /// The tracked capability.
    pub key: AbilityKey,
    /// Per-group carrier cap (the configured constant).
    pub cap: usize,
    /// Members qualifying at or above the threshold.
    pub carriers: usize,
    /// Legal carrier slots across the whole partition.
    pub capacity: usize,
    /// Above-cap placements permitted: `max(0, carriers − capacity)`.
    pub overflow_budget: usize,
}

/// The resolver output: one [`AbilityCapacity`] per tracked capability,
/// in requirement order, plus the run-wide group geometry.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CapacityTable {
    entries: Vec<AbilityCapacity>,
    /// Number of groups in this run.
    pub group_count: usize,
    /// Target members per group.
    pub group_size: usize,
}

impl CapacityTable {
    /// Resolves the requirement list against a roster.
    ///
    /// A requirement with zero carriers is data, not a fault: it yields
    /// capacity that simply causes zero placements later.
    pub fn resolve(
        roster: &Roster<Validated>,
        requirements: &[AbilityRequirement],
        config: &PlannerConfig,
    ) -> Result<Self, PlannerError> {
        config.validate()?;

        let group_count = config.group_count(roster.num_members());
        let capacity = group_count * config.ability_cap;

        let entries = enabled_keys(requirements)
            .into_iter()
            .map(|key| {
                let carriers = roster.carriers_of(&key);
                AbilityCapacity {
                    overflow_budget: carriers.saturating_sub(capacity),
                    cap: config.ability_cap,
                    carriers,
                    capacity,
                    key,
                }
            })
            .collect();

        Ok(Self {
            entries,
            group_count,
            group_size: config.group_size,
        })
    }

    /// Returns the tracked capabilities in requirement order.
    pub fn iter(&self) -> impl Iterator<Item = &AbilityCapacity> {
        self.entries.iter()
    }

    /// Returns the entry for a key, if tracked.
    pub fn get(&self, key: &AbilityKey) -> Option<&AbilityCapacity> {
        self.entries.iter().find(|e| &e.key == key)
    }

    /// Returns the tracked keys in requirement order.
    pub fn keys(&self) -> Vec<AbilityKey> {
        self.entries.iter().map(|e| e.key.clone()).collect()
    }

    /// Returns the number of tracked capabilities.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no capability is tracked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{Member, Role};

    fn carrier(id: &str, account: &str, ability: &str, grade: u8) -> Member {
        let mut abilities = std::collections::BTreeMap::new();
        abilities.insert(ability.to_string(), grade);
        Member {
            id: id.into(),
            name: id.into(),
            account: account.into(),
            role: Role::Damage,
            abilities,
        }
    }

    fn blank(id: &str, account: &str) -> Member {
        Member {
            id: id.into(),
            name: id.into(),
            account: account.into(),
            role: Role::Damage,
            abilities: Default::default(),
        }
    }

    fn roster(members: Vec<Member>) -> Roster<Validated> {
        Roster::new("test".into(), members).validate().unwrap()
    }

    #[test]
    fn test_spec_example_zero_overflow() {
        // 9 members, 3 carriers of "A" at 9, group size 3, cap 2:
        // capacity = 3×2 = 6, overflow = max(0, 3−6) = 0.
        let mut members: Vec<Member> = (0..3)
            .map(|i| carrier(&format!("c{i}"), &format!("acc{i}"), "A", 9))
            .collect();
        members.extend((3..9).map(|i| blank(&format!("m{i}"), &format!("acc{i}"))));

        let table = CapacityTable::resolve(
            &roster(members),
            &[AbilityRequirement::new("A", 9)],
            &PlannerConfig::default(),
        )
        .unwrap();

        assert_eq!(table.group_count, 3);
        let entry = table.get(&AbilityKey::new("A", 9)).unwrap();
        assert_eq!(entry.carriers, 3);
        assert_eq!(entry.capacity, 6);
        assert_eq!(entry.overflow_budget, 0);
    }

    #[test]
    fn test_overflow_when_supply_exceeds_capacity() {
        // 6 members all carrying "A": capacity = 2 groups × 2 = 4,
        // overflow = 2.
        let members: Vec<Member> = (0..6)
            .map(|i| carrier(&format!("c{i}"), &format!("acc{i}"), "A", 9))
            .collect();

        let table = CapacityTable::resolve(
            &roster(members),
            &[AbilityRequirement::new("A", 9)],
            &PlannerConfig::default(),
        )
        .unwrap();

        let entry = table.get(&AbilityKey::new("A", 9)).unwrap();
        assert_eq!(entry.carriers, 6);
        assert_eq!(entry.overflow_budget, 2);
    }

    #[test]
    fn test_zero_carriers_is_not_an_error() {
        let members = vec![blank("m0", "a0"), blank("m1", "a1")];
        let table = CapacityTable::resolve(
            &roster(members),
            &[AbilityRequirement::new("ghost", 10)],
            &PlannerConfig::default(),
        )
        .unwrap();
        let entry = table.get(&AbilityKey::new("ghost", 10)).unwrap();
        assert_eq!(entry.carriers, 0);
        assert_eq!(entry.overflow_budget, 0);
    }

    #[test]
    fn test_threshold_gates_carriers() {
        let members = vec![
            carrier("c0", "a0", "A", 10),
            carrier("c1", "a1", "A", 9),
            blank("m2", "a2"),
        ];
        let table = CapacityTable::resolve(
            &roster(members),
            &[
                AbilityRequirement::new("A", 9),
                AbilityRequirement::new("A", 10),
            ],
            &PlannerConfig::default(),
        )
        .unwrap();
        assert_eq!(table.get(&AbilityKey::new("A", 9)).unwrap().carriers, 2);
        assert_eq!(table.get(&AbilityKey::new("A", 10)).unwrap().carriers, 1);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let members = vec![blank("m0", "a0")];
        let config = PlannerConfig {
            group_size: 0,
            ..Default::default()
        };
        assert!(CapacityTable::resolve(&roster(members), &[], &config).is_err());
    }
}
