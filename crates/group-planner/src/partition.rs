// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Partition: the output of a construction strategy.
//!
//! A partition is an ordered sequence of [`Group`]s assigning every
//! roster member (by index) to exactly one group. It is the unit
//! exchanged between the constructors and the validator; the derived
//! per-group state (account set, support flag, carrier counts) exists so
//! both sides share one vocabulary.

use crate::PlannerError;
use roster_core::{AbilityKey, Member};
use std::collections::{BTreeMap, BTreeSet};

/// One group of members, with derived occupancy state.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Group {
    /// Index of this group in the partition.
    pub index: usize,
    /// Roster indices of the members assigned to this group.
    pub member_indices: Vec<usize>,
    /// Accounts occupied by the members of this group.
    pub accounts: BTreeSet<String>,
    /// Whether the group contains a support member.
    pub has_support: bool,
    /// Carrier count per tracked capability.
    pub ability_counts: BTreeMap<AbilityKey, usize>,
}

impl Group {
    /// Creates an empty group.
    pub fn new(index: usize) -> Self {
        Self {
            index,
            member_indices: Vec::new(),
            accounts: BTreeSet::new(),
            has_support: false,
            ability_counts: BTreeMap::new(),
        }
    }

    /// Returns the number of members in this group.
    pub fn len(&self) -> usize {
        self.member_indices.len()
    }

    /// Returns `true` if the group has no members.
    pub fn is_empty(&self) -> bool {
        self.member_indices.is_empty()
    }

    /// Returns the free slots remaining under the given group size.
    pub fn free_slots(&self, group_size: usize) -> usize {
        group_size.saturating_sub(self.len())
    }

    /// Returns `true` if a member of this account is already present.
    pub fn contains_account(&self, account: &str) -> bool {
        self.accounts.contains(account)
    }

    /// Returns the carrier count for a tracked capability.
    pub fn count_of(&self, key: &AbilityKey) -> usize {
        self.ability_counts.get(key).copied().unwrap_or(0)
    }

    /// Adds a member and updates the derived state for `tracked_keys`.
    pub fn add(&mut self, member_index: usize, member: &Member, tracked_keys: &[AbilityKey]) {
        self.member_indices.push(member_index);
        self.accounts.insert(member.account.clone());
        if member.role.is_support() {
            self.has_support = true;
        }
        for key in tracked_keys {
            if member.meets(key) {
                *self.ability_counts.entry(key.clone()).or_insert(0) += 1;
            }
        }
    }
}

/// The complete partition produced by a construction strategy.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Partition {
    /// Strategy name that produced this partition.
    pub strategy_name: String,
    /// Target members per group.
    pub group_size: usize,
    /// Ordered list of groups.
    pub groups: Vec<Group>,
}

impl Partition {
    /// Returns the total number of groups.
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Returns the total number of members across all groups.
    pub fn total_members(&self) -> usize {
        self.groups.iter().map(|g| g.len()).sum()
    }

    /// Validates totality and uniqueness against a roster of
    /// `num_members`.
    ///
    /// # Checks
    /// - The partition is non-empty.
    /// - Group indices are consecutive starting from 0.
    /// - No group exceeds the group size.
    /// - Every roster index in `0..num_members` appears exactly once.
    pub fn validate(&self, num_members: usize) -> Result<(), PlannerError> {
        if self.groups.is_empty() {
            return Err(self.structural_error("partition contains no groups".into()));
        }

        let mut seen = vec![false; num_members];
        for (expected_idx, group) in self.groups.iter().enumerate() {
            if group.index != expected_idx {
                return Err(self.structural_error(format!(
                    "expected group index {expected_idx}, got {}",
                    group.index,
                )));
            }
            if group.len() > self.group_size {
                return Err(self.structural_error(format!(
                    "group {} has {} members, size limit is {}",
                    group.index,
                    group.len(),
                    self.group_size,
                )));
            }
            for &mi in &group.member_indices {
                match seen.get_mut(mi) {
                    Some(slot) if !*slot => *slot = true,
                    Some(_) => {
                        return Err(self.structural_error(format!(
                            "member index {mi} appears in more than one group",
                        )));
                    }
                    None => {
                        return Err(self.structural_error(format!(
                            "member index {mi} out of range for roster of {num_members}",
                        )));
                    }
                }
            }
        }

        if let Some(missing) = seen.iter().position(|placed| !placed) {
            return Err(self.structural_error(format!(
                "member index {missing} is not assigned to any group",
            )));
        }

        Ok(())
    }

    fn structural_error(&self, detail: String) -> PlannerError {
        PlannerError::StrategyFailed {
            strategy: self.strategy_name.clone(),
            detail,
        }
    }

    /// Returns a human-readable summary of the partition.
    pub fn summary(&self) -> String {
        let sizes: Vec<usize> = self.groups.iter().map(|g| g.len()).collect();
        let covered = self.groups.iter().filter(|g| g.has_support).count();
        format!(
            "Partition '{}': {} groups, {} members, {}/{} groups with support, group sizes: {:?}",
            self.strategy_name,
            self.num_groups(),
            self.total_members(),
            covered,
            self.num_groups(),
            sizes,
        )
    }
}

/// Builder helper for constructing a `Partition` incrementally.
///
/// Used internally by strategy implementations.
pub(crate) struct PartitionBuilder {
    strategy_name: String,
    group_size: usize,
    tracked_keys: Vec<AbilityKey>,
    groups: Vec<Group>,
}

impl PartitionBuilder {
    /// Creates a builder with `group_count` empty groups.
    pub fn new(
        strategy_name: &str,
        group_size: usize,
        group_count: usize,
        tracked_keys: Vec<AbilityKey>,
    ) -> Self {
        Self {
            strategy_name: strategy_name.to_string(),
            group_size,
            tracked_keys,
            groups: (0..group_count).map(Group::new).collect(),
        }
    }

    /// Returns the groups built so far.
    pub fn groups(&self) -> &[Group] {
        &self.groups
    }

    /// Places a member into a group, updating derived state.
    pub fn place(&mut self, group_index: usize, member_index: usize, member: &Member) {
        let keys = &self.tracked_keys;
        self.groups[group_index].add(member_index, member, keys);
    }

    /// Consumes the builder and returns the finished partition.
    pub fn build(self) -> Partition {
        Partition {
            strategy_name: self.strategy_name,
            group_size: self.group_size,
            groups: self.groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::Role;

    fn member(id: &str, account: &str, role: Role, abilities: &[(&str, u8)]) -> Member {
        Member {
            id: id.into(),
            name: id.into(),
            account: account.into(),
            role,
            abilities: abilities
                .iter()
                .map(|&(n, g)| (n.to_string(), g))
                .collect(),
        }
    }

    fn sample_partition() -> Partition {
        let keys = vec![AbilityKey::new("ignite", 9)];
        let mut b = PartitionBuilder::new("test", 2, 2, keys);
        b.place(0, 0, &member("m0", "a0", Role::Support, &[("ignite", 9)]));
        b.place(0, 1, &member("m1", "a1", Role::Damage, &[]));
        b.place(1, 2, &member("m2", "a2", Role::Damage, &[("ignite", 10)]));
        b.place(1, 3, &member("m3", "a3", Role::Damage, &[]));
        b.build()
    }

    #[test]
    fn test_group_derived_state() {
        let p = sample_partition();
        let g0 = &p.groups[0];
        assert!(g0.has_support);
        assert!(g0.contains_account("a0"));
        assert_eq!(g0.count_of(&AbilityKey::new("ignite", 9)), 1);
        assert_eq!(g0.free_slots(2), 0);

        let g1 = &p.groups[1];
        assert!(!g1.has_support);
        assert_eq!(g1.count_of(&AbilityKey::new("ignite", 9)), 1);
    }

    #[test]
    fn test_validate_ok() {
        sample_partition().validate(4).unwrap();
    }

    #[test]
    fn test_validate_missing_member() {
        let p = sample_partition();
        assert!(p.validate(5).is_err());
    }

    #[test]
    fn test_validate_duplicate_member() {
        let mut p = sample_partition();
        p.groups[1].member_indices[1] = 0; // 0 already in group 0
        assert!(p.validate(4).is_err());
    }

    #[test]
    fn test_validate_oversized_group() {
        let keys = vec![];
        let mut b = PartitionBuilder::new("test", 1, 1, keys);
        b.place(0, 0, &member("m0", "a0", Role::Damage, &[]));
        b.place(0, 1, &member("m1", "a1", Role::Damage, &[]));
        let p = b.build();
        assert!(p.validate(2).is_err());
    }

    #[test]
    fn test_validate_empty_partition() {
        let p = Partition {
            strategy_name: "empty".into(),
            group_size: 3,
            groups: vec![],
        };
        assert!(p.validate(0).is_err());
    }

    #[test]
    fn test_summary() {
        let s = sample_partition().summary();
        assert!(s.contains("test"));
        assert!(s.contains("2 groups"));
        assert!(s.contains("4 members"));
    }

    #[test]
    fn test_counts_gate_on_threshold() {
        let keys = vec![AbilityKey::new("ignite", 10)];
        let mut b = PartitionBuilder::new("test", 2, 1, keys);
        // Grade 9 carrier does not count toward the threshold-10 key.
        b.place(0, 0, &member("m0", "a0", Role::Damage, &[("ignite", 9)]));
        let p = b.build();
        assert_eq!(p.groups[0].count_of(&AbilityKey::new("ignite", 10)), 0);
    }
}
