// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Needs and tolerance: the validator's demand-side view.
//!
//! A member *needs* every tracked `(capability, threshold)` pair its
//! grade map does not meet, one entry per distinct threshold. From the
//! deficiency counts the calculator derives, per capability, how many
//! groups of a candidate partition must contain at least one
//! non-deficient carrier so that no group of needers is starved of a
//! satisfier. This feeds the validator only; the direct constructor
//! never consults it.

use roster_core::roster::Validated;
use roster_core::{AbilityKey, Roster};

/// Per-member deficiency list.
#[derive(Debug, Clone, serde::Serialize)]
pub struct NeedsEntry {
    /// Roster index of the member.
    pub member_index: usize,
    /// Tracked keys the member does not meet.
    pub missing: Vec<AbilityKey>,
}

/// Per-capability coverage demand.
#[derive(Debug, Clone, serde::Serialize)]
pub struct ToleranceEntry {
    /// The tracked capability.
    pub key: AbilityKey,
    /// Members still deficient in it.
    pub deficient: usize,
    /// Groups that must contain at least one satisfying carrier.
    pub required_groups: usize,
}

/// Computes each member's missing `(capability, threshold)` pairs.
pub fn compute_needs(roster: &Roster<Validated>, tracked_keys: &[AbilityKey]) -> Vec<NeedsEntry> {
    roster
        .iter_members()
        .enumerate()
        .map(|(member_index, member)| NeedsEntry {
            member_index,
            missing: tracked_keys
                .iter()
                .filter(|key| !member.meets(key))
                .cloned()
                .collect(),
        })
        .collect()
}

/// Derives the required group coverage per tracked capability.
///
/// `required_groups = group_count − max(0, group_count − deficient)`:
/// with fewer needers than groups only that many groups demand a
/// carrier, and once needers reach the group count every group does.
pub fn compute_tolerances(
    needs: &[NeedsEntry],
    tracked_keys: &[AbilityKey],
    group_count: usize,
) -> Vec<ToleranceEntry> {
    tracked_keys
        .iter()
        .map(|key| {
            let deficient = needs
                .iter()
                .filter(|entry| entry.missing.contains(key))
                .count();
            ToleranceEntry {
                key: key.clone(),
                deficient,
                required_groups: group_count - group_count.saturating_sub(deficient),
            }
        })
        .collect()
}
