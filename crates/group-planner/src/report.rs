// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The partition validator and reporter.
//!
//! [`evaluate`] is a pure function over a candidate partition: it
//! recomputes every per-group property from the roster itself (never
//! trusting the constructors' derived state), emits the violation list,
//! and produces the scalar score callers use to rank candidates. Running
//! it twice on the same inputs yields an identical report.
//!
//! A shortfall in any *critical* capability's required group coverage is
//! a hard failure: the score drops to [`HARD_FAILURE_SCORE`] and the
//! remaining non-critical capabilities are not evaluated.

use crate::needs::ToleranceEntry;
use crate::{CapacityTable, Partition, PlannerConfig};
use roster_core::roster::Validated;
use roster_core::{AbilityKey, Roster};
use std::collections::BTreeMap;
use std::fmt;

/// Score assigned to a partition that starves a critical capability.
pub const HARD_FAILURE_SCORE: i64 = -1000;

/// Reward for adequate coverage of a non-critical capability.
const REWARD_HIGH_THRESHOLD: i64 = 10;
const REWARD_LOW_THRESHOLD: i64 = 1;

/// A single rule violation found in a candidate partition.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub enum Violation {
    /// The group contains no support member.
    MissingRoleCoverage { group: usize },
    /// The group contains two or more members of the listed accounts.
    DuplicateAccount { group: usize, accounts: Vec<String> },
    /// The group holds more carriers of a capability than the cap allows,
    /// beyond what the overflow budget can absorb.
    AbilityOverflow {
        group: usize,
        key: AbilityKey,
        count: usize,
        cap: usize,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingRoleCoverage { group } => {
                write!(f, "group {group}: no support member")
            }
            Violation::DuplicateAccount { group, accounts } => {
                write!(f, "group {group}: duplicate accounts {}", accounts.join(", "))
            }
            Violation::AbilityOverflow {
                group,
                key,
                count,
                cap,
            } => {
                write!(f, "group {group}: {key} carriers {count}/{cap}")
            }
        }
    }
}

/// The diagnostic output of one validation pass.
#[derive(Debug, Clone, serde::Serialize)]
pub struct Report {
    /// Strategy that produced the evaluated partition.
    pub strategy_name: String,
    /// Violations found, in group order.
    pub violations: Vec<Violation>,
    /// Ranking score: higher is better; [`HARD_FAILURE_SCORE`] on a
    /// critical shortfall.
    pub score: i64,
    /// The critical capability whose coverage fell short, if any.
    pub failed_critical: Option<AbilityKey>,
}

impl Report {
    /// Returns `true` if no violation was found and no critical
    /// capability fell short.
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.failed_critical.is_none()
    }

    /// Returns `true` if a critical capability fell short.
    pub fn is_hard_failure(&self) -> bool {
        self.failed_critical.is_some()
    }

    /// Returns a human-readable summary of the report.
    pub fn summary(&self) -> String {
        match &self.failed_critical {
            Some(key) => format!(
                "Report '{}': HARD FAILURE (critical {key} undercovered), score {}",
                self.strategy_name, self.score,
            ),
            None => format!(
                "Report '{}': {} violations, score {}",
                self.strategy_name,
                self.violations.len(),
                self.score,
            ),
        }
    }
}

/// Validates a candidate partition and scores it.
///
/// Recomputes per group: role coverage, duplicate accounts, and
/// per-capability carrier counts against `cap` plus the run's overflow
/// budget (consumed across groups in order). Then checks each tolerance
/// entry: critical capabilities short-circuit to a hard failure,
/// non-critical ones contribute a small reward when adequately covered.
pub fn evaluate(
    partition: &Partition,
    roster: &Roster<Validated>,
    table: &CapacityTable,
    tolerances: &[ToleranceEntry],
    config: &PlannerConfig,
) -> Report {
    let mut violations = Vec::new();

    // Per-group structural checks, recomputed from the roster.
    for group in &partition.groups {
        let mut account_counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut has_support = false;
        for &mi in &group.member_indices {
            if let Some(member) = roster.member(mi) {
                *account_counts.entry(member.account.as_str()).or_insert(0) += 1;
                has_support |= member.role.is_support();
            }
        }

        if !has_support {
            violations.push(Violation::MissingRoleCoverage { group: group.index });
        }

        let duplicates: Vec<String> = account_counts
            .iter()
            .filter(|(_, &count)| count > 1)
            .map(|(account, _)| account.to_string())
            .collect();
        if !duplicates.is_empty() {
            violations.push(Violation::DuplicateAccount {
                group: group.index,
                accounts: duplicates,
            });
        }
    }

    // Per-capability cap checks, consuming the overflow budget in group
    // order so repeated evaluation is deterministic.
    for entry in table.iter() {
        let mut remaining = entry.overflow_budget;
        for group in &partition.groups {
            let count = group
                .member_indices
                .iter()
                .filter_map(|&mi| roster.member(mi))
                .filter(|m| m.meets(&entry.key))
                .count();
            let excess = count.saturating_sub(entry.cap);
            if excess == 0 {
                continue;
            }
            if excess <= remaining {
                remaining -= excess;
            } else {
                violations.push(Violation::AbilityOverflow {
                    group: group.index,
                    key: entry.key.clone(),
                    count,
                    cap: entry.cap,
                });
            }
        }
    }

    // Coverage scoring: critical capabilities first, with short-circuit.
    let mut score = 0i64;
    let mut failed_critical = None;

    let (critical, non_critical): (Vec<&ToleranceEntry>, Vec<&ToleranceEntry>) = tolerances
        .iter()
        .partition(|t| config.is_critical(&t.key.name));

    for tolerance in critical {
        let covered = covered_groups(partition, roster, &tolerance.key);
        if covered < tolerance.required_groups {
            tracing::warn!(
                "critical {} covered in {covered}/{} required groups",
                tolerance.key,
                tolerance.required_groups,
            );
            score = HARD_FAILURE_SCORE;
            failed_critical = Some(tolerance.key.clone());
            break;
        }
    }

    if failed_critical.is_none() {
        for tolerance in non_critical {
            let covered = covered_groups(partition, roster, &tolerance.key);
            if covered >= tolerance.required_groups {
                score += if tolerance.key.threshold >= 10 {
                    REWARD_HIGH_THRESHOLD
                } else {
                    REWARD_LOW_THRESHOLD
                };
            }
        }
    }

    Report {
        strategy_name: partition.strategy_name.clone(),
        violations,
        score,
        failed_critical,
    }
}

/// Counts the groups containing at least one carrier of the key.
fn covered_groups(partition: &Partition, roster: &Roster<Validated>, key: &AbilityKey) -> usize {
    partition
        .groups
        .iter()
        .filter(|group| {
            group
                .member_indices
                .iter()
                .filter_map(|&mi| roster.member(mi))
                .any(|m| m.meets(key))
        })
        .count()
}
