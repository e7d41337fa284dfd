// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Skeleton construction strategy: plan accounts first, members second.
//!
//! Instead of placing concrete members directly, this strategy first
//! builds an abstract **skeleton**: one token per member, tagged only
//! with account and role, partitioned into groups so that no group holds
//! two tokens of one account and every group receives a support token
//! whenever the global supply allows it. Concrete members are then
//! filled into the slots of their own account, preferring a role match,
//! and the fill is retried when it collides with the mutually-exclusive
//! member sets or leaves the partition incomplete.
//!
//! A skeleton that cannot be filled within the retry budget is
//! discarded, not an error: the strategy generates several independent
//! skeletons from shuffled account orders and keeps the best-scoring
//! fill.

use crate::partition::PartitionBuilder;
use crate::strategy::PartitionStrategy;
use crate::{evaluate, needs, CapacityTable, Partition, PlannerConfig, PlannerError};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use roster_core::roster::Validated;
use roster_core::{Role, Roster};

/// Per-account summary used for skeleton generation: one role token per
/// member of the account.
#[derive(Debug, Clone)]
pub struct AccountSummary {
    pub account: String,
    pub tokens: Vec<Role>,
}

/// One abstract slot: an account obligation with the originating
/// member's role tag, kept so the filler can prefer a role match.
#[derive(Debug, Clone)]
struct SkeletonSlot {
    account: String,
    role: Role,
}

/// An abstract, member-agnostic group plan.
#[derive(Debug, Clone)]
struct SkeletonGroup {
    slots: Vec<SkeletonSlot>,
}

impl SkeletonGroup {
    fn has_support(&self) -> bool {
        self.slots.iter().any(|s| s.role.is_support())
    }

    fn has_account(&self, account: &str) -> bool {
        self.slots.iter().any(|s| s.account == account)
    }
}

/// A full skeleton: account-tagged slots for every group.
#[derive(Debug, Clone)]
struct Skeleton {
    groups: Vec<SkeletonGroup>,
}

/// Skeleton-then-fill constructor.
#[derive(Debug, Clone, Default)]
pub struct SkeletonFill;

impl SkeletonFill {
    pub fn new() -> Self {
        Self
    }
}

impl PartitionStrategy for SkeletonFill {
    fn name(&self) -> &str {
        "skeleton-fill"
    }

    fn build(
        &self,
        roster: &Roster<Validated>,
        table: &CapacityTable,
        config: &PlannerConfig,
        rng: &mut SmallRng,
    ) -> Result<Partition, PlannerError> {
        config.validate()?;

        let accounts = summarize_accounts(roster);
        let group_count = config.group_count(roster.num_members());
        let keys = table.keys();
        let member_needs = needs::compute_needs(roster, &keys);
        let tolerances = needs::compute_tolerances(&member_needs, &keys, group_count);

        let mut best: Option<(Partition, i64)> = None;
        let mut filled = 0usize;

        for candidate in 0..config.skeleton_candidates.max(1) {
            let mut shuffled = accounts.clone();
            shuffled.shuffle(rng);
            let skeleton = generate_skeleton(&shuffled, group_count, config.group_size);

            let Some(partition) =
                fill_skeleton(self.name(), &skeleton, roster, config, rng)
            else {
                tracing::debug!("skeleton {candidate} could not be filled, discarding");
                continue;
            };
            partition.validate(roster.num_members())?;
            filled += 1;

            let report = evaluate(&partition, roster, table, &tolerances, config);
            if best.as_ref().is_none_or(|(_, s)| report.score > *s) {
                best = Some((partition, report.score));
            }
        }

        tracing::debug!(
            "{}/{} skeletons filled successfully",
            filled,
            config.skeleton_candidates.max(1),
        );

        best.map(|(p, _)| p).ok_or_else(|| PlannerError::StrategyFailed {
            strategy: self.name().to_string(),
            detail: "no skeleton could be filled within the retry budget".into(),
        })
    }
}

/// Collapses the roster into per-account role tokens, in first-appearance
/// order.
pub fn summarize_accounts(roster: &Roster<Validated>) -> Vec<AccountSummary> {
    let mut summaries: Vec<AccountSummary> = Vec::new();
    for member in roster.iter_members() {
        match summaries.iter_mut().find(|s| s.account == member.account) {
            Some(summary) => summary.tokens.push(member.role),
            None => summaries.push(AccountSummary {
                account: member.account.clone(),
                tokens: vec![member.role],
            }),
        }
    }
    summaries
}

/// Partitions account tokens into groups: supports round-robin into
/// uncovered groups first (when supply allows one per group), the rest
/// round-robin into any group with space and no token of that account,
/// then extra passes with shifted offsets for leftovers stranded by
/// account collisions. Underfilled groups are left underfilled rather
/// than doubling an account.
fn generate_skeleton(
    accounts: &[AccountSummary],
    group_count: usize,
    group_size: usize,
) -> Skeleton {
    let mut support_tokens: Vec<SkeletonSlot> = Vec::new();
    let mut other_tokens: Vec<SkeletonSlot> = Vec::new();
    for summary in accounts {
        for &role in &summary.tokens {
            let slot = SkeletonSlot {
                account: summary.account.clone(),
                role,
            };
            if role.is_support() {
                support_tokens.push(slot);
            } else {
                other_tokens.push(slot);
            }
        }
    }

    let mut groups: Vec<SkeletonGroup> = (0..group_count)
        .map(|_| SkeletonGroup { slots: Vec::new() })
        .collect();

    let try_place = |groups: &mut Vec<SkeletonGroup>,
                     slot: &SkeletonSlot,
                     start: usize,
                     require_uncovered: bool|
     -> bool {
        for k in 0..group_count {
            let gi = (start + k) % group_count;
            if require_uncovered && groups[gi].has_support() {
                continue;
            }
            if groups[gi].slots.len() < group_size && !groups[gi].has_account(&slot.account) {
                groups[gi].slots.push(slot.clone());
                return true;
            }
        }
        false
    };

    // Phase 1: one support per group, round-robin, only when the supply
    // can actually cover every group.
    let mut cursor = 0;
    if support_tokens.len() >= group_count {
        let mut remaining = Vec::new();
        for slot in support_tokens {
            let all_covered = groups.iter().all(|g| g.has_support());
            if !all_covered && try_place(&mut groups, &slot, cursor, true) {
                cursor += 1;
            } else {
                remaining.push(slot);
            }
        }
        support_tokens = remaining;
    }

    // Phase 2: everything left, round-robin.
    let mut pool: Vec<SkeletonSlot> = support_tokens;
    pool.extend(other_tokens);
    cursor = 0;
    let mut leftovers = Vec::new();
    for slot in pool {
        if try_place(&mut groups, &slot, cursor, false) {
            cursor += 1;
        } else {
            leftovers.push(slot);
        }
    }

    // Phase 3: extra passes from shifted offsets for collision leftovers.
    for offset in 0..group_count {
        if leftovers.is_empty() {
            break;
        }
        leftovers.retain(|slot| !try_place(&mut groups, slot, offset, false));
    }

    if !leftovers.is_empty() {
        tracing::debug!(
            "{} tokens unplaceable without doubling an account",
            leftovers.len(),
        );
    }

    Skeleton { groups }
}

/// Maps each skeleton slot to a concrete unused member of the slot's
/// account, preferring a role match. Retries the whole fill when a group
/// ends up holding a mutually-exclusive pair or the partition is
/// incomplete; `None` after the retry budget means "try another
/// skeleton".
fn fill_skeleton(
    strategy_name: &str,
    skeleton: &Skeleton,
    roster: &Roster<Validated>,
    config: &PlannerConfig,
    rng: &mut SmallRng,
) -> Option<Partition> {
    let num_members = roster.num_members();
    let keys: Vec<roster_core::AbilityKey> = Vec::new();

    'retry: for _ in 0..config.fill_retries.max(1) {
        let mut used = vec![false; num_members];
        let mut builder = PartitionBuilder::new(
            strategy_name,
            config.group_size,
            skeleton.groups.len(),
            keys.clone(),
        );
        let mut placed = 0usize;

        for (gi, group) in skeleton.groups.iter().enumerate() {
            let mut group_ids: Vec<&str> = Vec::new();

            for slot in &group.slots {
                let mut candidates: Vec<usize> = roster
                    .iter_members()
                    .enumerate()
                    .filter(|(i, m)| !used[*i] && m.account == slot.account)
                    .map(|(i, _)| i)
                    .collect();
                candidates.shuffle(rng);

                let chosen = candidates
                    .iter()
                    .copied()
                    .find(|&i| roster.member(i).is_some_and(|m| m.role == slot.role))
                    .or_else(|| candidates.first().copied());

                let Some(mi) = chosen else { continue 'retry };
                let member = roster.member(mi)?;

                if group_ids.iter().any(|id| config.are_exclusive(id, &member.id)) {
                    continue 'retry;
                }

                group_ids.push(&member.id);
                used[mi] = true;
                builder.place(gi, mi, member);
                placed += 1;
            }
        }

        // Underfilled skeletons surface here as missing members.
        if placed != num_members {
            continue 'retry;
        }
        return Some(builder.build());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_core::{AbilityRequirement, Member};
    use std::collections::BTreeSet;

    fn member(id: &str, account: &str, role: Role) -> Member {
        Member {
            id: id.into(),
            name: id.into(),
            account: account.into(),
            role,
            abilities: Default::default(),
        }
    }

    fn roster(members: Vec<Member>) -> Roster<Validated> {
        Roster::new("test".into(), members).validate().unwrap()
    }

    /// Six members over four accounts with enough supports to cover
    /// both groups.
    fn small_roster() -> Roster<Validated> {
        roster(vec![
            member("s0", "a0", Role::Support),
            member("s1", "a1", Role::Support),
            member("d0", "a2", Role::Damage),
            member("d1", "a3", Role::Damage),
            member("d2", "a0", Role::Damage),
            member("t0", "a1", Role::Tank),
        ])
    }

    fn build_with(r: &Roster<Validated>, config: &PlannerConfig) -> Result<Partition, PlannerError> {
        let table = CapacityTable::resolve(r, &[], config).unwrap();
        let mut rng = config.rng();
        SkeletonFill::new().build(r, &table, config, &mut rng)
    }

    #[test]
    fn test_summarize_accounts_preserves_tokens() {
        let summaries = summarize_accounts(&small_roster());
        assert_eq!(summaries.len(), 4);
        let a0 = summaries.iter().find(|s| s.account == "a0").unwrap();
        assert_eq!(a0.tokens, vec![Role::Support, Role::Damage]);
    }

    #[test]
    fn test_skeleton_account_unique_per_group() {
        let summaries = summarize_accounts(&small_roster());
        let skeleton = generate_skeleton(&summaries, 2, 3);
        for group in &skeleton.groups {
            let accounts: BTreeSet<&str> =
                group.slots.iter().map(|s| s.account.as_str()).collect();
            assert_eq!(accounts.len(), group.slots.len());
        }
    }

    #[test]
    fn test_skeleton_support_per_group_when_supply_allows() {
        let summaries = summarize_accounts(&small_roster());
        let skeleton = generate_skeleton(&summaries, 2, 3);
        // 2 support tokens, 2 groups: both groups covered.
        for group in &skeleton.groups {
            assert!(group.has_support());
        }
    }

    #[test]
    fn test_skeleton_no_coverage_phase_when_supply_short() {
        // One support, three groups: phase 1 is skipped entirely and
        // the single support token still lands somewhere.
        let summaries = summarize_accounts(&roster(
            (0..9)
                .map(|i| {
                    member(
                        &format!("m{i}"),
                        &format!("acc{i}"),
                        if i == 0 { Role::Support } else { Role::Damage },
                    )
                })
                .collect(),
        ));
        let skeleton = generate_skeleton(&summaries, 3, 3);
        let total: usize = skeleton.groups.iter().map(|g| g.slots.len()).sum();
        assert_eq!(total, 9);
        let covered = skeleton.groups.iter().filter(|g| g.has_support()).count();
        assert_eq!(covered, 1);
    }

    #[test]
    fn test_fill_produces_total_partition() {
        let r = small_roster();
        let config = PlannerConfig {
            seed: Some(11),
            ..Default::default()
        };
        let p = build_with(&r, &config).unwrap();
        p.validate(r.num_members()).unwrap();
        assert_eq!(p.total_members(), 6);
    }

    #[test]
    fn test_fill_ragged_last_group() {
        // Seven members, group size 3: the third group has one member
        // and the fill must still be total.
        let members: Vec<Member> = (0..7)
            .map(|i| {
                member(
                    &format!("m{i}"),
                    &format!("acc{i}"),
                    if i < 3 { Role::Support } else { Role::Damage },
                )
            })
            .collect();
        let r = roster(members);
        let config = PlannerConfig {
            seed: Some(12),
            ..Default::default()
        };
        let p = build_with(&r, &config).unwrap();
        p.validate(7).unwrap();
        assert_eq!(p.total_members(), 7);
    }

    #[test]
    fn test_exclusive_pair_never_shares_group() {
        // Two accounts with two members each; x0 and x1 are mutually
        // exclusive, so every legal fill pairs each of them with the
        // other account's non-flagged member.
        let r = roster(vec![
            member("x0", "a0", Role::Support),
            member("y0", "a0", Role::Damage),
            member("x1", "a1", Role::Support),
            member("y1", "a1", Role::Damage),
        ]);
        let config = PlannerConfig {
            group_size: 2,
            exclusive_members: vec![vec!["x0".into(), "x1".into()]],
            fill_retries: 32,
            seed: Some(13),
            ..Default::default()
        };
        let p = build_with(&r, &config).unwrap();
        for group in &p.groups {
            let ids: Vec<&str> = group
                .member_indices
                .iter()
                .map(|&mi| r.member(mi).unwrap().id.as_str())
                .collect();
            assert!(
                !(ids.contains(&"x0") && ids.contains(&"x1")),
                "exclusive pair shared group: {ids:?}",
            );
        }
    }

    #[test]
    fn test_unfillable_exclusive_pair_yields_no_result() {
        // Only two members, both flagged: every fill puts them together,
        // so the strategy must report failure, never a violating group.
        let r = roster(vec![
            member("x0", "a0", Role::Support),
            member("x1", "a1", Role::Damage),
        ]);
        let config = PlannerConfig {
            group_size: 2,
            exclusive_members: vec![vec!["x0".into(), "x1".into()]],
            seed: Some(14),
            ..Default::default()
        };
        let err = build_with(&r, &config).unwrap_err();
        assert!(matches!(err, PlannerError::StrategyFailed { .. }));
    }

    #[test]
    fn test_too_few_accounts_yields_no_result() {
        // Four members of one account, group size 2: no skeleton can
        // fill its groups without doubling the account.
        let members: Vec<Member> = (0..4)
            .map(|i| member(&format!("m{i}"), "only", Role::Damage))
            .collect();
        let r = roster(members);
        let config = PlannerConfig {
            group_size: 2,
            seed: Some(15),
            ..Default::default()
        };
        assert!(build_with(&r, &config).is_err());
    }

    #[test]
    fn test_deterministic_under_seed() {
        let r = small_roster();
        let config = PlannerConfig {
            seed: Some(16),
            ..Default::default()
        };
        let layout = |p: &Partition| -> Vec<Vec<usize>> {
            p.groups.iter().map(|g| g.member_indices.clone()).collect()
        };
        let first = build_with(&r, &config).unwrap();
        let second = build_with(&r, &config).unwrap();
        assert_eq!(layout(&first), layout(&second));
    }
}
