// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # group-planner
//!
//! Partitions a validated `Roster` into fixed-size groups under
//! account-uniqueness, role-coverage, and capability-cap constraints,
//! using pluggable construction strategies and a scoring validator.
//!
//! # Strategies
//!
//! | Strategy | Approach | Strength |
//! |---|---|---|
//! | [`DirectGreedy`] | Scored member-by-member placement, legality gate, retries | Fast, good coverage density |
//! | [`SkeletonFill`] | Abstract account skeleton first, members filled second | Robust on account-heavy rosters |
//!
//! Both are heuristic: the validator ([`evaluate`]) recomputes every
//! constraint from the roster and scores each candidate, so callers can
//! compare strategies on equal footing.
//!
//! # Trait-Based Extensibility
//!
//! All strategies implement [`PartitionStrategy`], so new strategies can
//! be added without modifying the engine:
//!
//! ```ignore
//! struct MyCustomStrategy;
//! impl PartitionStrategy for MyCustomStrategy {
//!     fn name(&self) -> &str { "custom" }
//!     fn build(&self, roster: &Roster<Validated>, table: &CapacityTable,
//!         config: &PlannerConfig, rng: &mut SmallRng)
//!         -> Result<Partition, PlannerError> { /* ... */ }
//! }
//! ```
//!
//! # Example
//! ```no_run
//! use group_planner::{auto_partition, PlannerConfig};
//! use roster_core::RosterLoader;
//! use std::path::Path;
//!
//! let roster = RosterLoader::load(Path::new("./roster.json")).unwrap();
//! let requirements = RosterLoader::load_requirements(Path::new("./requirements.json")).unwrap();
//! let (partition, report) = auto_partition(&roster, &requirements, &PlannerConfig::default()).unwrap();
//! println!("{}", partition.summary());
//! println!("{}", report.summary());
//! ```

pub mod capacity;
pub mod config;
mod error;
pub mod needs;
pub(crate) mod partition;
pub mod report;
pub mod strategy;

pub use capacity::{AbilityCapacity, CapacityTable};
pub use config::PlannerConfig;
pub use error::PlannerError;
pub use needs::{compute_needs, compute_tolerances, NeedsEntry, ToleranceEntry};
pub use partition::{Group, Partition};
pub use report::{evaluate, Report, Violation, HARD_FAILURE_SCORE};
pub use strategy::greedy::DirectGreedy;
pub use strategy::skeleton::SkeletonFill;
pub use strategy::PartitionStrategy;

use roster_core::roster::Validated;
use roster_core::{AbilityRequirement, Roster};

/// Runs both construction strategies and keeps the best-scoring result.
///
/// The capacity table, needs, and tolerances are resolved once and shared.
/// A strategy that cannot produce any partition (the skeleton filler on a
/// roster with too few accounts, say) is logged and skipped; the call
/// fails only when no strategy produces one.
pub fn auto_partition(
    roster: &Roster<Validated>,
    requirements: &[AbilityRequirement],
    config: &PlannerConfig,
) -> Result<(Partition, Report), PlannerError> {
    config.validate()?;

    let table = CapacityTable::resolve(roster, requirements, config)?;
    let group_count = config.group_count(roster.num_members());
    let keys = table.keys();
    let member_needs = compute_needs(roster, &keys);
    let tolerances = compute_tolerances(&member_needs, &keys, group_count);
    let mut rng = config.rng();

    let strategies: [Box<dyn PartitionStrategy>; 2] =
        [Box::new(DirectGreedy::new()), Box::new(SkeletonFill::new())];

    let mut best: Option<(Partition, Report)> = None;
    for strategy in &strategies {
        let partition = match strategy.build(roster, &table, config, &mut rng) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("strategy '{}' produced nothing: {e}", strategy.name());
                continue;
            }
        };
        partition.validate(roster.num_members())?;

        let report = evaluate(&partition, roster, &table, &tolerances, config);
        tracing::info!(
            "strategy '{}' scored {} ({} violations)",
            strategy.name(),
            report.score,
            report.violations.len(),
        );
        if best.as_ref().is_none_or(|(_, r)| report.score > r.score) {
            best = Some((partition, report));
        }
    }

    best.ok_or_else(|| PlannerError::StrategyFailed {
        strategy: "auto".to_string(),
        detail: "no strategy produced a partition".into(),
    })
}
