// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The [`PartitionStrategy`] trait and strategy implementations.

pub mod greedy;
pub mod skeleton;

use crate::{CapacityTable, Partition, PlannerConfig, PlannerError};
use rand::rngs::SmallRng;
use roster_core::roster::Validated;
use roster_core::Roster;

/// Trait for partition construction strategies.
///
/// Each strategy takes a validated roster, the resolved capacity table,
/// and the run configuration, and produces a [`Partition`] assigning
/// every member to exactly one group.
///
/// Strategies are purely algorithmic — no I/O or system calls — and all
/// randomness flows through the caller-supplied RNG, making them
/// deterministic under a fixed seed and trivially unit-testable.
pub trait PartitionStrategy: Send + Sync {
    /// Human-readable name of this strategy.
    fn name(&self) -> &str;

    /// Produces a partition for the given roster and capacity table.
    fn build(
        &self,
        roster: &Roster<Validated>,
        table: &CapacityTable,
        config: &PlannerConfig,
        rng: &mut SmallRng,
    ) -> Result<Partition, PlannerError>;
}
