// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for the partitioning engine.

/// Errors that can occur during partition planning.
///
/// Infeasibility is *not* an error: an attempt that cannot place every
/// member triggers a retry, and an exhausted retry budget triggers the
/// fallback pass, which still returns a partition annotated with
/// violations. Errors here are contract violations at the boundary.
#[derive(Debug, thiserror::Error)]
pub enum PlannerError {
    /// The planner configuration is invalid (e.g., zero group size).
    #[error("invalid planner configuration: {0}")]
    InvalidConfig(String),

    /// The configuration file could not be read or parsed.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// The chosen strategy cannot produce any partition.
    #[error("strategy '{strategy}' failed: {detail}")]
    StrategyFailed { strategy: String, detail: String },

    /// A roster error prevented planning.
    #[error("roster error: {0}")]
    RosterError(#[from] roster_core::RosterError),
}
