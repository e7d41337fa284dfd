// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `roster-plan plan` command: build a partition and print the groups.
//!
//! Drives the full pipeline:
//! ```text
//! RosterLoader → Roster<Validated> → CapacityTable → strategy → evaluate
//! ```

use group_planner::{
    compute_needs, compute_tolerances, evaluate, CapacityTable, DirectGreedy, Partition,
    PartitionStrategy, PlannerConfig, Report, SkeletonFill,
};
use roster_core::{roster::Validated, AbilityRequirement, Roster, RosterLoader};
use std::path::PathBuf;

pub fn execute(
    roster_path: PathBuf,
    requirements_path: Option<PathBuf>,
    strategy: String,
    seed: Option<u64>,
    group_size: Option<usize>,
    json: bool,
    mut config: PlannerConfig,
) -> anyhow::Result<()> {
    if seed.is_some() {
        config.seed = seed;
    }
    if let Some(size) = group_size {
        config.group_size = size;
    }

    let roster = RosterLoader::load(&roster_path).map_err(|e| {
        anyhow::anyhow!("failed to load roster from '{}': {e}", roster_path.display())
    })?;
    let requirements = load_requirements(requirements_path.as_deref())?;

    let (partition, report) = match strategy.as_str() {
        "auto" => group_planner::auto_partition(&roster, &requirements, &config)?,
        "direct-greedy" => run_single(&DirectGreedy::new(), &roster, &requirements, &config)?,
        "skeleton-fill" => run_single(&SkeletonFill::new(), &roster, &requirements, &config)?,
        other => anyhow::bail!(
            "unknown strategy '{other}' (expected auto, direct-greedy, or skeleton-fill)",
        ),
    };

    if json {
        let payload = serde_json::json!({
            "partition": partition,
            "report": report,
        });
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            roster-plan · Partition Builder          ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();
    println!("  Roster: {}", roster.summary());
    println!("  {}", partition.summary());
    println!();

    // ── Groups ─────────────────────────────────────────────────
    for group in &partition.groups {
        println!("  Group {}:", group.index + 1);
        for &mi in &group.member_indices {
            if let Some(member) = roster.member(mi) {
                println!(
                    "   {:<24} {:<10} account: {}",
                    member.name,
                    member.role.as_str(),
                    member.account,
                );
            }
        }
        println!();
    }

    // ── Report ─────────────────────────────────────────────────
    println!("  {}", report.summary());
    for violation in &report.violations {
        println!("   ⚠ {violation}");
    }
    println!();

    Ok(())
}

/// Runs one named strategy and evaluates its partition.
fn run_single(
    strategy: &dyn PartitionStrategy,
    roster: &Roster<Validated>,
    requirements: &[AbilityRequirement],
    config: &PlannerConfig,
) -> anyhow::Result<(Partition, Report)> {
    let table = CapacityTable::resolve(roster, requirements, config)?;
    let keys = table.keys();
    let group_count = config.group_count(roster.num_members());
    let needs = compute_needs(roster, &keys);
    let tolerances = compute_tolerances(&needs, &keys, group_count);

    let mut rng = config.rng();
    let partition = strategy.build(roster, &table, config, &mut rng)?;
    partition.validate(roster.num_members())?;
    let report = evaluate(&partition, roster, &table, &tolerances, config);
    Ok((partition, report))
}

fn load_requirements(path: Option<&std::path::Path>) -> anyhow::Result<Vec<AbilityRequirement>> {
    match path {
        Some(path) => RosterLoader::load_requirements(path).map_err(|e| {
            anyhow::anyhow!("failed to load requirements from '{}': {e}", path.display())
        }),
        None => Ok(Vec::new()),
    }
}
