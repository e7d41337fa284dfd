// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `roster-plan inspect` command: display roster composition and
//! capability capacities.
//!
//! Loads the roster and requirement list and prints a breakdown of
//! members, per-capability carrier supply, and the coverage each
//! capability would demand from a partition.

use group_planner::{compute_needs, compute_tolerances, CapacityTable, PlannerConfig};
use roster_core::RosterLoader;
use std::path::PathBuf;

pub fn execute(
    roster_path: PathBuf,
    requirements_path: Option<PathBuf>,
    config: PlannerConfig,
) -> anyhow::Result<()> {
    println!("╔══════════════════════════════════════════════════════╗");
    println!("║            roster-plan · Roster Inspector           ║");
    println!("╚══════════════════════════════════════════════════════╝");
    println!();

    let roster = RosterLoader::load(&roster_path).map_err(|e| {
        anyhow::anyhow!("failed to load roster from '{}': {e}", roster_path.display())
    })?;
    let requirements = match requirements_path.as_deref() {
        Some(path) => RosterLoader::load_requirements(path).map_err(|e| {
            anyhow::anyhow!("failed to load requirements from '{}': {e}", path.display())
        })?,
        None => Vec::new(),
    };

    let group_count = config.group_count(roster.num_members());

    // ── Summary ────────────────────────────────────────────────
    println!("  Roster: {}", roster.summary());
    println!(
        "  Groups: {group_count} × {} members (cap {} per capability)",
        config.group_size, config.ability_cap,
    );
    println!();

    // ── Members ────────────────────────────────────────────────
    println!(
        "  {:<4} {:<24} {:<10} {:<16} {:>5}",
        "Idx", "Name", "Role", "Account", "#Abl",
    );
    println!("  {}", "-".repeat(64));
    for (idx, member) in roster.iter_members().enumerate() {
        println!(
            "  {:<4} {:<24} {:<10} {:<16} {:>5}",
            idx,
            truncate(&member.name, 24),
            member.role.as_str(),
            truncate(&member.account, 16),
            member.abilities.len(),
        );
    }
    println!();

    if requirements.is_empty() {
        println!("  No requirements given; capacity table is empty.");
        println!();
        return Ok(());
    }

    // ── Capacity Table ─────────────────────────────────────────
    let table = CapacityTable::resolve(&roster, &requirements, &config)?;
    println!(
        "  {:<24} {:>8} {:>9} {:>9}",
        "Capability", "Carriers", "Capacity", "Overflow",
    );
    println!("  {}", "-".repeat(54));
    for entry in table.iter() {
        println!(
            "  {:<24} {:>8} {:>9} {:>9}",
            entry.key.to_string(),
            entry.carriers,
            entry.capacity,
            entry.overflow_budget,
        );
    }
    println!();

    // ── Coverage Demands ───────────────────────────────────────
    let keys = table.keys();
    let needs = compute_needs(&roster, &keys);
    let tolerances = compute_tolerances(&needs, &keys, group_count);
    println!(
        "  {:<24} {:>9} {:>15}",
        "Capability", "Deficient", "Required groups",
    );
    println!("  {}", "-".repeat(50));
    for tolerance in &tolerances {
        println!(
            "  {:<24} {:>9} {:>15}",
            tolerance.key.to_string(),
            tolerance.deficient,
            tolerance.required_groups,
        );
    }
    println!();

    Ok(())
}

/// Truncates a string to `max_len` with ellipsis if needed.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len - 3])
    }
}
