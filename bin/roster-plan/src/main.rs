// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # roster-plan
//!
//! Command-line interface for the guild roster partitioning engine.
//!
//! ## Usage
//! ```bash
//! # Build a partition
//! roster-plan plan --roster ./roster.json --requirements ./requirements.json
//!
//! # Force a specific strategy with a fixed seed
//! roster-plan plan --roster ./roster.json --strategy skeleton-fill --seed 42
//!
//! # Inspect roster composition and capability capacities
//! roster-plan inspect --roster ./roster.json --requirements ./requirements.json
//! ```

mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "roster-plan",
    about = "Partitions a guild roster into constraint-respecting groups",
    version,
    author
)]
struct Cli {
    /// Path to a TOML configuration file (overrides built-in defaults).
    #[arg(short, long, global = true)]
    config: Option<std::path::PathBuf>,

    /// Enable verbose logging (repeat for more: -v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a partition for a roster and print the groups.
    Plan {
        /// Path to the roster JSON file.
        #[arg(short, long)]
        roster: std::path::PathBuf,

        /// Path to the capability requirements JSON file.
        #[arg(short = 'q', long)]
        requirements: Option<std::path::PathBuf>,

        /// Strategy: auto, direct-greedy, skeleton-fill.
        #[arg(short, long, default_value = "auto")]
        strategy: String,

        /// RNG seed for reproducible runs.
        #[arg(long)]
        seed: Option<u64>,

        /// Override the configured members-per-group.
        #[arg(short, long)]
        group_size: Option<usize>,

        /// Emit the partition and report as JSON instead of tables.
        #[arg(long)]
        json: bool,
    },

    /// Inspect a roster: composition, capability capacities, and coverage demands.
    Inspect {
        /// Path to the roster JSON file.
        #[arg(short, long)]
        roster: std::path::PathBuf,

        /// Path to the capability requirements JSON file.
        #[arg(short = 'q', long)]
        requirements: Option<std::path::PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing/logging based on verbosity.
    commands::init_tracing(cli.verbose);

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Plan {
            roster,
            requirements,
            strategy,
            seed,
            group_size,
            json,
        } => commands::plan::execute(roster, requirements, strategy, seed, group_size, json, config),
        Commands::Inspect {
            roster,
            requirements,
        } => commands::inspect::execute(roster, requirements, config),
    }
}
