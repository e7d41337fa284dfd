// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # roster-core
//!
//! The input data model for the roster partitioning engine.
//!
//! Rather than passing dynamically-typed maps around, this crate defines
//! the minimal strongly-typed vocabulary the planner needs:
//!
//! - [`Role`] — the closed set of coarse role tags.
//! - [`Member`] — one schedulable entity: account, role, graded abilities.
//! - [`AbilityKey`] — a `(name, threshold)` value type replacing
//!   stringly-typed `"name-9"` lookups wherever the threshold matters.
//! - [`AbilityRequirement`] — one tracked capability demand with an
//!   enabled flag.
//! - [`Roster`] — the full member sequence, with a **type-state pattern**
//!   (`Unchecked` → `Validated`).
//! - [`RosterLoader`] — loads rosters and requirement lists from JSON files.
//!
//! # Example
//! ```no_run
//! use roster_core::RosterLoader;
//! use std::path::Path;
//!
//! let roster = RosterLoader::load(Path::new("./roster.json")).unwrap();
//! println!("{}", roster.summary());
//! ```

mod error;
mod loader;
mod member;
mod requirement;
pub mod roster;

pub use error::RosterError;
pub use loader::RosterLoader;
pub use member::{AbilityKey, Member, Role};
pub use requirement::{enabled_keys, AbilityRequirement};
pub use roster::Roster;
