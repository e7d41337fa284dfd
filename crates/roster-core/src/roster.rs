// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The roster: the complete ordered member sequence for one planning run.
//!
//! # Type-State Pattern
//!
//! The roster transitions through states enforced at compile time:
//!
//! ```text
//! Roster<Unchecked>   — members parsed, not yet checked.
//!       │  .validate()
//!       ▼
//! Roster<Validated>   — ids unique, accounts present, ready to partition.
//! ```
//!
//! This prevents either construction strategy from ever receiving a
//! malformed roster. The transition consumes the old state and returns
//! the new one; the marker types are zero-sized.

use crate::{AbilityKey, Member, Role, RosterError};
use std::collections::BTreeSet;
use std::fmt;

// ── Type-state markers ─────────────────────────────────────────────

/// Marker: roster has been built but not validated.
#[derive(Debug, Clone)]
pub struct Unchecked;

/// Marker: roster has been validated and is ready for partitioning.
#[derive(Debug, Clone)]
pub struct Validated;

/// Sealed trait for roster states.
pub trait RosterState: fmt::Debug + Clone {}
impl RosterState for Unchecked {}
impl RosterState for Validated {}

// ── Roster ─────────────────────────────────────────────────────────

/// The ordered member sequence handed to the planner.
///
/// Members are immutable for the duration of one partitioning run; the
/// planner refers to them by roster index.
#[derive(Debug, Clone)]
pub struct Roster<S: RosterState = Unchecked> {
    /// Human-readable roster name (e.g., a guild or server label).
    pub name: String,
    /// Ordered member list.
    members: Vec<Member>,
    /// State marker (zero-sized, compile-time only).
    _state: std::marker::PhantomData<S>,
}

// ── Unchecked state ────────────────────────────────────────────────

impl Roster<Unchecked> {
    /// Creates a new roster in the `Unchecked` state.
    pub fn new(name: String, members: Vec<Member>) -> Self {
        Self {
            name,
            members,
            _state: std::marker::PhantomData,
        }
    }

    /// Validates the roster and transitions to the `Validated` state.
    ///
    /// # Checks
    /// - The roster is non-empty.
    /// - Member ids are unique.
    /// - Every member has a non-empty account identifier.
    pub fn validate(self) -> Result<Roster<Validated>, RosterError> {
        if self.members.is_empty() {
            return Err(RosterError::EmptyRoster);
        }

        let mut seen_ids = BTreeSet::new();
        for member in &self.members {
            if !seen_ids.insert(member.id.as_str()) {
                return Err(RosterError::DuplicateMember {
                    id: member.id.clone(),
                });
            }
            if member.account.trim().is_empty() {
                return Err(RosterError::InvalidMember {
                    member: member.id.clone(),
                    detail: "empty account identifier".into(),
                });
            }
        }

        Ok(Roster {
            name: self.name,
            members: self.members,
            _state: std::marker::PhantomData,
        })
    }
}

// ── Validated state ────────────────────────────────────────────────

impl Roster<Validated> {
    /// Returns the total number of members.
    pub fn num_members(&self) -> usize {
        self.members.len()
    }

    /// Returns an iterator over the members in roster order.
    pub fn iter_members(&self) -> impl Iterator<Item = &Member> {
        self.members.iter()
    }

    /// Returns a reference to a member by roster index.
    pub fn member(&self, index: usize) -> Option<&Member> {
        self.members.get(index)
    }

    /// Returns the number of distinct accounts.
    pub fn num_accounts(&self) -> usize {
        self.members
            .iter()
            .map(|m| m.account.as_str())
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Returns the number of support members.
    pub fn support_count(&self) -> usize {
        self.members.iter().filter(|m| m.role.is_support()).count()
    }

    /// Returns the number of members carrying the capability at or above
    /// the key's threshold.
    pub fn carriers_of(&self, key: &AbilityKey) -> usize {
        self.members.iter().filter(|m| m.meets(key)).count()
    }

    /// Returns the roster indices of the members with the given role.
    pub fn indices_with_role(&self, role: Role) -> Vec<usize> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.role == role)
            .map(|(i, _)| i)
            .collect()
    }

    /// Returns a summary string describing the roster.
    pub fn summary(&self) -> String {
        format!(
            "Roster '{}': {} members across {} accounts, {} support",
            self.name,
            self.num_members(),
            self.num_accounts(),
            self.support_count(),
        )
    }
}

// ── Shared implementations ─────────────────────────────────────────

impl<S: RosterState> fmt::Display for Roster<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Roster '{}' ({} members):", self.name, self.members.len())?;
        for member in &self.members {
            writeln!(f, "  {} [{}] {}", member.name, member.role, member.account)?;
        }
        Ok(())
    }
}
