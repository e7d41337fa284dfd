// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for roster loading and validation.

/// Errors that can occur when constructing or validating a roster.
#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    /// The roster file could not be read.
    #[error("failed to read roster file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The roster JSON is malformed.
    #[error("failed to parse roster: {0}")]
    ParseError(#[from] serde_json::Error),

    /// The roster contains no members.
    #[error("roster contains no members")]
    EmptyRoster,

    /// Two members share the same identifier.
    #[error("duplicate member id: {id}")]
    DuplicateMember { id: String },

    /// A member definition is invalid (e.g., missing account).
    #[error("invalid member '{member}': {detail}")]
    InvalidMember { member: String, detail: String },
}
