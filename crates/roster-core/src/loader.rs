// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Roster and requirement loading from JSON files.
//!
//! The loader reads the already-materialized outputs of the external
//! collaborators (the roster store's query result and the translated
//! requirement list) so the CLI can drive the planner:
//!
//! - roster file — a JSON array of [`Member`] objects.
//! - requirements file — a JSON array of [`AbilityRequirement`] objects.
//!
//! The loader validates the roster before returning it, so downstream
//! code only ever sees `Roster<Validated>`.

use crate::roster::Validated;
use crate::{AbilityRequirement, Member, Roster, RosterError};
use std::path::Path;

/// Loads rosters and requirement lists from disk.
///
/// # Example
/// ```no_run
/// use roster_core::RosterLoader;
/// use std::path::Path;
///
/// let roster = RosterLoader::load(Path::new("./roster.json")).unwrap();
/// println!("Loaded {} members", roster.num_members());
/// ```
pub struct RosterLoader;

impl RosterLoader {
    /// Loads and validates a roster from a JSON file.
    ///
    /// The roster name defaults to the file stem.
    pub fn load(path: &Path) -> Result<Roster<Validated>, RosterError> {
        let content = std::fs::read_to_string(path)?;
        let members: Vec<Member> = serde_json::from_str(&content)?;
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "roster".to_string());
        tracing::debug!("loaded {} members from '{}'", members.len(), path.display());
        Roster::new(name, members).validate()
    }

    /// Loads a requirement list from a JSON file.
    pub fn load_requirements(path: &Path) -> Result<Vec<AbilityRequirement>, RosterError> {
        let content = std::fs::read_to_string(path)?;
        let requirements: Vec<AbilityRequirement> = serde_json::from_str(&content)?;
        Ok(requirements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roster_json() {
        let json = r#"[
            {"id":"m1","name":"Alice","account":"a1","role":"Support","abilities":{"ignite":10}},
            {"id":"m2","name":"Bob","account":"a2","role":"Damage"}
        ]"#;
        let members: Vec<Member> = serde_json::from_str(json).unwrap();
        let roster = Roster::new("test".into(), members).validate().unwrap();
        assert_eq!(roster.num_members(), 2);
        assert_eq!(roster.support_count(), 1);
    }

    #[test]
    fn test_parse_requirements_json() {
        let json = r#"[
            {"name":"ignite","threshold":9},
            {"name":"ignite","threshold":10,"enabled":false}
        ]"#;
        let reqs: Vec<AbilityRequirement> = serde_json::from_str(json).unwrap();
        assert_eq!(reqs.len(), 2);
        assert!(reqs[0].enabled);
        assert!(!reqs[1].enabled);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let err = RosterLoader::load(Path::new("/nonexistent/roster.json")).unwrap_err();
        assert!(matches!(err, RosterError::ReadError(_)));
    }
}
