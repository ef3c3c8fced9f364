//! Scenario validation utilities.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tbs_core::attachments::rules::RulesAttachment;
use tbs_core::game::GameData;
use tbs_core::loader::load_scenario;

use crate::error::Result;

/// What a scenario that loaded cleanly contains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// Scenario name.
    pub scenario: String,
    /// Number of players.
    pub players: usize,
    /// Number of territories.
    pub territories: usize,
    /// Attachments built, after `foreach` expansion.
    pub attachments: usize,
    /// Rules attachments (conditions and objectives).
    pub conditions: usize,
    /// National objectives among them.
    pub objectives: usize,
}

impl ValidationSummary {
    /// Summarize loaded game data.
    #[must_use]
    pub fn of(data: &GameData) -> Self {
        let mut conditions = 0;
        let mut objectives = 0;
        for (id, instance) in data.attachments() {
            if data.rules(id).is_some() {
                conditions += 1;
                if RulesAttachment::is_national_objective(&instance.name) {
                    objectives += 1;
                }
            }
        }
        Self {
            scenario: data.name().to_string(),
            players: data.players().count(),
            territories: data.territory_count(),
            attachments: data.attachments().count(),
            conditions,
            objectives,
        }
    }
}

/// Load one scenario file, running every load-time check.
///
/// # Errors
///
/// Returns the first load failure.
pub fn validate_scenario(path: &Path) -> Result<ValidationSummary> {
    let data = load_scenario(path)?;
    Ok(ValidationSummary::of(&data))
}

/// Validate every `.ron` file in a directory, in file name order.
///
/// # Errors
///
/// Returns an error only if the directory cannot be read; per-file
/// failures are reported in the returned list.
pub fn validate_directory(dir: &Path) -> std::io::Result<Vec<(PathBuf, Result<ValidationSummary>)>> {
    let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().is_some_and(|e| e == "ron"))
        .collect();
    paths.sort();
    Ok(paths
        .into_iter()
        .map(|path| {
            let result = validate_scenario(&path);
            if let Err(e) = &result {
                tracing::warn!("Scenario {} failed validation: {e}", path.display());
            }
            (path, result)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tbs_test_utils::fixtures::SAMPLE_WORLD_RON;

    #[test]
    fn test_sample_world_summary() {
        let mut file = tempfile::Builder::new().suffix(".ron").tempfile().unwrap();
        file.write_all(SAMPLE_WORLD_RON.as_bytes()).unwrap();
        let summary = validate_scenario(file.path()).unwrap();
        assert_eq!(summary.scenario, "Sample World");
        assert_eq!(summary.players, 5);
        assert_eq!(summary.territories, 12);
        assert_eq!(summary.objectives, 5);
        assert_eq!(summary.conditions, 10);
    }

    #[test]
    fn test_directory_reports_each_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_good.ron"), SAMPLE_WORLD_RON).unwrap();
        fs::write(dir.path().join("b_broken.ron"), "ScenarioDocument(").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();
        let results = validate_directory(dir.path()).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_ok());
        assert!(results[1].1.is_err());
    }
}
