//! Prior generation state
//!
//! Changelog dates recorded by earlier runs, keyed by entity (class) name.
//! Reusing them keeps an entity's identity stable across regenerations.

use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use crate::entity::ChangelogDate;
use crate::error::Result;

/// Lookup of previously recorded identity timestamps
pub trait PriorState {
    /// Date recorded for an entity, if it was generated before
    fn changelog_date(&self, entity_name: &str) -> Option<ChangelogDate>;

    /// Most recent date across every recorded entity
    fn latest(&self) -> Option<ChangelogDate>;
}

/// No prior generation
impl PriorState for () {
    fn changelog_date(&self, _entity_name: &str) -> Option<ChangelogDate> {
        None
    }

    fn latest(&self) -> Option<ChangelogDate> {
        None
    }
}

/// In-memory prior state
#[derive(Debug, Clone, Default)]
pub struct PriorEntities {
    dates: HashMap<String, ChangelogDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEntity {
    #[serde(default)]
    changelog_date: Option<ChangelogDate>,
}

impl PriorEntities {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entity_name: impl Into<String>, date: impl Into<ChangelogDate>) {
        self.dates.insert(entity_name.into(), date.into());
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    /// Load `<EntityName>.json` documents from a directory.
    ///
    /// A missing directory means nothing was generated yet. Documents without
    /// a `changelogDate` are ignored.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let mut prior = Self::new();
        if !dir.is_dir() {
            tracing::debug!(dir = %dir.display(), "no prior state directory");
            return Ok(prior);
        }

        for entry in WalkDir::new(dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let content = fs::read_to_string(path)?;
            let stored: StoredEntity = serde_json::from_str(&content)?;
            match stored.changelog_date {
                Some(date) => prior.insert(name, date),
                None => tracing::debug!(entity = name, "prior entity without changelog date"),
            }
        }

        tracing::info!(dir = %dir.display(), entities = prior.len(), "loaded prior state");
        Ok(prior)
    }
}

impl PriorState for PriorEntities {
    fn changelog_date(&self, entity_name: &str) -> Option<ChangelogDate> {
        self.dates.get(entity_name).cloned()
    }

    fn latest(&self) -> Option<ChangelogDate> {
        self.dates.values().max().cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_latest_is_the_greatest_date() {
        let mut prior = PriorEntities::new();
        prior.insert("Blog", "20250101000000");
        prior.insert("Post", "20250301120000");
        prior.insert("Tag", "20250201000000");

        assert_eq!(prior.latest(), Some(ChangelogDate::from("20250301120000")));
        assert_eq!(prior.changelog_date("Blog"), Some(ChangelogDate::from("20250101000000")));
        assert_eq!(prior.changelog_date("Comment"), None);
    }

    #[test]
    fn test_load_from_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("Blog.json"),
            r#"{"changelogDate": "20250101000000", "fields": [], "relationships": []}"#,
        )
        .unwrap();
        fs::write(dir.path().join("Draft.json"), r#"{"fields": []}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "not an entity").unwrap();

        let prior = PriorEntities::from_directory(dir.path()).unwrap();

        assert_eq!(prior.len(), 1);
        assert_eq!(prior.changelog_date("Blog").unwrap().as_str(), "20250101000000");
        assert!(prior.changelog_date("Draft").is_none());
    }

    #[test]
    fn test_missing_directory_is_empty() {
        let dir = TempDir::new().unwrap();
        let prior = PriorEntities::from_directory(dir.path().join("absent")).unwrap();
        assert!(prior.is_empty());
        assert!(prior.latest().is_none());
    }

    #[test]
    fn test_malformed_document_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("Broken.json"), "{ not json").unwrap();
        assert!(PriorEntities::from_directory(dir.path()).is_err());
    }
}
