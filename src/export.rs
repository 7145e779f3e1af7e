//! Entity document export
//!
//! Writes each resolved entity as `<ClassName>.json`. The same directory
//! read back as prior state reproduces the changelog dates of this run.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::OutputFormat;
use crate::entity::{EntityDescriptor, EntityMap};
use crate::error::Result;

/// Serialize one entity document
pub fn to_json(descriptor: &EntityDescriptor, format: OutputFormat) -> Result<String> {
    let json = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(descriptor)?,
        OutputFormat::Compact => serde_json::to_string(descriptor)?,
    };
    Ok(json)
}

/// Write every entity to `dir`, creating it if needed. Returns the written paths.
pub fn write_entities(entities: &EntityMap, dir: impl AsRef<Path>, format: OutputFormat) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(entities.len());
    for entry in entities {
        let path = dir.join(format!("{}.json", entry.class_name));
        let mut content = to_json(&entry.descriptor, format)?;
        content.push('\n');
        fs::write(&path, content)?;
        tracing::debug!(path = %path.display(), "wrote entity");
        written.push(path);
    }

    tracing::info!(dir = %dir.display(), entities = written.len(), "exported entities");
    Ok(written)
}
