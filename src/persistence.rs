// File: src/persistence.rs
use crate::core::types::{BaseRecord, OverrideDictionary};
use crate::editor::{ExportFile, ImportFile};
use crate::errors::{Result, TranslatorError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

/// User preferences, passed explicitly into the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Whether pages are translated automatically.
    pub enabled: bool,
    /// Tier filter; 0 means every word.
    pub word_tier: u32,
}

/// Everything the translator keeps between runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserState {
    pub settings: Settings,
    pub custom_dictionary: OverrideDictionary,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Writes `contents` next to `path` and renames it into place.
fn write_atomically<F>(path: &Path, contents: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&NamedTempFile>) -> Result<()>,
{
    let parent_dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent_dir)?;

    let temp_file = NamedTempFile::new_in(parent_dir)?;
    {
        let mut writer = BufWriter::new(&temp_file);
        contents(&mut writer)?;
        writer.flush()?;
    }
    temp_file.persist(path).map_err(|e| TranslatorError::Io(e.error))?;
    Ok(())
}

#[instrument(level = "debug", skip(state))]
pub fn save_to_disk(state: &UserState, path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        bincode::serialize_into(writer, state)?;
        Ok(())
    })?;
    debug!("Saved {} custom entries", state.custom_dictionary.len());
    Ok(())
}

#[instrument(level = "debug")]
pub fn load_from_disk(path: &Path) -> Result<UserState> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let state: UserState = bincode::deserialize_from(reader)?;
    debug!("Loaded {} custom entries", state.custom_dictionary.len());
    Ok(state)
}

/// Parses the base dictionary asset: a JSON array of `[word, translation, tier]` rows.
pub fn parse_base_dictionary(json: &str, origin: &Path) -> Result<Vec<BaseRecord>> {
    serde_json::from_str(json).map_err(|e| TranslatorError::InvalidAsset {
        path: origin.to_path_buf(),
        message: e.to_string(),
    })
}

#[instrument(level = "debug")]
pub fn load_base_dictionary(path: &Path) -> Result<Vec<BaseRecord>> {
    let json = fs::read_to_string(path)?;
    let records = parse_base_dictionary(&json, path)?;
    debug!("Base dictionary has {} rows", records.len());
    Ok(records)
}

#[instrument(level = "debug", skip(export))]
pub fn write_export(export: &ExportFile, path: &Path) -> Result<()> {
    write_atomically(path, |writer| {
        serde_json::to_writer_pretty(writer, export)?;
        Ok(())
    })
}

/// Reads an import file in either the export layout or the legacy bare-map layout.
pub fn read_import(json: &str) -> Result<OverrideDictionary> {
    let parsed: ImportFile =
        serde_json::from_str(json).map_err(|e| TranslatorError::InvalidImport(e.to_string()))?;
    Ok(parsed.into_customizations())
}
