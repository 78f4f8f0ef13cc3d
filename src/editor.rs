// File: src/editor.rs
use crate::core::resolver::{base_dictionary, resolve};
use crate::core::types::{
    BaseRecord, DictionaryEntry, EffectiveDictionary, OverrideDictionary, OverrideEntry,
    CUSTOM_WORD_TIER,
};
use crate::errors::{Result, TranslatorError};
use crate::persistence::read_import;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Maximum number of rows a search returns.
pub const SEARCH_LIMIT: usize = 50;
pub const EXPORT_KIND: &str = "Shavian Dictionary Customizations";
pub const EXPORT_FILE_NAME: &str = "shavian-dictionary-customizations.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportMetadata {
    pub export_date: DateTime<Utc>,
    pub total_customizations: usize,
    #[serde(rename = "type")]
    pub kind: String,
}

/// The on-disk layout of an exported set of customizations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportFile {
    pub metadata: ExportMetadata,
    pub customizations: OverrideDictionary,
}

/// Accepted import layouts: a full export, or a bare word map from older versions.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ImportFile {
    Export { customizations: OverrideDictionary },
    Legacy(OverrideDictionary),
}

impl ImportFile {
    pub fn into_customizations(self) -> OverrideDictionary {
        match self {
            ImportFile::Export { customizations } => customizations,
            ImportFile::Legacy(customizations) => customizations,
        }
    }
}

/// Working copy of the dictionary for browsing and editing user customizations.
/// Nothing here touches storage; the engine persists `customizations()`.
pub struct DictionaryEditor {
    base: EffectiveDictionary,
    working: EffectiveDictionary,
    unsaved: bool,
}

impl DictionaryEditor {
    pub fn new(base: &[BaseRecord], stored: &OverrideDictionary) -> Self {
        Self {
            base: base_dictionary(base),
            working: resolve(base, stored),
            unsaved: false,
        }
    }

    pub fn len(&self) -> usize {
        self.working.len()
    }

    pub fn is_empty(&self) -> bool {
        self.working.is_empty()
    }

    pub fn get(&self, word: &str) -> Option<&DictionaryEntry> {
        self.working.get(word)
    }

    /// Entries whose key contains `term`, ignoring case, in key order.
    pub fn search(&self, term: &str) -> Vec<(&str, &DictionaryEntry)> {
        let needle = term.to_lowercase();
        let mut matches: Vec<(&str, &DictionaryEntry)> = self
            .working
            .iter()
            .filter(|(word, _)| word.to_lowercase().contains(&needle))
            .map(|(word, entry)| (word.as_str(), entry))
            .collect();
        matches.sort_unstable_by(|a, b| a.0.cmp(b.0));
        matches.truncate(SEARCH_LIMIT);
        matches
    }

    /// Changes the translation of an existing word. Its tier is kept.
    pub fn set_translation(&mut self, word: &str, translation: &str) -> Result<()> {
        let entry = self
            .working
            .get_mut(word)
            .ok_or_else(|| TranslatorError::UnknownWord(word.to_string()))?;
        entry.translation = translation.to_string();
        self.unsaved = true;
        debug!("Updated {} to {}", word, translation);
        Ok(())
    }

    /// Adds (or replaces) a user word. Returns the normalized key.
    pub fn add_word(&mut self, word: &str, translation: &str) -> Result<String> {
        if word.is_empty() || translation.is_empty() {
            return Err(TranslatorError::MissingField("word and translation"));
        }
        let key = word.trim().to_lowercase();
        self.working.insert(key.clone(), DictionaryEntry::new(translation, CUSTOM_WORD_TIER));
        self.unsaved = true;
        info!("Added custom word {}", key);
        Ok(key)
    }

    /// Words that are new, or whose translation differs from the base dictionary.
    pub fn customizations(&self) -> OverrideDictionary {
        self.working
            .iter()
            .filter(|(word, entry)| match self.base.get(word) {
                Some(base) => base.translation != entry.translation,
                None => true,
            })
            .map(|(word, entry)| (word.clone(), OverrideEntry::from(entry)))
            .collect()
    }

    pub fn export(&self) -> ExportFile {
        let customizations = self.customizations();
        ExportFile {
            metadata: ExportMetadata {
                export_date: Utc::now(),
                total_customizations: customizations.len(),
                kind: EXPORT_KIND.to_string(),
            },
            customizations,
        }
    }

    /// Merges customizations from an import file into the working copy.
    /// Entries without a tier (or with tier 0) are treated as user words.
    pub fn import(&mut self, json: &str) -> Result<usize> {
        let imported = read_import(json)?;
        let count = imported.len();
        for (word, mut entry) in imported {
            if entry.tier.unwrap_or(0) == 0 {
                entry.tier = Some(CUSTOM_WORD_TIER);
            }
            self.working.insert(word, entry.to_entry());
        }
        self.unsaved = true;
        info!("Imported {} customizations", count);
        Ok(count)
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }
}
