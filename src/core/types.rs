// src/core/types.rs
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Tier given to words a user adds by hand. They have no frequency rank of their own.
pub const CUSTOM_WORD_TIER: u32 = 999_999;

/// Tier filter value that disables filtering.
pub const ALL_TIERS: u32 = 0;

/// One row of the bundled base dictionary: `(word, translation, tier)`.
pub type BaseRecord = (String, String, u32);

/// The resolved value for a single lowercase word key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    #[serde(alias = "shavian")]
    pub translation: String,
    /// Lower is more common. `CUSTOM_WORD_TIER` marks user additions.
    #[serde(alias = "rank")]
    pub tier: u32,
}

impl DictionaryEntry {
    pub fn new(translation: impl Into<String>, tier: u32) -> Self {
        Self { translation: translation.into(), tier }
    }
}

/// A user override as it arrives from storage or an import file.
/// Either field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEntry {
    #[serde(default, alias = "shavian")]
    pub translation: Option<String>,
    #[serde(default, alias = "rank")]
    pub tier: Option<u32>,
}

impl OverrideEntry {
    pub fn new(translation: impl Into<String>, tier: u32) -> Self {
        Self { translation: Some(translation.into()), tier: Some(tier) }
    }

    /// Whole-entry replacement: a missing tier becomes `CUSTOM_WORD_TIER`,
    /// never the tier of whatever entry this overrides.
    pub fn to_entry(&self) -> DictionaryEntry {
        DictionaryEntry {
            translation: self.translation.clone().unwrap_or_default(),
            tier: self.tier.unwrap_or(CUSTOM_WORD_TIER),
        }
    }
}

impl From<&DictionaryEntry> for OverrideEntry {
    fn from(entry: &DictionaryEntry) -> Self {
        Self { translation: Some(entry.translation.clone()), tier: Some(entry.tier) }
    }
}

/// User overrides keyed by word. Ordered so exports are stable.
pub type OverrideDictionary = BTreeMap<String, OverrideEntry>;

/// The merged lookup table the substitution engine queries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectiveDictionary {
    entries: HashMap<String, DictionaryEntry>,
}

impl EffectiveDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { entries: HashMap::with_capacity(capacity) }
    }

    pub fn get(&self, key: &str) -> Option<&DictionaryEntry> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut DictionaryEntry> {
        self.entries.get_mut(key)
    }

    /// Replaces any existing entry for `key` wholesale.
    pub fn insert(&mut self, key: impl Into<String>, entry: DictionaryEntry) {
        self.entries.insert(key.into(), entry);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &DictionaryEntry)> {
        self.entries.iter()
    }
}

impl FromIterator<(String, DictionaryEntry)> for EffectiveDictionary {
    fn from_iter<I: IntoIterator<Item = (String, DictionaryEntry)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}
