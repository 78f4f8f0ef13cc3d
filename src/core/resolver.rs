// File: src/core/resolver.rs
use crate::core::types::{BaseRecord, DictionaryEntry, EffectiveDictionary, OverrideDictionary};

/// Converts the base triples into a mapping. Later duplicates win.
/// Keys are taken verbatim; the asset is expected to be lowercase already.
pub fn base_dictionary(base: &[BaseRecord]) -> EffectiveDictionary {
    let mut dict = EffectiveDictionary::with_capacity(base.len());
    for (word, translation, tier) in base {
        dict.insert(word.clone(), DictionaryEntry::new(translation.clone(), *tier));
    }
    dict
}

/// Merges the base dictionary with user overrides. An override replaces the
/// whole base entry for its key; fields are never merged.
/// O(b + o) where b and o are the base and override sizes.
pub fn resolve(base: &[BaseRecord], overrides: &OverrideDictionary) -> EffectiveDictionary {
    let mut dict = base_dictionary(base);
    for (word, entry) in overrides {
        dict.insert(word.clone(), entry.to_entry());
    }
    dict
}
