use crate::core::tokenizer::{normalize_quotes, segments, SegmentKind};
use crate::core::types::{EffectiveDictionary, ALL_TIERS};

/// Word-by-word substitution against a resolved dictionary.
pub struct Substituter<'d> {
    dict: &'d EffectiveDictionary,
    word_tier: u32,
}

impl<'d> Substituter<'d> {
    /// `word_tier` of `ALL_TIERS` substitutes every entry; any other value
    /// only substitutes entries whose tier is at most `word_tier`.
    pub fn new(dict: &'d EffectiveDictionary, word_tier: u32) -> Self {
        Self { dict, word_tier }
    }

    /// Returns the substitution for a single token, or `None` when the token
    /// must be emitted unchanged.
    pub fn translate_word(&self, word: &str) -> Option<String> {
        let entry = self.dict.get(&word.to_lowercase())?;
        if entry.translation.is_empty() {
            return None;
        }
        if self.word_tier == ALL_TIERS || entry.tier <= self.word_tier {
            Some(reconstruct_case(word, &entry.translation))
        } else {
            None
        }
    }

    /// Transliterates a full text.
    pub fn translate_text(&self, text: &str) -> String {
        let normalized = normalize_quotes(text);
        let mut result = String::with_capacity(normalized.len());
        for segment in segments(&normalized) {
            match segment.kind {
                SegmentKind::Token => match self.translate_word(segment.text) {
                    Some(replacement) => result.push_str(&replacement),
                    None => result.push_str(segment.text),
                },
                SegmentKind::Literal => result.push_str(segment.text),
            }
        }
        result
    }
}

/// All-caps (or caseless) source words get an upper-cased candidate.
/// Everything else, title case included, keeps the candidate as stored.
pub fn reconstruct_case(word: &str, candidate: &str) -> String {
    if word == word.to_uppercase() {
        candidate.to_uppercase()
    } else {
        candidate.to_string()
    }
}

/// Flat-text mode.
pub fn substitute(text: &str, dict: &EffectiveDictionary, word_tier: u32) -> String {
    Substituter::new(dict, word_tier).translate_text(text)
}
