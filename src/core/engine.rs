use crate::core::converter::Substituter;
use crate::core::document::{substitute_tree, Document};
use crate::core::resolver::resolve;
use crate::core::types::{BaseRecord, EffectiveDictionary, OverrideDictionary};
use crate::editor::DictionaryEditor;
use crate::errors::Result;
use crate::persistence::{load_from_disk, save_to_disk, Settings, UserState};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

// The engine owns the bundled dictionary and the user's state. Both are plain
// values: nothing here is global, and every translation resolves a fresh table.
pub struct TranslatorEngine {
    base: Vec<BaseRecord>,
    state: UserState,
    state_path: Option<PathBuf>,
}

impl TranslatorEngine {
    pub fn new(base: Vec<BaseRecord>) -> Self {
        Self::with_state(base, UserState::default())
    }

    pub fn with_state(base: Vec<BaseRecord>, state: UserState) -> Self {
        Self { base, state, state_path: None }
    }

    /// Loads the user state from `path`, starting fresh if it cannot be read.
    pub fn from_file_or_new(base: Vec<BaseRecord>, path: &Path) -> Self {
        let state = load_from_disk(path).unwrap_or_else(|e| {
            if path.exists() {
                warn!("Could not read state from {}: {}", path.display(), e);
            }
            UserState::default()
        });
        let mut engine = Self::with_state(base, state);
        engine.state_path = Some(path.to_path_buf());
        engine
    }

    pub fn state(&self) -> &UserState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    pub fn is_enabled(&self) -> bool {
        self.state.settings.enabled
    }

    /// Flips automatic translation and returns the new value.
    pub fn toggle(&mut self) -> bool {
        self.state.settings.enabled = !self.state.settings.enabled;
        info!("Automatic translation {}", if self.is_enabled() { "on" } else { "off" });
        self.is_enabled()
    }

    pub fn word_tier(&self) -> u32 {
        self.state.settings.word_tier
    }

    pub fn set_word_tier(&mut self, word_tier: u32) {
        info!("Word tier set to {}", word_tier);
        self.state.settings.word_tier = word_tier;
    }

    pub fn custom_dictionary(&self) -> &OverrideDictionary {
        &self.state.custom_dictionary
    }

    /// Merges the base dictionary with the current overrides. Not cached.
    pub fn effective_dictionary(&self) -> EffectiveDictionary {
        let started = Instant::now();
        let dict = resolve(&self.base, &self.state.custom_dictionary);
        debug!(
            "Dictionary resolved, {} entries in {} ms",
            dict.len(),
            started.elapsed().as_millis()
        );
        dict
    }

    pub fn translate_text(&self, text: &str) -> String {
        let dict = self.effective_dictionary();
        Substituter::new(&dict, self.word_tier()).translate_text(text)
    }

    /// Rewrites the document in place and returns the number of changed text nodes.
    #[instrument(level = "debug", skip_all)]
    pub fn translate_document(&self, doc: &mut Document) -> usize {
        let dict = self.effective_dictionary();
        let started = Instant::now();
        let changed = substitute_tree(doc, &dict, self.word_tier());
        debug!("Translated {} text nodes in {} ms", changed, started.elapsed().as_millis());
        changed
    }

    /// Opens an editor over the base dictionary plus the stored customizations.
    pub fn editor(&self) -> DictionaryEditor {
        DictionaryEditor::new(&self.base, &self.state.custom_dictionary)
    }

    /// Takes the editor's customizations as the new override set.
    pub fn apply_editor(&mut self, editor: &mut DictionaryEditor) {
        self.state.custom_dictionary = editor.customizations();
        self.state.last_modified = Some(Utc::now());
        editor.mark_saved();
        info!("Stored {} customizations", self.state.custom_dictionary.len());
    }

    pub fn clear_customizations(&mut self) {
        self.state.custom_dictionary.clear();
        self.state.last_modified = Some(Utc::now());
        info!("Removed all customizations");
    }

    pub fn save(&self) -> Result<()> {
        if let Some(path) = &self.state_path {
            save_to_disk(&self.state, path)
        } else {
            Ok(()) // Don't error if no path is set
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::document::Document;
    use crate::core::types::OverrideEntry;
    use rstest::{fixture, rstest};
    use tempfile::tempdir;

    #[fixture]
    fn engine() -> TranslatorEngine {
        TranslatorEngine::new(vec![
            ("the".to_string(), "\u{1045E}".to_string(), 1),
            ("quick".to_string(), "\u{10441}\u{10472}\u{10452}".to_string(), 3),
            ("cat".to_string(), "X".to_string(), 5),
        ])
    }

    #[rstest]
    fn translates_with_defaults(engine: TranslatorEngine) {
        assert_eq!(
            engine.translate_text("The Quick fox"),
            "\u{1045E} \u{10441}\u{10472}\u{10452} fox"
        );
    }

    #[rstest]
    fn override_takes_precedence_at_tier_one(mut engine: TranslatorEngine) {
        engine.state.custom_dictionary.insert("cat".to_string(), OverrideEntry::new("Y", 1));
        engine.set_word_tier(1);

        assert_eq!(engine.translate_text("cat"), "Y");
    }

    #[rstest]
    fn applied_edits_are_used_and_marked_saved(mut engine: TranslatorEngine) {
        let mut editor = engine.editor();
        editor.set_translation("cat", "Y").unwrap();
        engine.apply_editor(&mut editor);

        assert_eq!(engine.translate_text("CAT"), "Y");
        assert!(!editor.has_unsaved_changes());
        assert!(engine.state().last_modified.is_some());
    }

    #[rstest]
    fn tier_change_applies_on_next_translation(mut engine: TranslatorEngine) {
        engine.set_word_tier(2);
        assert_eq!(engine.translate_text("the quick"), "\u{1045E} quick");
    }

    #[rstest]
    fn toggle_flips_state(mut engine: TranslatorEngine) {
        assert!(!engine.is_enabled());
        assert!(engine.toggle());
        assert!(!engine.toggle());
    }

    #[rstest]
    fn clearing_restores_base(mut engine: TranslatorEngine) {
        let mut editor = engine.editor();
        editor.add_word("fox", "F").unwrap();
        engine.apply_editor(&mut editor);
        assert_eq!(engine.translate_text("fox"), "F");

        engine.clear_customizations();
        assert_eq!(engine.translate_text("fox"), "fox");
    }

    #[rstest]
    fn document_translation_counts_nodes(engine: TranslatorEngine) {
        let mut doc = Document::new("body");
        let p = doc.append_element(doc.root(), "p");
        doc.append_text(p, "the cat");
        doc.append_text(p, "fox");

        assert_eq!(engine.translate_document(&mut doc), 1);
    }

    #[rstest]
    fn state_persists_between_engines(mut engine: TranslatorEngine) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.bin");

        let mut reloaded = TranslatorEngine::from_file_or_new(Vec::new(), &path);
        assert_eq!(reloaded.state(), &UserState::default());

        engine.state_path = Some(path.clone());
        engine.set_word_tier(7);
        engine.toggle();
        engine.save().unwrap();

        reloaded = TranslatorEngine::from_file_or_new(Vec::new(), &path);
        assert_eq!(reloaded.settings(), &Settings { enabled: true, word_tier: 7 });
    }

    #[rstest]
    fn corrupt_state_falls_back_to_default() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("state.bin");
        std::fs::write(&path, b"\xff\xff\xff").unwrap();

        let engine = TranslatorEngine::from_file_or_new(Vec::new(), &path);
        assert_eq!(engine.state(), &UserState::default());
    }
}
