use rstest::{fixture, rstest};
use shavian_core::core::types::{BaseRecord, CUSTOM_WORD_TIER};
use shavian_core::editor::ExportFile;
use shavian_core::persistence::{load_from_disk, write_export};
use shavian_core::util::testing::init_test_setup;
use shavian_core::TranslatorEngine;
use std::fs;
use tempfile::{tempdir, TempDir};

#[fixture]
fn base() -> Vec<BaseRecord> {
    init_test_setup();
    vec![
        ("the".to_string(), "T".to_string(), 1),
        ("cat".to_string(), "K".to_string(), 5),
    ]
}

#[fixture]
fn workdir() -> TempDir {
    tempdir().unwrap()
}

#[rstest]
fn saved_customizations_are_used_by_a_new_engine(base: Vec<BaseRecord>, workdir: TempDir) {
    let state_path = workdir.path().join("state.bin");

    let mut engine = TranslatorEngine::from_file_or_new(base.clone(), &state_path);
    let mut editor = engine.editor();
    editor.add_word("Fox", "F").unwrap();
    editor.set_translation("cat", "C").unwrap();
    engine.apply_editor(&mut editor);
    engine.save().unwrap();

    let state = load_from_disk(&state_path).unwrap();
    assert_eq!(state.custom_dictionary.len(), 2);
    assert_eq!(state.custom_dictionary["fox"].tier, Some(CUSTOM_WORD_TIER));

    let reopened = TranslatorEngine::from_file_or_new(base, &state_path);
    assert_eq!(reopened.translate_text("The cat and the fox"), "T C and T F");
}

#[rstest]
fn export_then_import_into_a_fresh_state(base: Vec<BaseRecord>, workdir: TempDir) {
    let export_path = workdir.path().join("custom.json");

    let mut source = TranslatorEngine::new(base.clone());
    let mut editor = source.editor();
    editor.add_word("dog", "D").unwrap();
    source.apply_editor(&mut editor);
    write_export(&source.editor().export(), &export_path).unwrap();

    let written: ExportFile =
        serde_json::from_str(&fs::read_to_string(&export_path).unwrap()).unwrap();
    assert_eq!(written.metadata.total_customizations, 1);

    let mut target = TranslatorEngine::new(base);
    let mut editor = target.editor();
    let imported = editor.import(&fs::read_to_string(&export_path).unwrap()).unwrap();
    target.apply_editor(&mut editor);

    assert_eq!(imported, 1);
    assert_eq!(target.translate_text("dog"), "D");
}

#[rstest]
fn tier_only_changes_are_not_customizations(base: Vec<BaseRecord>) {
    let mut engine = TranslatorEngine::new(base);
    let mut editor = engine.editor();
    editor.set_translation("cat", "K").unwrap();
    engine.apply_editor(&mut editor);

    assert!(engine.custom_dictionary().is_empty());
}

#[rstest]
fn clearing_customizations_persists(base: Vec<BaseRecord>, workdir: TempDir) {
    let state_path = workdir.path().join("state.bin");
    let mut engine = TranslatorEngine::from_file_or_new(base.clone(), &state_path);
    let mut editor = engine.editor();
    editor.add_word("dog", "D").unwrap();
    engine.apply_editor(&mut editor);
    engine.clear_customizations();
    engine.save().unwrap();

    let reopened = TranslatorEngine::from_file_or_new(base, &state_path);
    assert!(reopened.custom_dictionary().is_empty());
    assert_eq!(reopened.translate_text("dog"), "dog");
}
