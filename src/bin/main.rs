use clap::{Parser, Subcommand, ValueHint};
use crossterm::style::Stylize;
use shavian_core::editor::EXPORT_FILE_NAME;
use shavian_core::errors::Result;
use shavian_core::logging::setup_logging;
use shavian_core::persistence::{load_base_dictionary, write_export};
use shavian_core::{markup, TranslatorEngine};
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

/// Renders English text in the Shavian alphabet, word by word.
#[derive(Parser, Debug)]
#[command(name = "shavian", author, version, about, long_about = None)]
struct Cli {
    /// Debug level: -d info, -dd debug, -ddd trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    debug: u8,

    /// Base dictionary: JSON array of [word, translation, tier]
    #[arg(long, env = "SHAVIAN_DICT", default_value = "dict.json", value_hint = ValueHint::FilePath)]
    dict: PathBuf,

    /// User state file (settings and custom words)
    #[arg(long, env = "SHAVIAN_STATE", default_value = "shavian_state.bin", value_hint = ValueHint::FilePath)]
    state: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Translate text (reads stdin when no text is given)
    Text { text: Option<String> },
    /// Translate the text of an (X)HTML file, leaving markup, scripts and styles alone
    Page {
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Write here instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },
    /// Show or set the word tier (0 = all words)
    Tier { tier: Option<u32> },
    /// Switch automatic translation on or off
    Toggle,
    /// Show current settings
    Status,
    /// Search the dictionary
    Search { term: String },
    /// Change the translation of a dictionary word
    Set { word: String, translation: String },
    /// Add a custom word
    Add { word: String, translation: String },
    /// Export customizations as JSON
    Export {
        #[arg(default_value = EXPORT_FILE_NAME, value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Import customizations from JSON
    Import {
        #[arg(value_hint = ValueHint::FilePath)]
        path: PathBuf,
    },
    /// Delete all customizations
    Clear,
}

fn main() {
    let cli = Cli::parse();
    setup_logging(cli.debug);

    if let Err(e) = run(cli) {
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let base = load_base_dictionary(&cli.dict)?;
    let mut engine = TranslatorEngine::from_file_or_new(base, &cli.state);

    match cli.command {
        Commands::Text { text } => {
            let text = match text {
                Some(text) => text,
                None => {
                    let mut buf = String::new();
                    io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };
            print!("{}", engine.translate_text(&text));
        }
        Commands::Page { file, output } => {
            let mut doc = markup::parse(&fs::read_to_string(&file)?)?;
            let changed = engine.translate_document(&mut doc);
            let rendered = markup::render(&doc);
            match output {
                Some(path) => {
                    fs::write(&path, rendered)?;
                    println!("{} {} text nodes -> {}", "Translated".green(), changed, path.display());
                }
                None => print!("{}", rendered),
            }
        }
        Commands::Tier { tier } => {
            if let Some(tier) = tier {
                engine.set_word_tier(tier);
                engine.save()?;
            }
            println!("Word tier: {}", describe_tier(engine.word_tier()));
        }
        Commands::Toggle => {
            let enabled = engine.toggle();
            engine.save()?;
            print_enabled(enabled);
        }
        Commands::Status => {
            print_enabled(engine.is_enabled());
            println!("Word tier: {}", describe_tier(engine.word_tier()));
            println!("Custom words: {}", engine.custom_dictionary().len());
            if let Some(modified) = engine.state().last_modified {
                println!("Last modified: {}", modified.to_rfc3339());
            }
        }
        Commands::Search { term } => {
            let editor = engine.editor();
            let matches = editor.search(&term);
            if matches.is_empty() {
                println!("{}", "No matches.".yellow());
            }
            for (word, entry) in matches {
                println!("{:<24} {:<24} {}", word, entry.translation, entry.tier.to_string().dark_grey());
            }
        }
        Commands::Set { word, translation } => {
            let mut editor = engine.editor();
            editor.set_translation(&word, &translation)?;
            engine.apply_editor(&mut editor);
            engine.save()?;
            println!("{}", "Changes saved!".green());
        }
        Commands::Add { word, translation } => {
            let mut editor = engine.editor();
            let key = editor.add_word(&word, &translation)?;
            engine.apply_editor(&mut editor);
            engine.save()?;
            println!("{} {}", "Word added successfully:".green(), key);
        }
        Commands::Export { path } => {
            let export = engine.editor().export();
            write_export(&export, &path)?;
            println!(
                "{}",
                format!("Exported {} customizations to {}", export.metadata.total_customizations, path.display())
                    .green()
            );
        }
        Commands::Import { path } => {
            let mut editor = engine.editor();
            let count = editor.import(&fs::read_to_string(&path)?)?;
            engine.apply_editor(&mut editor);
            engine.save()?;
            println!("{}", format!("Imported {} customizations successfully!", count).green());
        }
        Commands::Clear => {
            engine.clear_customizations();
            engine.save()?;
            println!("{}", "All customizations deleted.".green());
        }
    }
    Ok(())
}

fn describe_tier(tier: u32) -> String {
    if tier == 0 {
        "all words".to_string()
    } else {
        tier.to_string()
    }
}

fn print_enabled(enabled: bool) {
    let state = if enabled { "On".green() } else { "Off".red() };
    println!("Shavian Translator ({})", state);
}
