// src/main.rs
mod config;
mod utils;
mod wiktionary;
mod extractors;
mod storage;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use config::FetchConfig;
use utils::{AppError, FetchError};
use wiktionary::{DocumentFetcher, WiktionaryClient};
use extractors::CharacterRecord;
use storage::StorageManager;

const DEFAULT_DEBUG_DIR: &str = "./output";

/// Look up pronunciation data for a CJK character on Wiktionary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The character to look up
    character: String,

    /// Save the fetched page and the extracted record under this directory
    #[arg(short, long)]
    output_dir: Option<String>,

    /// Debug mode - also save an annotated copy of the page (defaults the output dir to ./output)
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::info!("Starting lookup for args: {:?}", args);

    let output = run(&args).await.and_then(|record| {
        record
            .to_pretty_json()
            .map_err(|e| AppError::Serialization(e.to_string()))
    });

    match output {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(AppError::Fetch(e)) => {
            eprintln!("Error fetching page for {}: {}", args.character, e);
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: &Args) -> Result<CharacterRecord, AppError> {
    let character = args.character.trim();
    if character.is_empty() {
        return Err(AppError::Config("character must not be empty".to_string()));
    }

    // 3. Build the fetch collaborator from environment overrides
    let config = FetchConfig::from_env()?;
    let client = WiktionaryClient::new(config)?;

    // 4. Fetch and extract
    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| args.debug.then(|| DEFAULT_DEBUG_DIR.to_string()));

    let record = match output_dir {
        None => extractors::lookup_character(&client, character).await?,
        Some(dir) => {
            // Keep the markup around so it can be saved next to the record
            let recording = RecordingFetcher::new(&client);
            let record = extractors::lookup_character(&recording, character).await?;
            save_artifacts(&dir, args.debug, &recording, &record)?;
            record
        }
    };

    tracing::info!("Lookup finished for '{}'", character);
    Ok(record)
}

fn save_artifacts(dir: &str, debug: bool, recording: &RecordingFetcher<'_, WiktionaryClient>, record: &CharacterRecord) -> Result<(), AppError> {
    let storage = StorageManager::new(dir)?;
    let source_url = recording.source_url(&record.character);

    if let Some(markup) = recording.markup() {
        storage.save_raw_page(&record.character, &markup)?;

        if debug {
            let debug_path: PathBuf = storage.character_dir(&record.character)?.join("page_annotated.html");
            let patterns = extractors::fields::debug_patterns();
            if let Err(e) = utils::html_debug::create_debug_html(&markup, &debug_path, &patterns) {
                tracing::warn!("Failed to create debug HTML: {}", e);
            }
        }
    }

    storage.save_record(record, &source_url)?;
    Ok(())
}

/// Wraps a fetcher and keeps a copy of the last page it returned.
struct RecordingFetcher<'f, F> {
    inner: &'f F,
    last: std::cell::RefCell<Option<String>>,
}

impl<'f, F: DocumentFetcher> RecordingFetcher<'f, F> {
    fn new(inner: &'f F) -> Self {
        Self { inner, last: std::cell::RefCell::new(None) }
    }

    fn markup(&self) -> Option<String> {
        self.last.borrow().clone()
    }
}

impl<F: DocumentFetcher> DocumentFetcher for RecordingFetcher<'_, F> {
    async fn fetch(&self, character: &str) -> Result<String, FetchError> {
        let markup = self.inner.fetch(character).await?;
        *self.last.borrow_mut() = Some(markup.clone());
        Ok(markup)
    }

    fn source_url(&self, character: &str) -> String {
        self.inner.source_url(character)
    }
}
