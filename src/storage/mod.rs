// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};
use crate::extractors::CharacterRecord;
use crate::utils::error::StorageError;

pub struct StorageManager {
    base_dir: PathBuf,
}

/// Directory-safe name for a character: its code points, e.g. `U+884C`.
pub fn character_slug(character: &str) -> String {
    character
        .chars()
        .map(|c| format!("U+{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join("_")
}

impl StorageManager {
    /// Creates a new StorageManager with the specified base directory
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Directory holding every artifact for one character, created on demand.
    pub fn character_dir(&self, character: &str) -> Result<PathBuf, StorageError> {
        let target_dir = self.base_dir.join(character_slug(character));
        if !target_dir.exists() {
            fs::create_dir_all(&target_dir)
                .map_err(StorageError::IoError)?;
        }
        Ok(target_dir)
    }

    /// Saves the fetched page markup as `page.html`
    pub fn save_raw_page(&self, character: &str, html: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.character_dir(character)?.join("page.html");

        fs::write(&file_path, html)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved raw page to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves the record with its source and extraction time as `record.json`
    pub fn save_record(&self, record: &CharacterRecord, source_url: &str) -> Result<PathBuf, StorageError> {
        let file_path = self.character_dir(&record.character)?.join("record.json");

        let document = serde_json::json!({
            "record": record,
            "source_url": source_url,
            "extraction_timestamp": chrono::Utc::now().to_rfc3339(),
        });

        let document_str = serde_json::to_string_pretty(&document)
            .map_err(|e| StorageError::SerializationError(e.to_string()))?;

        fs::write(&file_path, document_str)
            .map_err(StorageError::IoError)?;

        tracing::info!("Saved record to {}", file_path.display());
        Ok(file_path)
    }
}
