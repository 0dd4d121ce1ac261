use anyhow::Result;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use shared::EconomySettings;

/// JsonConnection manages the data directory holding the persisted economy
/// documents and the audit log.
#[derive(Clone)]
pub struct JsonConnection {
    base_directory: PathBuf,
}

impl JsonConnection {
    /// Create a new connection, creating the data directory if needed.
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        if !base_path.exists() {
            info!("Creating data directory: {}", base_path.display());
            fs::create_dir_all(&base_path)?;
        }

        Ok(Self {
            base_directory: base_path,
        })
    }

    /// Path of the accounts document.
    pub fn bank_file_path(&self) -> PathBuf {
        self.base_directory.join("bank.json")
    }

    /// Path of the settings document.
    pub fn settings_file_path(&self) -> PathBuf {
        self.base_directory.join("settings.json")
    }

    /// Path of the append-only audit log.
    pub fn audit_file_path(&self) -> PathBuf {
        self.base_directory.join("economy.log")
    }

    /// Ensure both documents exist, writing defaults where missing.
    ///
    /// An absent settings document gets the default tunables; an absent
    /// accounts document gets an empty map. Existing documents are left
    /// untouched.
    pub fn ensure_documents_exist(&self) -> Result<()> {
        let settings_path = self.settings_file_path();
        if !settings_path.exists() {
            info!("Creating default settings.json");
            let content = serde_json::to_string_pretty(&EconomySettings::default())?;
            atomic_write(&settings_path, &content)?;
        }

        let bank_path = self.bank_file_path();
        if !bank_path.exists() {
            info!("Creating empty bank.json");
            atomic_write(&bank_path, "{}")?;
        }

        Ok(())
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }
}

/// Write a file atomically via a temp file and rename, so a crash mid-write
/// never leaves a truncated document behind.
pub(crate) fn atomic_write(path: &Path, content: &str) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)?;
    Ok(())
}
