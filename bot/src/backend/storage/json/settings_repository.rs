use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::fs;

use super::connection::{atomic_write, JsonConnection};
use crate::backend::storage::SettingsStorage;
use shared::EconomySettings;

/// JSON file-backed settings repository.
#[derive(Clone)]
pub struct SettingsRepository {
    connection: JsonConnection,
}

impl SettingsRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl SettingsStorage for SettingsRepository {
    async fn exists(&self) -> Result<bool> {
        Ok(self.connection.settings_file_path().exists())
    }

    async fn load(&self) -> Result<EconomySettings> {
        let path = self.connection.settings_file_path();

        if !path.exists() {
            debug!("Settings document missing, loading defaults");
            return Ok(EconomySettings::default());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings document: {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Malformed settings document: {}", path.display()))
    }

    async fn save(&self, settings: &EconomySettings) -> Result<()> {
        let path = self.connection.settings_file_path();
        let content = serde_json::to_string_pretty(settings)?;

        atomic_write(&path, &content)
            .with_context(|| format!("Failed to save settings document: {}", path.display()))
    }
}
