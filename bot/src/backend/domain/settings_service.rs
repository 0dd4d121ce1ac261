use log::info;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::domain::errors::Result;
use crate::backend::storage::SettingsStorage;
use shared::EconomySettings;

/// Service owning the tunable settings.
///
/// Each setter is independent and persists immediately. There is no
/// cross-field validation: setting the minimum bid above the maximum is
/// accepted, matching the historical behavior admins rely on when
/// re-ordering the two values.
#[derive(Clone)]
pub struct SettingsService {
    storage: Arc<dyn SettingsStorage>,
    settings: Arc<Mutex<EconomySettings>>,
}

impl SettingsService {
    /// Load the settings document (or defaults) and wrap it in a service.
    pub async fn load(storage: Arc<dyn SettingsStorage>) -> anyhow::Result<Self> {
        let settings = storage.load().await?;
        info!(
            "Settings loaded: SLOT_MIN={} SLOT_MAX={} PAYDAY_TIME={} PAYDAY_CREDITS={}",
            settings.slot_min, settings.slot_max, settings.payday_time, settings.payday_credits
        );

        Ok(Self {
            storage,
            settings: Arc::new(Mutex::new(settings)),
        })
    }

    /// Snapshot of the current settings.
    pub async fn current(&self) -> EconomySettings {
        self.settings.lock().await.clone()
    }

    pub async fn set_slot_min(&self, value: i64) -> Result<EconomySettings> {
        self.update(|settings| settings.slot_min = value).await
    }

    pub async fn set_slot_max(&self, value: i64) -> Result<EconomySettings> {
        self.update(|settings| settings.slot_max = value).await
    }

    pub async fn set_payday_time(&self, value: u64) -> Result<EconomySettings> {
        self.update(|settings| settings.payday_time = value).await
    }

    pub async fn set_payday_credits(&self, value: i64) -> Result<EconomySettings> {
        self.update(|settings| settings.payday_credits = value).await
    }

    /// Copy-on-write update: persist first, commit to memory only on
    /// success.
    async fn update<F>(&self, apply: F) -> Result<EconomySettings>
    where
        F: FnOnce(&mut EconomySettings),
    {
        let mut settings = self.settings.lock().await;

        let mut next = settings.clone();
        apply(&mut next);

        self.storage.save(&next).await?;
        *settings = next.clone();

        info!(
            "Settings updated: SLOT_MIN={} SLOT_MAX={} PAYDAY_TIME={} PAYDAY_CREDITS={}",
            next.slot_min, next.slot_max, next.payday_time, next.payday_credits
        );
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{JsonConnection, SettingsRepository};
    use tempfile::TempDir;

    async fn setup_test_settings() -> (SettingsService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let storage = Arc::new(SettingsRepository::new(connection));
        let service = SettingsService::load(storage).await.unwrap();
        (service, temp_dir)
    }

    #[tokio::test]
    async fn test_starts_from_defaults() {
        let (service, _temp_dir) = setup_test_settings().await;
        assert_eq!(service.current().await, EconomySettings::default());
    }

    #[tokio::test]
    async fn test_setters_are_independent() {
        let (service, _temp_dir) = setup_test_settings().await;

        service.set_slot_min(10).await.unwrap();
        service.set_payday_credits(999).await.unwrap();

        let current = service.current().await;
        assert_eq!(current.slot_min, 10);
        assert_eq!(current.payday_credits, 999);
        // Untouched fields keep their defaults.
        assert_eq!(current.slot_max, 100);
        assert_eq!(current.payday_time, 300);
    }

    #[tokio::test]
    async fn test_no_cross_field_validation() {
        let (service, _temp_dir) = setup_test_settings().await;

        // SLOT_MIN above SLOT_MAX is accepted as-is.
        service.set_slot_min(500).await.unwrap();
        let current = service.current().await;
        assert!(current.slot_min > current.slot_max);
    }

    #[tokio::test]
    async fn test_changes_survive_reload() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();

        {
            let storage = Arc::new(SettingsRepository::new(connection.clone()));
            let service = SettingsService::load(storage).await.unwrap();
            service.set_payday_time(3600).await.unwrap();
        }

        let storage = Arc::new(SettingsRepository::new(connection));
        let reloaded = SettingsService::load(storage).await.unwrap();
        assert_eq!(reloaded.current().await.payday_time, 3600);
    }
}
