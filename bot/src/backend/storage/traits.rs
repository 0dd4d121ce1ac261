//! # Storage Traits
//!
//! Abstractions over the two persisted documents. The domain layer only
//! depends on these traits, so the JSON file backend can be swapped out (or
//! mocked in tests) without touching the services.

use anyhow::Result;
use async_trait::async_trait;
use shared::{Account, EconomySettings};
use std::collections::HashMap;

/// Storage for the accounts document (user id -> account record).
///
/// The document is always loaded and saved whole; there are no partial
/// writes. A save must be durable before the caller treats the mutation as
/// committed.
#[async_trait]
pub trait BankStorage: Send + Sync {
    /// Whether the accounts document exists yet.
    async fn exists(&self) -> Result<bool>;

    /// Load the full account map. A missing document loads as an empty map.
    async fn load(&self) -> Result<HashMap<String, Account>>;

    /// Atomically overwrite the accounts document with the given map.
    async fn save(&self, accounts: &HashMap<String, Account>) -> Result<()>;
}

/// Storage for the settings document.
#[async_trait]
pub trait SettingsStorage: Send + Sync {
    /// Whether the settings document exists yet.
    async fn exists(&self) -> Result<bool>;

    /// Load the settings. A missing document loads as the defaults.
    async fn load(&self) -> Result<EconomySettings>;

    /// Atomically overwrite the settings document.
    async fn save(&self, settings: &EconomySettings) -> Result<()>;
}
