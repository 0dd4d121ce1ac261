use anyhow::{Context, Result};
use async_trait::async_trait;
use log::debug;
use std::collections::HashMap;
use std::fs;

use super::connection::{atomic_write, JsonConnection};
use crate::backend::storage::BankStorage;
use shared::Account;

/// JSON file-backed accounts repository.
///
/// The whole document is rewritten on every save; the map is small (one
/// entry per registered chat user) and the spec for the document is a plain
/// keyed object, so there is nothing to gain from incremental writes.
#[derive(Clone)]
pub struct BankRepository {
    connection: JsonConnection,
}

impl BankRepository {
    pub fn new(connection: JsonConnection) -> Self {
        Self { connection }
    }
}

#[async_trait]
impl BankStorage for BankRepository {
    async fn exists(&self) -> Result<bool> {
        Ok(self.connection.bank_file_path().exists())
    }

    async fn load(&self) -> Result<HashMap<String, Account>> {
        let path = self.connection.bank_file_path();

        if !path.exists() {
            debug!("Accounts document missing, loading empty bank");
            return Ok(HashMap::new());
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read accounts document: {}", path.display()))?;
        let accounts: HashMap<String, Account> = serde_json::from_str(&content)
            .with_context(|| format!("Malformed accounts document: {}", path.display()))?;

        debug!("Loaded {} accounts", accounts.len());
        Ok(accounts)
    }

    async fn save(&self, accounts: &HashMap<String, Account>) -> Result<()> {
        let path = self.connection.bank_file_path();
        let content = serde_json::to_string_pretty(accounts)?;

        atomic_write(&path, &content)
            .with_context(|| format!("Failed to save accounts document: {}", path.display()))
    }
}
