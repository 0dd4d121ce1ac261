use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::domain::errors::{EconomyError, Result};
use crate::backend::storage::BankStorage;
use shared::Account;

/// The account store.
///
/// Owns the in-memory account map behind a single store-wide lock; every
/// mutating operation rewrites the backing document before the change is
/// committed to the map, so an acknowledged mutation is always durable and
/// a failed save leaves the store as it was.
#[derive(Clone)]
pub struct BankService {
    storage: Arc<dyn BankStorage>,
    accounts: Arc<Mutex<HashMap<String, Account>>>,
}

impl BankService {
    /// Load the account map from storage and wrap it in a service.
    pub async fn load(storage: Arc<dyn BankStorage>) -> anyhow::Result<Self> {
        let accounts = storage.load().await?;
        info!("Bank loaded with {} accounts", accounts.len());

        Ok(Self {
            storage,
            accounts: Arc::new(Mutex::new(accounts)),
        })
    }

    /// Open an account with the opening balance. Fails if the user already
    /// has one; the existing account is left unchanged.
    pub async fn register(&self, user_id: &str, name: &str) -> Result<Account> {
        let mut accounts = self.accounts.lock().await;

        if accounts.contains_key(user_id) {
            warn!("Registration rejected, account exists: {}", user_id);
            return Err(EconomyError::AlreadyExists {
                user_id: user_id.to_string(),
            });
        }

        let mut next = accounts.clone();
        let account = Account::new(name);
        next.insert(user_id.to_string(), account.clone());

        self.storage.save(&next).await?;
        *accounts = next;

        info!("Opened account for {} ({})", name, user_id);
        Ok(account)
    }

    pub async fn has_account(&self, user_id: &str) -> bool {
        self.accounts.lock().await.contains_key(user_id)
    }

    /// Current balance of a user.
    pub async fn balance(&self, user_id: &str) -> Result<i64> {
        self.account(user_id).await.map(|account| account.balance)
    }

    /// Full account record of a user.
    pub async fn account(&self, user_id: &str) -> Result<Account> {
        self.accounts
            .lock()
            .await
            .get(user_id)
            .cloned()
            .ok_or_else(|| EconomyError::NoAccount {
                user_id: user_id.to_string(),
            })
    }

    /// Refresh the stored display name when the platform reports a new one.
    /// A no-op for unknown users or unchanged names.
    pub async fn refresh_name(&self, user_id: &str, name: &str) -> Result<()> {
        let mut accounts = self.accounts.lock().await;

        let mut next = accounts.clone();
        match next.get_mut(user_id) {
            Some(account) if account.name != name => account.name = name.to_string(),
            _ => return Ok(()),
        }

        self.storage.save(&next).await?;
        *accounts = next;

        info!("Refreshed display name of {} to {}", user_id, name);
        Ok(())
    }

    /// Increase a balance by a non-negative amount.
    pub async fn credit(&self, user_id: &str, amount: i64) -> Result<Account> {
        if amount < 0 {
            return Err(EconomyError::InvalidAmount { amount });
        }

        self.mutate_balance(user_id, |balance| {
            balance
                .checked_add(amount)
                .ok_or(EconomyError::InvalidAmount { amount })
        })
        .await
    }

    /// Decrease a balance by a non-negative amount. Fails without mutation
    /// when the balance does not cover it.
    pub async fn debit(&self, user_id: &str, amount: i64) -> Result<Account> {
        if amount < 0 {
            return Err(EconomyError::InvalidAmount { amount });
        }

        self.mutate_balance(user_id, |balance| {
            if balance < amount {
                Err(EconomyError::InsufficientFunds {
                    available: balance,
                    required: amount,
                })
            } else {
                Ok(balance - amount)
            }
        })
        .await
    }

    /// Administrative override. No lower bound: a negative balance set this
    /// way is accepted and simply cannot be debited afterwards.
    pub async fn set_balance(&self, user_id: &str, amount: i64) -> Result<Account> {
        self.mutate_balance(user_id, |_| Ok(amount)).await
    }

    /// Move credits between two accounts. Either both legs apply or, when
    /// any check or the save fails, neither does.
    pub async fn transfer(&self, from: &str, to: &str, amount: i64) -> Result<()> {
        if from == to {
            return Err(EconomyError::SelfTransfer);
        }
        if amount < 1 {
            return Err(EconomyError::InvalidAmount { amount });
        }

        let mut accounts = self.accounts.lock().await;

        // All checks and both legs run against a scratch copy; `next` is
        // only committed after a durable save, so a failure at any point
        // leaves the store untouched.
        let mut next = accounts.clone();

        next.get_mut(to)
            .ok_or_else(|| EconomyError::NoAccount {
                user_id: to.to_string(),
            })?
            .balance += amount;

        let source = next.get_mut(from).ok_or_else(|| EconomyError::NoAccount {
            user_id: from.to_string(),
        })?;
        if source.balance < amount {
            return Err(EconomyError::InsufficientFunds {
                available: source.balance,
                required: amount,
            });
        }
        source.balance -= amount;

        self.storage.save(&next).await?;
        *accounts = next;

        info!("Transferred {} credits from {} to {}", amount, from, to);
        Ok(())
    }

    /// Shared read-check-mutate-persist-commit path for single-account
    /// balance changes.
    async fn mutate_balance<F>(&self, user_id: &str, apply: F) -> Result<Account>
    where
        F: FnOnce(i64) -> Result<i64>,
    {
        let mut accounts = self.accounts.lock().await;

        let mut next = accounts.clone();
        let updated = {
            let account = next.get_mut(user_id).ok_or_else(|| EconomyError::NoAccount {
                user_id: user_id.to_string(),
            })?;
            account.balance = apply(account.balance)?;
            account.clone()
        };

        self.storage.save(&next).await?;
        *accounts = next;

        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::storage::{BankRepository, JsonConnection};
    use anyhow::anyhow;
    use async_trait::async_trait;
    use tempfile::TempDir;

    async fn setup_test_bank() -> (BankService, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();
        let storage = Arc::new(BankRepository::new(connection));
        let bank = BankService::load(storage).await.unwrap();
        (bank, temp_dir)
    }

    /// Storage that accepts the initial load but rejects every save.
    struct RejectingStorage;

    #[async_trait]
    impl BankStorage for RejectingStorage {
        async fn exists(&self) -> anyhow::Result<bool> {
            Ok(false)
        }

        async fn load(&self) -> anyhow::Result<HashMap<String, Account>> {
            let mut accounts = HashMap::new();
            accounts.insert("a".to_string(), Account::new("Ada"));
            accounts.insert("b".to_string(), Account::new("Grace"));
            Ok(accounts)
        }

        async fn save(&self, _accounts: &HashMap<String, Account>) -> anyhow::Result<()> {
            Err(anyhow!("disk full"))
        }
    }

    #[tokio::test]
    async fn test_register_opens_with_100_credits() {
        let (bank, _temp_dir) = setup_test_bank().await;

        let account = bank.register("1001", "Ada").await.unwrap();
        assert_eq!(account.balance, 100);
        assert!(bank.has_account("1001").await);
    }

    #[tokio::test]
    async fn test_register_rejects_existing_account() {
        let (bank, _temp_dir) = setup_test_bank().await;

        bank.register("1001", "Ada").await.unwrap();
        bank.credit("1001", 50).await.unwrap();

        let result = bank.register("1001", "Ada").await;
        assert!(matches!(result, Err(EconomyError::AlreadyExists { .. })));
        // The existing account is untouched.
        assert_eq!(bank.balance("1001").await.unwrap(), 150);
    }

    #[tokio::test]
    async fn test_balance_requires_account() {
        let (bank, _temp_dir) = setup_test_bank().await;

        assert!(matches!(
            bank.balance("missing").await,
            Err(EconomyError::NoAccount { .. })
        ));
    }

    #[tokio::test]
    async fn test_credit_and_debit() {
        let (bank, _temp_dir) = setup_test_bank().await;
        bank.register("1001", "Ada").await.unwrap();

        assert_eq!(bank.credit("1001", 40).await.unwrap().balance, 140);
        assert_eq!(bank.debit("1001", 90).await.unwrap().balance, 50);
    }

    #[tokio::test]
    async fn test_debit_insufficient_funds_leaves_balance_unchanged() {
        let (bank, _temp_dir) = setup_test_bank().await;
        bank.register("1001", "Ada").await.unwrap();
        bank.set_balance("1001", 10).await.unwrap();

        let result = bank.debit("1001", 20).await;
        assert!(matches!(
            result,
            Err(EconomyError::InsufficientFunds {
                available: 10,
                required: 20
            })
        ));
        assert_eq!(bank.balance("1001").await.unwrap(), 10);
    }

    #[tokio::test]
    async fn test_negative_amounts_rejected() {
        let (bank, _temp_dir) = setup_test_bank().await;
        bank.register("1001", "Ada").await.unwrap();

        assert!(matches!(
            bank.credit("1001", -5).await,
            Err(EconomyError::InvalidAmount { amount: -5 })
        ));
        assert!(matches!(
            bank.debit("1001", -5).await,
            Err(EconomyError::InvalidAmount { amount: -5 })
        ));
    }

    #[tokio::test]
    async fn test_set_balance_allows_negative_values() {
        let (bank, _temp_dir) = setup_test_bank().await;
        bank.register("1001", "Ada").await.unwrap();

        let account = bank.set_balance("1001", -40).await.unwrap();
        assert_eq!(account.balance, -40);

        // A negative balance cannot cover any debit.
        assert!(matches!(
            bank.debit("1001", 1).await,
            Err(EconomyError::InsufficientFunds { .. })
        ));
    }

    #[tokio::test]
    async fn test_transfer_moves_funds_and_conserves_total() {
        let (bank, _temp_dir) = setup_test_bank().await;
        bank.register("a", "Ada").await.unwrap();
        bank.register("b", "Grace").await.unwrap();

        bank.transfer("a", "b", 50).await.unwrap();

        assert_eq!(bank.balance("a").await.unwrap(), 50);
        assert_eq!(bank.balance("b").await.unwrap(), 150);
    }

    #[tokio::test]
    async fn test_transfer_validation() {
        let (bank, _temp_dir) = setup_test_bank().await;
        bank.register("a", "Ada").await.unwrap();
        bank.register("b", "Grace").await.unwrap();

        assert!(matches!(
            bank.transfer("a", "a", 10).await,
            Err(EconomyError::SelfTransfer)
        ));
        assert!(matches!(
            bank.transfer("a", "b", 0).await,
            Err(EconomyError::InvalidAmount { amount: 0 })
        ));
        assert!(matches!(
            bank.transfer("a", "nobody", 10).await,
            Err(EconomyError::NoAccount { .. })
        ));
        assert!(matches!(
            bank.transfer("a", "b", 5000).await,
            Err(EconomyError::InsufficientFunds { .. })
        ));

        // No partial mutation from any failed attempt.
        assert_eq!(bank.balance("a").await.unwrap(), 100);
        assert_eq!(bank.balance("b").await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_failed_save_rolls_back_transfer() {
        let bank = BankService::load(Arc::new(RejectingStorage)).await.unwrap();

        let result = bank.transfer("a", "b", 50).await;
        assert!(matches!(result, Err(EconomyError::Storage(_))));

        assert_eq!(bank.balance("a").await.unwrap(), 100);
        assert_eq!(bank.balance("b").await.unwrap(), 100);
    }

    #[tokio::test]
    async fn test_refresh_name_persists_new_name() {
        let (bank, _temp_dir) = setup_test_bank().await;
        bank.register("1001", "Ada").await.unwrap();

        bank.refresh_name("1001", "Ada L.").await.unwrap();
        assert_eq!(bank.account("1001").await.unwrap().name, "Ada L.");

        // Unknown users are ignored.
        bank.refresh_name("ghost", "Ghost").await.unwrap();
        assert!(!bank.has_account("ghost").await);
    }

    #[tokio::test]
    async fn test_balances_survive_reload() {
        let temp_dir = TempDir::new().unwrap();
        let connection = JsonConnection::new(temp_dir.path()).unwrap();

        {
            let storage = Arc::new(BankRepository::new(connection.clone()));
            let bank = BankService::load(storage).await.unwrap();
            bank.register("1001", "Ada").await.unwrap();
            bank.credit("1001", 400).await.unwrap();
        }

        let storage = Arc::new(BankRepository::new(connection));
        let reloaded = BankService::load(storage).await.unwrap();
        assert_eq!(reloaded.balance("1001").await.unwrap(), 500);
        assert_eq!(reloaded.account("1001").await.unwrap().name, "Ada");
    }
}
