use log::info;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::backend::domain::bank_service::BankService;
use crate::backend::domain::errors::{EconomyError, Result};
use crate::backend::domain::settings_service::SettingsService;

/// Cooldown-gated periodic credit grants.
///
/// The register of last-claim timestamps is in-memory only: a restart
/// forgets it and every user gets one free payday. The timestamps are
/// monotonic seconds supplied by the caller.
#[derive(Clone)]
pub struct PaydayService {
    bank: BankService,
    settings: SettingsService,
    register: Arc<Mutex<HashMap<String, u64>>>,
}

impl PaydayService {
    pub fn new(bank: BankService, settings: SettingsService) -> Self {
        Self {
            bank,
            settings,
            register: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Claim a payday at time `now`. Returns the granted amount.
    ///
    /// The first claim for a user always grants. Afterwards a claim grants
    /// once the absolute difference to the previous claim time reaches
    /// PAYDAY_TIME; a clock that runs backwards far enough therefore also
    /// re-arms the cooldown.
    pub async fn claim(&self, user_id: &str, now: u64) -> Result<i64> {
        if !self.bank.has_account(user_id).await {
            return Err(EconomyError::NoAccount {
                user_id: user_id.to_string(),
            });
        }

        let settings = self.settings.current().await;
        let mut register = self.register.lock().await;

        if let Some(&last) = register.get(user_id) {
            let elapsed = now.abs_diff(last);
            if elapsed < settings.payday_time {
                return Err(EconomyError::TooSoon {
                    remaining: settings.payday_time - elapsed,
                });
            }
        }

        // Credit before recording the claim: a failed save must not burn
        // the user's payday.
        self.bank.credit(user_id, settings.payday_credits).await?;
        register.insert(user_id.to_string(), now);

        info!(
            "Payday of {} credits granted to {} at t={}",
            settings.payday_credits, user_id, now
        );
        Ok(settings.payday_credits)
    }
}
