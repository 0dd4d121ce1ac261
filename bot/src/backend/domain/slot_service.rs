use log::info;
use rand::Rng;

use crate::backend::domain::bank_service::BankService;
use crate::backend::domain::errors::{EconomyError, Result};
use crate::backend::domain::settings_service::SettingsService;
use crate::backend::domain::slot_machine;
use shared::SpinOutcome;

/// Plays spins against the bank.
///
/// The bid is never pre-deducted: funds are only checked to cover it, and
/// after resolution exactly one mutation applies: credit the payout on a
/// win, debit the full bid on a loss.
#[derive(Clone)]
pub struct SlotService {
    bank: BankService,
    settings: SettingsService,
}

impl SlotService {
    pub fn new(bank: BankService, settings: SettingsService) -> Self {
        Self { bank, settings }
    }

    /// Spin with the thread RNG. Returns the outcome and the new balance.
    pub async fn play(&self, user_id: &str, bid: i64) -> Result<(SpinOutcome, i64)> {
        self.play_with_rng(user_id, bid, &mut rand::thread_rng())
            .await
    }

    /// Spin with a caller-supplied RNG.
    pub async fn play_with_rng<R: Rng>(
        &self,
        user_id: &str,
        bid: i64,
        rng: &mut R,
    ) -> Result<(SpinOutcome, i64)> {
        // Funds first, bounds second: a broke player is told about funds
        // even when the bid is also out of range.
        let balance = self.bank.balance(user_id).await?;
        if balance < bid {
            return Err(EconomyError::InsufficientFunds {
                available: balance,
                required: bid,
            });
        }

        let settings = self.settings.current().await;
        if bid < settings.slot_min || bid > settings.slot_max {
            return Err(EconomyError::BidOutOfRange {
                min: settings.slot_min,
                max: settings.slot_max,
            });
        }

        let outcome = slot_machine::spin(rng, bid);
        let balance = self.settle(user_id, bid, &outcome).await?;

        info!(
            "Slot spin by {}: bid={} tier={:?} delta={} balance={}",
            user_id, bid, outcome.tier, outcome.delta, balance
        );
        Ok((outcome, balance))
    }

    /// Apply the single balance mutation a resolved spin calls for.
    async fn settle(&self, user_id: &str, bid: i64, outcome: &SpinOutcome) -> Result<i64> {
        let account = if outcome.tier.is_win() {
            self.bank.credit(user_id, outcome.delta).await?
        } else {
            self.bank.debit(user_id, bid).await?
        };
        Ok(account.balance)
    }
}
