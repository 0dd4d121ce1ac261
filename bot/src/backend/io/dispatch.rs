//! Command dispatch.
//!
//! The router is the collaborator between the chat host and the domain
//! services: it performs the admin capability gate, calls the service the
//! parsed command maps to, and renders every outcome (including the
//! expected error conditions) as a reply string for the host to deliver.

use log::{error, info, warn};
use std::time::Instant;

use crate::backend::domain::errors::EconomyError;
use crate::backend::domain::slot_machine;
use crate::backend::io::commands::{self, Command};
use crate::backend::storage::{AuditAction, AuditEntry};
use crate::backend::AppState;
use shared::{PayoutTier, SpinOutcome};

/// Identity of the invoking user, as supplied by the host platform. The
/// host performs authentication; `is_admin` reflects its admin or
/// manage-server permission check.
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub user_id: String,
    pub user_name: String,
    pub is_admin: bool,
}

#[derive(Clone)]
pub struct CommandRouter {
    state: AppState,
    /// Origin of the monotonic clock used for payday cooldowns.
    started: Instant,
}

impl CommandRouter {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            started: Instant::now(),
        }
    }

    /// Handle one command invocation and produce the reply text.
    pub async fn handle(&self, ctx: &CommandContext, input: &str) -> String {
        let command = match commands::parse(input) {
            Ok(command) => command,
            Err(parse_error) => return parse_error.to_string(),
        };

        // Opportunistic display-name refresh for known users.
        if let Err(err) = self
            .state
            .bank
            .refresh_name(&ctx.user_id, &ctx.user_name)
            .await
        {
            warn!("Failed to refresh display name of {}: {}", ctx.user_id, err);
        }

        match command {
            Command::Register => self.register(ctx).await,
            Command::Balance { target } => self.balance(ctx, target).await,
            Command::Transfer { target, amount } => self.transfer(ctx, &target, amount).await,
            Command::SetBalance { target, amount } => {
                self.set_balance(ctx, &target, amount).await
            }
            Command::Payday => self.payday(ctx).await,
            Command::Payouts => slot_machine::PAYOUTS.to_string(),
            Command::Slot { bid } => self.slot(ctx, bid).await,
            Command::ShowSettings => self.show_settings(ctx).await,
            Command::SetSlotMin { value } => {
                self.admin_setting(ctx, move |state| async move {
                    state.settings.set_slot_min(value).await?;
                    Ok(format!("Minimum bid is now {} credits.", value))
                })
                .await
            }
            Command::SetSlotMax { value } => {
                self.admin_setting(ctx, move |state| async move {
                    state.settings.set_slot_max(value).await?;
                    Ok(format!("Maximum bid is now {} credits.", value))
                })
                .await
            }
            Command::SetPaydayTime { value } => {
                self.admin_setting(ctx, move |state| async move {
                    state.settings.set_payday_time(value).await?;
                    Ok(format!(
                        "Value modified. At least {} seconds must pass between each payday.",
                        value
                    ))
                })
                .await
            }
            Command::SetPaydayCredits { value } => {
                self.admin_setting(ctx, move |state| async move {
                    state.settings.set_payday_credits(value).await?;
                    Ok(format!("Every payday will now give {} credits.", value))
                })
                .await
            }
        }
    }

    async fn register(&self, ctx: &CommandContext) -> String {
        match self.state.bank.register(&ctx.user_id, &ctx.user_name).await {
            Ok(account) => format!("Account opened. Current balance: {}", account.balance),
            Err(EconomyError::AlreadyExists { .. }) => {
                "You already have an account at the bank.".to_string()
            }
            Err(err) => internal_error(err),
        }
    }

    async fn balance(&self, ctx: &CommandContext, target: Option<String>) -> String {
        match target {
            None => match self.state.bank.balance(&ctx.user_id).await {
                Ok(balance) => format!("Your balance is: {}", balance),
                Err(EconomyError::NoAccount { .. }) => {
                    "You don't have an account at the bank. Type `bank register` to open one."
                        .to_string()
                }
                Err(err) => internal_error(err),
            },
            Some(target) => match self.state.bank.account(&target).await {
                Ok(account) => format!("{}'s balance is {}", account.name, account.balance),
                Err(EconomyError::NoAccount { .. }) => "That user has no bank account.".to_string(),
                Err(err) => internal_error(err),
            },
        }
    }

    async fn transfer(&self, ctx: &CommandContext, target: &str, amount: i64) -> String {
        match self.state.bank.transfer(&ctx.user_id, target, amount).await {
            Ok(()) => {
                let target_name = self
                    .state
                    .bank
                    .account(target)
                    .await
                    .map(|account| account.name)
                    .unwrap_or_else(|_| target.to_string());

                info!(
                    "{}({}) transferred {} credits to {}({})",
                    ctx.user_name, ctx.user_id, amount, target_name, target
                );
                self.audit(AuditEntry::new(
                    &ctx.user_id,
                    &ctx.user_name,
                    AuditAction::Transfer,
                    amount,
                    target,
                    &target_name,
                ));

                format!(
                    "{} credits have been transferred to {}'s account.",
                    amount, target_name
                )
            }
            Err(EconomyError::SelfTransfer) => {
                "You can't transfer credits to yourself.".to_string()
            }
            Err(EconomyError::InvalidAmount { .. }) => {
                "You need to transfer at least 1 credit.".to_string()
            }
            Err(EconomyError::NoAccount { user_id }) if user_id == ctx.user_id => {
                "You don't have an account at the bank. Type `bank register` to open one."
                    .to_string()
            }
            Err(EconomyError::NoAccount { .. }) => "That user has no bank account.".to_string(),
            Err(EconomyError::InsufficientFunds { .. }) => {
                "You don't have that sum in your bank account.".to_string()
            }
            Err(err) => internal_error(err),
        }
    }

    async fn set_balance(&self, ctx: &CommandContext, target: &str, amount: i64) -> String {
        if !ctx.is_admin {
            return no_permission();
        }

        match self.state.bank.set_balance(target, amount).await {
            Ok(account) => {
                info!(
                    "{}({}) set {} credits to {}({})",
                    ctx.user_name, ctx.user_id, amount, account.name, target
                );
                self.audit(AuditEntry::new(
                    &ctx.user_id,
                    &ctx.user_name,
                    AuditAction::SetBalance,
                    amount,
                    target,
                    &account.name,
                ));

                format!("{}'s credits have been set to {}.", account.name, amount)
            }
            Err(EconomyError::NoAccount { .. }) => "User has no bank account.".to_string(),
            Err(err) => internal_error(err),
        }
    }

    async fn payday(&self, ctx: &CommandContext) -> String {
        let now = self.started.elapsed().as_secs();
        match self.state.payday.claim(&ctx.user_id, now).await {
            Ok(amount) => format!("Here, take some credits. Enjoy! (+{} credits!)", amount),
            Err(EconomyError::TooSoon { remaining }) => format!(
                "Too soon. You have to wait {} more seconds before your next payday.",
                remaining
            ),
            Err(EconomyError::NoAccount { .. }) => {
                "You need an account to receive credits. Type `bank register` to open one."
                    .to_string()
            }
            Err(err) => internal_error(err),
        }
    }

    async fn slot(&self, ctx: &CommandContext, bid: i64) -> String {
        match self.state.slots.play(&ctx.user_id, bid).await {
            Ok((outcome, balance)) => render_spin(&outcome, balance),
            Err(EconomyError::BidOutOfRange { min, max }) => {
                format!("Bid must be between {} and {}.", min, max)
            }
            Err(EconomyError::NoAccount { .. }) | Err(EconomyError::InsufficientFunds { .. }) => {
                "You need an account with enough funds to play the slot machine.".to_string()
            }
            Err(err) => internal_error(err),
        }
    }

    async fn show_settings(&self, ctx: &CommandContext) -> String {
        if !ctx.is_admin {
            return no_permission();
        }

        let settings = self.state.settings.current().await;
        format!(
            "SLOT_MIN: {}\nSLOT_MAX: {}\nPAYDAY_TIME: {}\nPAYDAY_CREDITS: {}",
            settings.slot_min, settings.slot_max, settings.payday_time, settings.payday_credits
        )
    }

    async fn admin_setting<F, Fut>(&self, ctx: &CommandContext, apply: F) -> String
    where
        F: FnOnce(AppState) -> Fut,
        Fut: std::future::Future<Output = Result<String, EconomyError>>,
    {
        if !ctx.is_admin {
            return no_permission();
        }

        match apply(self.state.clone()).await {
            Ok(reply) => reply,
            Err(err) => internal_error(err),
        }
    }

    /// Best-effort audit append; the mutation is already committed.
    fn audit(&self, entry: AuditEntry) {
        if let Err(err) = self.state.audit.append(&entry) {
            warn!("Failed to write audit entry: {}", err);
        }
    }
}

fn render_spin(outcome: &SpinOutcome, balance: i64) -> String {
    let mut reply = String::new();
    reply.push_str(&format!(
        "  {} {} {}\n",
        outcome.reels[0][0], outcome.reels[1][0], outcome.reels[2][0]
    ));
    reply.push_str(&format!(
        ">{} {} {}\n",
        outcome.reels[0][1], outcome.reels[1][1], outcome.reels[2][1]
    ));
    reply.push_str(&format!(
        "  {} {} {}\n",
        outcome.reels[0][2], outcome.reels[1][2], outcome.reels[2][2]
    ));

    let result = match outcome.tier {
        PayoutTier::Jackpot => format!("226! Your bet is multiplied * 5000! {}!", outcome.delta),
        PayoutTier::ThreeClovers => "Three FLC! +1000!".to_string(),
        PayoutTier::ThreeCherries => "Three cherries! +800!".to_string(),
        PayoutTier::ThreeOfAKind => "Three symbols! +500!".to_string(),
        PayoutTier::TwoSix => format!("26! Your bet is multiplied * 4! {}!", outcome.delta),
        PayoutTier::TwoCherries => {
            format!("Two cherries! Your bet is multiplied * 3! {}!", outcome.delta)
        }
        PayoutTier::AnyPair => {
            format!("Two symbols! Your bet is multiplied * 2! {}!", outcome.delta)
        }
        PayoutTier::NoMatch => "Nothing! Lost bet.".to_string(),
    };
    reply.push_str(&result);

    if outcome.tier.is_win() {
        reply.push_str(&format!("\nCurrent credits: {}", balance));
    } else {
        reply.push_str(&format!("\nCredits left: {}", balance));
    }
    reply
}

fn no_permission() -> String {
    "You don't have permission to do that.".to_string()
}

fn internal_error(err: EconomyError) -> String {
    error!("Command failed: {}", err);
    "Something went wrong on our side. Try again later.".to_string()
}
