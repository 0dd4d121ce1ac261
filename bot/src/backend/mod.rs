//! # Backend Module
//!
//! Everything host-independent: domain services, persistence, and the
//! command router. A chat-framework adapter (or the console host in
//! `main.rs`) only needs [`initialize_backend`] and a [`CommandRouter`].
//!
//! ## Architecture
//!
//! ```text
//! Host adapter (chat framework, console loop)
//!     |
//! IO layer (command parsing, dispatch, replies)
//!     |
//! Domain layer (bank, payday, slots, settings)
//!     |
//! Storage layer (JSON documents, audit log)
//! ```

pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use log::info;
use std::path::Path;
use std::sync::Arc;

use domain::{BankService, PaydayService, SettingsService, SlotService};
use io::CommandRouter;
use storage::{AuditLog, BankRepository, JsonConnection, SettingsRepository};

/// All services, wired once at startup and handed to command handlers.
#[derive(Clone)]
pub struct AppState {
    pub bank: BankService,
    pub payday: PaydayService,
    pub slots: SlotService,
    pub settings: SettingsService,
    pub audit: AuditLog,
}

/// Initialize the backend over the given data directory.
pub async fn initialize_backend(data_dir: &Path) -> Result<AppState> {
    info!("Setting up storage in {}", data_dir.display());
    let connection = JsonConnection::new(data_dir)?;
    connection.ensure_documents_exist()?;

    info!("Setting up domain services");
    let bank = BankService::load(Arc::new(BankRepository::new(connection.clone()))).await?;
    let settings =
        SettingsService::load(Arc::new(SettingsRepository::new(connection.clone()))).await?;
    let payday = PaydayService::new(bank.clone(), settings.clone());
    let slots = SlotService::new(bank.clone(), settings.clone());
    let audit = AuditLog::new(connection.audit_file_path());

    Ok(AppState {
        bank,
        payday,
        slots,
        settings,
        audit,
    })
}

/// Create the command router over an initialized state.
pub fn create_router(state: AppState) -> CommandRouter {
    CommandRouter::new(state)
}
