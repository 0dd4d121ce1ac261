//! Storage layer: persistence traits and the JSON file backend.

pub mod json;
pub mod traits;

pub use json::{AuditAction, AuditEntry, AuditLog, BankRepository, JsonConnection, SettingsRepository};
pub use traits::{BankStorage, SettingsStorage};
