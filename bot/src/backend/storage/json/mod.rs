//! JSON file-backed storage.
//!
//! Two whole-document repositories (accounts, settings) plus the
//! append-only audit log, all living in one data directory managed by
//! [`JsonConnection`].

pub mod audit_log;
pub mod bank_repository;
pub mod connection;
pub mod settings_repository;

pub use audit_log::{AuditAction, AuditEntry, AuditLog};
pub use bank_repository::BankRepository;
pub use connection::JsonConnection;
pub use settings_repository::SettingsRepository;
