//! Domain layer: the economy services and their error type.
//!
//! Services own their state explicitly and are handed to the command layer
//! by value (they are cheap `Clone`s over shared internals); nothing in
//! here reaches for ambient globals.

pub mod bank_service;
pub mod errors;
pub mod payday_service;
pub mod settings_service;
pub mod slot_machine;
pub mod slot_service;

pub use bank_service::BankService;
pub use errors::EconomyError;
pub use payday_service::PaydayService;
pub use settings_service::SettingsService;
pub use slot_service::SlotService;
