//! Virtual currency ("bank") module for a chat bot.
//!
//! The backend is host-agnostic: a chat framework adapter (or the bundled
//! console host) feeds text commands to the command router and relays the
//! textual replies back to the invoking context.

pub mod backend;
