//! IO layer: the command-layer collaborator between chat hosts and the
//! domain services.

pub mod commands;
pub mod dispatch;

pub use commands::{parse, Command, ParseError};
pub use dispatch::{CommandContext, CommandRouter};
