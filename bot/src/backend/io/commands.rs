//! Text-command grammar.
//!
//! The host delivers the raw command text (everything after its own prefix
//! handling); parsing turns it into a typed [`Command`] so dispatch is an
//! exhaustive match instead of string comparisons spread around handlers.

use std::fmt;
use std::str::FromStr;

/// A parsed user command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `bank register`
    Register,
    /// `bank balance [user]`
    Balance { target: Option<String> },
    /// `bank transfer <user> <amount>`
    Transfer { target: String, amount: i64 },
    /// `bank set <user> <amount>` (admin)
    SetBalance { target: String, amount: i64 },
    /// `payday`
    Payday,
    /// `payouts`
    Payouts,
    /// `slot <bid>`
    Slot { bid: i64 },
    /// `economyset` with no subcommand (admin)
    ShowSettings,
    /// `economyset slotmin <value>` (admin)
    SetSlotMin { value: i64 },
    /// `economyset slotmax <value>` (admin)
    SetSlotMax { value: i64 },
    /// `economyset paydaytime <seconds>` (admin)
    SetPaydayTime { value: u64 },
    /// `economyset paydaycredits <value>` (admin)
    SetPaydayCredits { value: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    Empty,
    UnknownCommand(String),
    MissingArgument(&'static str),
    InvalidNumber(&'static str, String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::Empty => write!(f, "No command given."),
            ParseError::UnknownCommand(command) => write!(f, "Unknown command: {}", command),
            ParseError::MissingArgument(name) => write!(f, "Missing argument: <{}>", name),
            ParseError::InvalidNumber(name, value) => {
                write!(f, "Argument <{}> must be a number, got: {}", name, value)
            }
        }
    }
}

/// Parse a command line.
pub fn parse(input: &str) -> Result<Command, ParseError> {
    let mut tokens = input.split_whitespace();
    let head = tokens.next().ok_or(ParseError::Empty)?;

    match head {
        "bank" => parse_bank(&mut tokens),
        "payday" => Ok(Command::Payday),
        "payouts" => Ok(Command::Payouts),
        "slot" => Ok(Command::Slot {
            bid: number("bid", tokens.next())?,
        }),
        "economyset" => parse_economyset(&mut tokens),
        other => Err(ParseError::UnknownCommand(other.to_string())),
    }
}

fn parse_bank<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<Command, ParseError> {
    match tokens.next() {
        Some("register") => Ok(Command::Register),
        Some("balance") => Ok(Command::Balance {
            target: tokens.next().map(str::to_string),
        }),
        Some("transfer") => {
            let target = tokens
                .next()
                .ok_or(ParseError::MissingArgument("user"))?
                .to_string();
            let amount = number("amount", tokens.next())?;
            Ok(Command::Transfer { target, amount })
        }
        Some("set") => {
            let target = tokens
                .next()
                .ok_or(ParseError::MissingArgument("user"))?
                .to_string();
            let amount = number("amount", tokens.next())?;
            Ok(Command::SetBalance { target, amount })
        }
        Some(other) => Err(ParseError::UnknownCommand(format!("bank {}", other))),
        None => Err(ParseError::MissingArgument("subcommand")),
    }
}

fn parse_economyset<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<Command, ParseError> {
    match tokens.next() {
        None => Ok(Command::ShowSettings),
        Some("slotmin") => Ok(Command::SetSlotMin {
            value: number("bid", tokens.next())?,
        }),
        Some("slotmax") => Ok(Command::SetSlotMax {
            value: number("bid", tokens.next())?,
        }),
        Some("paydaytime") => Ok(Command::SetPaydayTime {
            value: number("seconds", tokens.next())?,
        }),
        Some("paydaycredits") => Ok(Command::SetPaydayCredits {
            value: number("credits", tokens.next())?,
        }),
        Some(other) => Err(ParseError::UnknownCommand(format!("economyset {}", other))),
    }
}

fn number<T: FromStr>(name: &'static str, token: Option<&str>) -> Result<T, ParseError> {
    let token = token.ok_or(ParseError::MissingArgument(name))?;
    token
        .parse()
        .map_err(|_| ParseError::InvalidNumber(name, token.to_string()))
}
