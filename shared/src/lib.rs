use serde::{Deserialize, Serialize};
use std::fmt;

/// A bank account as stored in the accounts document.
///
/// Accounts are keyed by the platform user id in the persisted map, so the
/// record itself only carries the display name and the balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Display name of the owner, refreshed when the user is seen again
    pub name: String,
    /// Current balance in credits. Only the administrative set path may
    /// drive this negative.
    pub balance: i64,
}

impl Account {
    /// Balance granted on registration.
    pub const OPENING_BALANCE: i64 = 100;

    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            balance: Self::OPENING_BALANCE,
        }
    }
}

/// Tunable settings, persisted as a flat JSON document.
///
/// Field names are mapped to the historical SCREAMING_SNAKE_CASE keys of the
/// settings document, which admin tooling may edit directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EconomySettings {
    /// Minimum slot machine bid
    #[serde(rename = "SLOT_MIN")]
    pub slot_min: i64,
    /// Maximum slot machine bid
    #[serde(rename = "SLOT_MAX")]
    pub slot_max: i64,
    /// Seconds a user must wait between paydays
    #[serde(rename = "PAYDAY_TIME")]
    pub payday_time: u64,
    /// Credits granted per payday
    #[serde(rename = "PAYDAY_CREDITS")]
    pub payday_credits: i64,
}

impl Default for EconomySettings {
    fn default() -> Self {
        Self {
            slot_min: 5,
            slot_max: 100,
            payday_time: 300,
            payday_credits: 120,
        }
    }
}

/// A symbol on the slot machine strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotSymbol {
    Cherries,
    Cookie,
    Two,
    FourLeafClover,
    Cyclone,
    Sunflower,
    Six,
    Mushroom,
    Heart,
    Snowflake,
}

impl fmt::Display for SlotSymbol {
    /// Renders the symbol as the chat shortcode hosts display inline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            SlotSymbol::Cherries => ":cherries:",
            SlotSymbol::Cookie => ":cookie:",
            SlotSymbol::Two => ":two:",
            SlotSymbol::FourLeafClover => ":four_leaf_clover:",
            SlotSymbol::Cyclone => ":cyclone:",
            SlotSymbol::Sunflower => ":sunflower:",
            SlotSymbol::Six => ":six:",
            SlotSymbol::Mushroom => ":mushroom:",
            SlotSymbol::Heart => ":heart:",
            SlotSymbol::Snowflake => ":snowflake:",
        };
        f.write_str(code)
    }
}

/// One row of the payout table. Rules are evaluated top-down and the first
/// match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutTier {
    /// Exact line (two, two, six): bid * 5000
    Jackpot,
    /// Three four-leaf-clovers: bid + 1000
    ThreeClovers,
    /// Three cherries: bid + 800
    ThreeCherries,
    /// Any other three-of-a-kind: bid + 500
    ThreeOfAKind,
    /// Adjacent (two, six) in that order: bid * 4
    TwoSix,
    /// Adjacent pair of cherries: bid * 3
    TwoCherries,
    /// Any other adjacent pair: bid * 2
    AnyPair,
    /// No match: the bid is forfeited
    NoMatch,
}

impl PayoutTier {
    pub fn is_win(&self) -> bool {
        !matches!(self, PayoutTier::NoMatch)
    }
}

/// The result of a single spin, carrying everything a host needs to render
/// the machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    /// The three visible windows, one column per reel, top to bottom.
    pub reels: [[SlotSymbol; 3]; 3],
    /// The middle row, used for scoring.
    pub line: [SlotSymbol; 3],
    /// The payout rule the line matched.
    pub tier: PayoutTier,
    /// Signed balance change: the payout on a win, minus the bid on a loss.
    pub delta: i64,
}
