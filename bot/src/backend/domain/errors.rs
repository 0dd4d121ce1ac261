use thiserror::Error;

/// Recoverable outcomes of economy operations.
///
/// Every variant except `Storage` is an expected user-facing condition the
/// command layer turns into a reply. `Storage` means a persistence write
/// failed; the mutation it guarded was not committed.
#[derive(Error, Debug)]
pub enum EconomyError {
    #[error("no account for user {user_id}")]
    NoAccount { user_id: String },

    #[error("user {user_id} already has an account")]
    AlreadyExists { user_id: String },

    #[error("insufficient funds: have {available}, need {required}")]
    InsufficientFunds { available: i64, required: i64 },

    #[error("invalid amount: {amount}")]
    InvalidAmount { amount: i64 },

    #[error("cannot transfer credits to yourself")]
    SelfTransfer,

    #[error("too soon: {remaining} seconds until the next payday")]
    TooSoon { remaining: u64 },

    #[error("bid must be between {min} and {max}")]
    BidOutOfRange { min: i64, max: i64 },

    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, EconomyError>;
