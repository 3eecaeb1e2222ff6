use thiserror::Error;

use agora_types::Timestamp;

#[derive(Debug, Error)]
pub enum VotesError {
    #[error("insufficient balance: have {have}, need {need}")]
    InsufficientBalance { have: u128, need: u128 },

    #[error("delegated weight underflow: have {have}, need {need}")]
    WeightUnderflow { have: u128, need: u128 },

    #[error("timestamp regression: last checkpoint at {last}, write at {at}")]
    TimestampRegression { last: Timestamp, at: Timestamp },

    #[error("arithmetic overflow")]
    Overflow,
}
