use cosmwasm_std::StdError;
use parking_lottery_common::DrawError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Draw(#[from] DrawError),

    #[error("unauthorized: {reason}")]
    Unauthorized { reason: String },

    #[error("applicant registration is closed once a draw session has started")]
    RegistrationClosed,

    #[error("a draw session is in progress")]
    DrawInProgress,

    #[error("invalid hex: {field}")]
    InvalidHex { field: String },

    #[error("advance steps must be between 1 and {max}, got {steps}")]
    InvalidStepCount { steps: u32, max: u32 },

    #[error("reveal interval must be between {min} and {max} ms, got {got}")]
    InvalidRevealInterval { got: u64, min: u64, max: u64 },
}
