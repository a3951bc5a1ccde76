use thiserror::Error;

use crate::types::DrawStatus;

#[derive(Error, Debug, PartialEq)]
pub enum DrawError {
    #[error("invalid slot configuration: {reason}")]
    Configuration { reason: String },

    #[error("draw results already exist; the lottery is locked")]
    AlreadyLocked,

    #[error("cannot start a draw with no applicants")]
    EmptyApplicantList,

    #[error("cannot {action} while the draw is {status}")]
    InvalidTransition { action: String, status: DrawStatus },

    #[error("applicant list changed mid-draw: expected {expected}, got {actual}")]
    ApplicantListChanged { expected: u32, actual: u32 },

    #[error("flat {flat_number} is registered more than once")]
    DuplicateApplicant { flat_number: String },

    #[error("flat {flat_number} requested {requested} slots (must be 1 or 2)")]
    InvalidSlotRequest { flat_number: String, requested: u8 },

    #[error("flat number must not be empty")]
    EmptyFlatNumber,

    #[error("refusing to persist result set: {reason}")]
    InvalidResultSet { reason: String },

    #[error("failed to persist draw results: {reason}")]
    PersistenceFailure { reason: String },
}

impl DrawError {
    pub(crate) fn transition(action: &str, status: DrawStatus) -> Self {
        DrawError::InvalidTransition {
            action: action.to_string(),
            status,
        }
    }
}
