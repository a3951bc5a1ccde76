use cosmwasm_std::{Order, StdError, StdResult, Storage, Timestamp};
use parking_lottery_common::{validate_result_set, DrawError, DrawResult, ResultStore};

use crate::state::{DrawLock, DRAW_LOCK, RESULTS};

/// Locked once the lock row or any result row exists.
pub fn is_locked(storage: &dyn Storage) -> StdResult<bool> {
    if DRAW_LOCK.exists(storage) {
        return Ok(true);
    }
    Ok(RESULTS
        .keys_raw(storage, None, None, Order::Ascending)
        .next()
        .is_some())
}

pub fn lookup_result(storage: &dyn Storage, flat_number: &str) -> StdResult<Option<DrawResult>> {
    RESULTS.may_load(storage, flat_number)
}

fn persistence_failure(err: StdError) -> DrawError {
    DrawError::PersistenceFailure {
        reason: err.to_string(),
    }
}

/// `ResultStore` over contract storage. All writes land in the caller's
/// transaction, so a failed commit leaves nothing behind.
pub struct ContractResultStore<'a> {
    storage: &'a mut dyn Storage,
    completed_at: Timestamp,
}

impl<'a> ContractResultStore<'a> {
    pub fn new(storage: &'a mut dyn Storage, completed_at: Timestamp) -> Self {
        Self {
            storage,
            completed_at,
        }
    }
}

impl ResultStore for ContractResultStore<'_> {
    fn is_locked(&self) -> Result<bool, DrawError> {
        is_locked(&*self.storage).map_err(persistence_failure)
    }

    fn persist_all(&mut self, results: &[DrawResult]) -> Result<(), DrawError> {
        if self.is_locked()? {
            return Err(DrawError::AlreadyLocked);
        }
        validate_result_set(results)?;

        for result in results {
            RESULTS
                .save(self.storage, &result.flat_number, result)
                .map_err(persistence_failure)?;
        }

        let lock = DrawLock {
            completed_at: self.completed_at,
            total_results: results.len() as u32,
            allotted: results.iter().filter(|r| r.is_allotted()).count() as u32,
            slots_used: results.iter().map(DrawResult::slots_granted).sum(),
        };
        DRAW_LOCK
            .save(self.storage, &lock)
            .map_err(persistence_failure)
    }

    fn lookup(&self, flat_number: &str) -> Result<Option<DrawResult>, DrawError> {
        lookup_result(&*self.storage, flat_number).map_err(persistence_failure)
    }
}
