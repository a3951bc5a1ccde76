use std::collections::{BTreeMap, BTreeSet};

use crate::error::DrawError;
use crate::types::DrawResult;

/// Write-once home of a completed draw.
///
/// `persist_all` is all-or-nothing and refuses with `AlreadyLocked` once any
/// result exists. `is_locked` must be checked under the same guard as the
/// write, never as a separate read-then-write.
pub trait ResultStore {
    fn is_locked(&self) -> Result<bool, DrawError>;

    fn persist_all(&mut self, results: &[DrawResult]) -> Result<(), DrawError>;

    fn lookup(&self, flat_number: &str) -> Result<Option<DrawResult>, DrawError>;
}

/// A completed result set must be non-empty, name each flat once and hand
/// out each slot at most once.
pub fn validate_result_set(results: &[DrawResult]) -> Result<(), DrawError> {
    if results.is_empty() {
        return Err(DrawError::InvalidResultSet {
            reason: "no results".to_string(),
        });
    }

    let mut flats = BTreeSet::new();
    let mut slots = BTreeSet::new();
    for result in results {
        if !flats.insert(result.flat_number.as_str()) {
            return Err(DrawError::InvalidResultSet {
                reason: format!("flat {} appears twice", result.flat_number),
            });
        }
        for slot in &result.granted_slots {
            if !slots.insert(slot) {
                return Err(DrawError::InvalidResultSet {
                    reason: format!("slot {} granted twice", slot),
                });
            }
        }
    }
    Ok(())
}

/// In-process store for hosts without durable storage, and for tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryResultStore {
    results: BTreeMap<String, DrawResult>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawResult> {
        self.results.values()
    }
}

impl ResultStore for MemoryResultStore {
    fn is_locked(&self) -> Result<bool, DrawError> {
        Ok(!self.results.is_empty())
    }

    fn persist_all(&mut self, results: &[DrawResult]) -> Result<(), DrawError> {
        if self.is_locked()? {
            return Err(DrawError::AlreadyLocked);
        }
        validate_result_set(results)?;

        // Build the full table before publishing it.
        let staged: BTreeMap<String, DrawResult> = results
            .iter()
            .map(|r| (r.flat_number.clone(), r.clone()))
            .collect();
        self.results = staged;
        Ok(())
    }

    fn lookup(&self, flat_number: &str) -> Result<Option<DrawResult>, DrawError> {
        Ok(self.results.get(flat_number).cloned())
    }
}
