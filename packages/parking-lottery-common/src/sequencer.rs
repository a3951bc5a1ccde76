use std::collections::BTreeSet;

use cosmwasm_schema::cw_serde;

use crate::error::DrawError;
use crate::inventory::{SlotInventory, SlotLabel};
use crate::planner::{plan_pools, AllocationPools};
use crate::shuffle::Shuffler;
use crate::store::ResultStore;
use crate::types::{AllotmentStatus, Applicant, DegradePolicy, DrawResult, DrawStatus, StepOutcome};

/// Trim and upper-case a flat number so lookups match registration.
pub fn normalize_flat_number(raw: &str) -> String {
    raw.trim().to_uppercase()
}

/// Every applicant needs a non-empty, unique flat number and a 1 or 2 slot request.
pub fn validate_applicants(applicants: &[Applicant]) -> Result<(), DrawError> {
    let mut seen = BTreeSet::new();
    for applicant in applicants {
        if applicant.flat_number.is_empty() {
            return Err(DrawError::EmptyFlatNumber);
        }
        if !(1..=2).contains(&applicant.requested_slots) {
            return Err(DrawError::InvalidSlotRequest {
                flat_number: applicant.flat_number.clone(),
                requested: applicant.requested_slots,
            });
        }
        if !seen.insert(applicant.flat_number.as_str()) {
            return Err(DrawError::DuplicateApplicant {
                flat_number: applicant.flat_number.clone(),
            });
        }
    }
    Ok(())
}

/// The single live draw session.
///
/// Pools are planned once in `start` and only ever consumed through the two
/// cursors afterwards. `history[i]` is the result for `applicants[i]`.
#[cw_serde]
pub struct DrawState {
    pub status: DrawStatus,
    /// Index of the next applicant to reveal.
    pub position: u32,
    /// Applicant count fixed at start.
    pub total_applicants: u32,
    pub history: Vec<DrawResult>,
    pub pools: AllocationPools,
    pub next_pair: u32,
    pub next_single: u32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            status: DrawStatus::NotStarted,
            position: 0,
            total_applicants: 0,
            history: vec![],
            pools: AllocationPools::default(),
            next_pair: 0,
            next_single: 0,
        }
    }
}

impl DrawState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan the pools and begin revealing from the first applicant.
    pub fn start<S: Shuffler, R: ResultStore>(
        &mut self,
        applicants: &[Applicant],
        inventory: &SlotInventory,
        shuffler: &mut S,
        store: &R,
    ) -> Result<(), DrawError> {
        if store.is_locked()? {
            return Err(DrawError::AlreadyLocked);
        }
        if self.status != DrawStatus::NotStarted {
            return Err(DrawError::transition("start", self.status));
        }
        if applicants.is_empty() {
            return Err(DrawError::EmptyApplicantList);
        }
        validate_applicants(applicants)?;

        let two_slot = applicants.iter().filter(|a| a.wants_pair()).count();
        let pools = plan_pools(two_slot, inventory, shuffler);

        *self = Self {
            status: DrawStatus::Running,
            position: 0,
            total_applicants: applicants.len() as u32,
            history: Vec::with_capacity(applicants.len()),
            pools,
            next_pair: 0,
            next_single: 0,
        };
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), DrawError> {
        if self.status != DrawStatus::Running {
            return Err(DrawError::transition("pause", self.status));
        }
        self.status = DrawStatus::Paused;
        Ok(())
    }

    pub fn resume(&mut self) -> Result<(), DrawError> {
        if self.status != DrawStatus::Paused {
            return Err(DrawError::transition("resume", self.status));
        }
        self.status = DrawStatus::Running;
        Ok(())
    }

    /// Reveal exactly one applicant.
    ///
    /// A pair request takes the next planned pair; otherwise, or once pairs
    /// run out (subject to `policy`), the next single. With nothing left the
    /// applicant is recorded as not allotted.
    pub fn advance(
        &mut self,
        applicants: &[Applicant],
        policy: DegradePolicy,
    ) -> Result<StepOutcome, DrawError> {
        if self.status != DrawStatus::Running {
            return Err(DrawError::transition("advance", self.status));
        }
        if applicants.len() as u32 != self.total_applicants {
            return Err(DrawError::ApplicantListChanged {
                expected: self.total_applicants,
                actual: applicants.len() as u32,
            });
        }

        let applicant = &applicants[self.position as usize];
        let granted_slots = self.take_slots(applicant, policy);
        let status = if granted_slots.is_empty() {
            AllotmentStatus::NotAllotted
        } else {
            AllotmentStatus::Allotted
        };

        let result = DrawResult {
            flat_number: applicant.flat_number.clone(),
            display_name: applicant.display_name.clone(),
            requested_slots: applicant.requested_slots,
            granted_slots,
            status,
        };
        self.history.push(result.clone());
        self.position += 1;

        if self.position == self.total_applicants {
            self.status = DrawStatus::Completed;
            Ok(StepOutcome::Completed(result))
        } else {
            Ok(StepOutcome::Revealed(result))
        }
    }

    fn take_slots(&mut self, applicant: &Applicant, policy: DegradePolicy) -> Vec<SlotLabel> {
        if applicant.wants_pair() {
            if let Some(pair) = self.pools.pair_pool.get(self.next_pair as usize) {
                let slots = vec![pair.first.clone(), pair.second.clone()];
                self.next_pair += 1;
                return slots;
            }
            if policy == DegradePolicy::GrantNothing {
                return vec![];
            }
        }

        match self.pools.single_pool.get(self.next_single as usize) {
            Some(slot) => {
                let slot = slot.clone();
                self.next_single += 1;
                vec![slot]
            }
            None => vec![],
        }
    }

    /// Hand the completed history to the store. Safe to retry after a
    /// persistence failure; the history itself never changes.
    pub fn commit<R: ResultStore>(&self, store: &mut R) -> Result<(), DrawError> {
        if self.status != DrawStatus::Completed {
            return Err(DrawError::transition("commit", self.status));
        }
        store.persist_all(&self.history)
    }

    /// `advance`, committing in the same call when the last applicant is revealed.
    pub fn advance_and_commit<R: ResultStore>(
        &mut self,
        applicants: &[Applicant],
        policy: DegradePolicy,
        store: &mut R,
    ) -> Result<StepOutcome, DrawError> {
        let outcome = self.advance(applicants, policy)?;
        if outcome.is_completed() {
            self.commit(store)?;
        }
        Ok(outcome)
    }

    pub fn pairs_remaining(&self) -> u32 {
        self.pools.pair_pool.len() as u32 - self.next_pair
    }

    pub fn singles_remaining(&self) -> u32 {
        self.pools.single_pool.len() as u32 - self.next_single
    }

    pub fn remaining_applicants(&self) -> u32 {
        self.total_applicants - self.position
    }

    pub fn last_result(&self) -> Option<&DrawResult> {
        self.history.last()
    }
}
