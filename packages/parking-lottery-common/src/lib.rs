pub mod error;
pub mod inventory;
pub mod planner;
pub mod sequencer;
pub mod shuffle;
pub mod store;
pub mod types;

pub use error::DrawError;
pub use inventory::{
    reference_blocks, AdjacentPair, MAX_TOTAL_SLOTS, SlotBlock, SlotInventory, SlotLabel,
};
pub use planner::{plan_pools, AllocationPools};
pub use sequencer::{normalize_flat_number, validate_applicants, DrawState};
pub use shuffle::{Sha256Shuffler, Shuffler};
pub use store::{validate_result_set, MemoryResultStore, ResultStore};
pub use types::{AllotmentStatus, Applicant, DegradePolicy, DrawResult, DrawStatus, StepOutcome};
