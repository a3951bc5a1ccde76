use cosmwasm_schema::{cw_serde, QueryResponses};
use parking_lottery_common::{Applicant, DegradePolicy, DrawResult, DrawStatus, SlotBlock};

use crate::state::LotteryConfig;

#[cw_serde]
pub struct InstantiateMsg {
    pub operator: String,
    /// Defaults to the reference layout G:26, UB:59, LB:50, T:70.
    pub blocks: Option<Vec<SlotBlock>>,
    /// Defaults to `DegradeToSingle`.
    pub degrade_policy: Option<DegradePolicy>,
    /// Defaults to 1600 ms.
    pub reveal_interval_ms: Option<u64>,
}

/// One row of the member list as supplied by the society office.
#[cw_serde]
pub struct ApplicantInput {
    pub flat_number: String,
    pub display_name: String,
    pub requested_slots: u8,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Append applicants in reveal order. Operator only, before the draw starts.
    RegisterApplicants { applicants: Vec<ApplicantInput> },
    /// Plan the slot pools from the seed and start revealing. Operator only.
    StartDraw {
        /// Hex-encoded seed material; pools are shuffled from sha256(seed).
        seed_hex: String,
    },
    /// Operator only.
    PauseDraw {},
    /// Operator only.
    ResumeDraw {},
    /// Reveal the next `steps` applicants (default 1). Operator only.
    Advance { steps: Option<u32> },
    /// Discard an unfinished session so a fresh one can be started. Admin only.
    ResetSession {},
    /// Update configuration. Admin only.
    UpdateConfig {
        operator: Option<String>,
        degrade_policy: Option<DegradePolicy>,
        reveal_interval_ms: Option<u64>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(LotteryConfig)]
    Config {},
    #[returns(DrawStateResponse)]
    DrawState {},
    #[returns(HistoryResponse)]
    History {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(ApplicantsResponse)]
    Applicants {
        start_after: Option<u32>,
        limit: Option<u32>,
    },
    #[returns(bool)]
    IsLocked {},
    /// Final result for one flat; `None` until the draw is locked.
    #[returns(Option<DrawResult>)]
    FlatResult { flat_number: String },
    #[returns(ResultsResponse)]
    Results {
        start_after: Option<String>,
        limit: Option<u32>,
    },
    #[returns(SummaryResponse)]
    Summary {},
    #[returns(InventoryResponse)]
    Inventory {},
}

#[cw_serde]
pub struct DrawStateResponse {
    pub status: DrawStatus,
    pub position: u32,
    pub total_applicants: u32,
    pub pairs_planned: u32,
    pub pairs_remaining: u32,
    pub singles_remaining: u32,
    /// The most recent reveal, for the live screen.
    pub latest: Option<DrawResult>,
    pub next_flat: Option<String>,
    pub reveal_interval_ms: u64,
    pub seed_hash: Option<String>,
    pub locked: bool,
}

#[cw_serde]
pub struct RevealEntry {
    pub position: u32,
    pub result: DrawResult,
}

#[cw_serde]
pub struct HistoryResponse {
    pub reveals: Vec<RevealEntry>,
}

#[cw_serde]
pub struct ApplicantsResponse {
    pub applicants: Vec<Applicant>,
    pub total: u32,
}

/// Export row: Flat Number / Owner Name / Slots Allotted / Parking Slots.
#[cw_serde]
pub struct ResultRow {
    pub flat_number: String,
    pub owner_name: String,
    pub slots_granted: u32,
    pub slot_numbers: String,
}

impl From<&DrawResult> for ResultRow {
    fn from(result: &DrawResult) -> Self {
        Self {
            flat_number: result.flat_number.clone(),
            owner_name: result.display_name.clone(),
            slots_granted: result.slots_granted(),
            slot_numbers: result.slot_numbers(),
        }
    }
}

#[cw_serde]
pub struct ResultsResponse {
    pub rows: Vec<ResultRow>,
}

#[cw_serde]
pub struct SummaryResponse {
    pub total_applicants: u32,
    pub two_slot_applicants: u32,
    pub total_slots: u32,
    pub total_pairs: u32,
    pub locked: bool,
    pub allotted: u32,
    pub not_allotted: u32,
    pub slots_used: u32,
}

#[cw_serde]
pub struct InventoryResponse {
    pub blocks: Vec<SlotBlock>,
    pub total_slots: u32,
    pub total_pairs: u32,
}
