use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdResult, Storage, Timestamp};
use cw_storage_plus::{Item, Map};
use parking_lottery_common::{Applicant, DegradePolicy, DrawResult, DrawState, SlotBlock};

pub const CONFIG: Item<LotteryConfig> = Item::new("config");
/// The one live session. Reset only via `ResetSession` before results exist.
pub const DRAW_SESSION: Item<DrawState> = Item::new("draw_session");
/// sha256 of the operator seed used to plan the current session's pools.
pub const SESSION_SEED: Item<String> = Item::new("session_seed");

/// Registration order -> applicant
pub const APPLICANTS: Map<u32, Applicant> = Map::new("applicants");
/// Normalized flat number -> registration order
pub const APPLICANT_ORDER: Map<&str, u32> = Map::new("applicant_order");
pub const APPLICANT_COUNT: Item<u32> = Item::new("applicant_count");

/// Write-once result table, keyed by normalized flat number.
pub const RESULTS: Map<&str, DrawResult> = Map::new("results");
/// Explicit lock row, written in the same transaction as `RESULTS`.
pub const DRAW_LOCK: Item<DrawLock> = Item::new("draw_lock");

#[cw_serde]
pub struct LotteryConfig {
    pub admin: Addr,
    pub operator: Addr,
    pub blocks: Vec<SlotBlock>,
    pub degrade_policy: DegradePolicy,
    /// Reveal cadence for the live screen. The contract itself never waits.
    pub reveal_interval_ms: u64,
}

#[cw_serde]
pub struct DrawLock {
    pub completed_at: Timestamp,
    pub total_results: u32,
    pub allotted: u32,
    pub slots_used: u32,
}

/// The full register in reveal order.
pub fn load_applicants(storage: &dyn Storage) -> StdResult<Vec<Applicant>> {
    APPLICANTS
        .range(storage, None, None, Order::Ascending)
        .map(|item| item.map(|(_, applicant)| applicant))
        .collect()
}
