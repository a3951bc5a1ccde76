use cosmwasm_std::{to_json_binary, Binary, Deps, Order, StdError, StdResult};
use cw_storage_plus::Bound;
use parking_lottery_common::{normalize_flat_number, SlotBlock, SlotInventory};

use crate::msg::{
    ApplicantsResponse, DrawStateResponse, HistoryResponse, InventoryResponse, ResultRow,
    ResultsResponse, RevealEntry, SummaryResponse,
};
use crate::state::{
    load_applicants, APPLICANTS, APPLICANT_COUNT, CONFIG, DRAW_LOCK, DRAW_SESSION, RESULTS,
    SESSION_SEED,
};
use crate::store::{is_locked, lookup_result};

const DEFAULT_LIMIT: u32 = 30;
const MAX_LIMIT: u32 = 100;

fn page_size(limit: Option<u32>) -> usize {
    limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT) as usize
}

pub fn query_config(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    to_json_binary(&config)
}

pub fn query_draw_state(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let state = DRAW_SESSION.load(deps.storage)?;

    let next_flat = if state.status.is_in_progress() {
        APPLICANTS
            .may_load(deps.storage, state.position)?
            .map(|a| a.flat_number)
    } else {
        None
    };

    to_json_binary(&DrawStateResponse {
        status: state.status,
        position: state.position,
        total_applicants: state.total_applicants,
        pairs_planned: state.pools.pair_pool.len() as u32,
        pairs_remaining: state.pairs_remaining(),
        singles_remaining: state.singles_remaining(),
        latest: state.last_result().cloned(),
        next_flat,
        reveal_interval_ms: config.reveal_interval_ms,
        seed_hash: SESSION_SEED.may_load(deps.storage)?,
        locked: is_locked(deps.storage)?,
    })
}

pub fn query_history(deps: Deps, start_after: Option<u32>, limit: Option<u32>) -> StdResult<Binary> {
    let state = DRAW_SESSION.load(deps.storage)?;
    let start = start_after
        .map(|p| (p as usize).saturating_add(1))
        .unwrap_or(0);

    let reveals = state
        .history
        .into_iter()
        .enumerate()
        .skip(start)
        .take(page_size(limit))
        .map(|(position, result)| RevealEntry {
            position: position as u32,
            result,
        })
        .collect();

    to_json_binary(&HistoryResponse { reveals })
}

pub fn query_applicants(
    deps: Deps,
    start_after: Option<u32>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let start = start_after.map(Bound::exclusive);

    let applicants = APPLICANTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| item.map(|(_, applicant)| applicant))
        .collect::<StdResult<Vec<_>>>()?;
    let total = APPLICANT_COUNT.may_load(deps.storage)?.unwrap_or(0);

    to_json_binary(&ApplicantsResponse { applicants, total })
}

pub fn query_is_locked(deps: Deps) -> StdResult<Binary> {
    to_json_binary(&is_locked(deps.storage)?)
}

pub fn query_flat_result(deps: Deps, flat_number: String) -> StdResult<Binary> {
    let result = lookup_result(deps.storage, &normalize_flat_number(&flat_number))?;
    to_json_binary(&result)
}

pub fn query_results(
    deps: Deps,
    start_after: Option<String>,
    limit: Option<u32>,
) -> StdResult<Binary> {
    let start = start_after.as_deref().map(Bound::exclusive);

    let rows = RESULTS
        .range(deps.storage, start, None, Order::Ascending)
        .take(page_size(limit))
        .map(|item| item.map(|(_, result)| ResultRow::from(&result)))
        .collect::<StdResult<Vec<_>>>()?;

    to_json_binary(&ResultsResponse { rows })
}

pub fn query_summary(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let applicants = load_applicants(deps.storage)?;
    let (total_slots, total_pairs) = inventory_totals(&config.blocks)?;
    let lock = DRAW_LOCK.may_load(deps.storage)?;

    let (allotted, not_allotted, slots_used) = match &lock {
        Some(lock) => (lock.allotted, lock.total_results - lock.allotted, lock.slots_used),
        None => (0, 0, 0),
    };

    to_json_binary(&SummaryResponse {
        total_applicants: applicants.len() as u32,
        two_slot_applicants: applicants.iter().filter(|a| a.wants_pair()).count() as u32,
        total_slots,
        total_pairs,
        locked: lock.is_some() || is_locked(deps.storage)?,
        allotted,
        not_allotted,
        slots_used,
    })
}

pub fn query_inventory(deps: Deps) -> StdResult<Binary> {
    let config = CONFIG.load(deps.storage)?;
    let (total_slots, total_pairs) = inventory_totals(&config.blocks)?;
    to_json_binary(&InventoryResponse {
        blocks: config.blocks,
        total_slots,
        total_pairs,
    })
}

fn inventory_totals(blocks: &[SlotBlock]) -> StdResult<(u32, u32)> {
    let inventory =
        SlotInventory::build(blocks).map_err(|err| StdError::generic_err(err.to_string()))?;
    Ok((inventory.total_slots() as u32, inventory.total_pairs() as u32))
}
