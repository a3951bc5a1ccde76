use cosmwasm_std::{
    entry_point, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::{get_contract_version, set_contract_version};
use parking_lottery_common::{reference_blocks, DrawState, SlotInventory};

use crate::error::ContractError;
use crate::execute;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::query;
use crate::state::{LotteryConfig, APPLICANT_COUNT, CONFIG, DRAW_SESSION};

const CONTRACT_NAME: &str = "crates.io:parking-lottery";
const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[entry_point]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let blocks = msg.blocks.unwrap_or_else(reference_blocks);
    // Malformed blocks are a configuration error; reject before anything is stored.
    let inventory = SlotInventory::build(&blocks)?;

    let reveal_interval_ms = msg
        .reveal_interval_ms
        .unwrap_or(execute::DEFAULT_REVEAL_INTERVAL_MS);
    execute::validate_reveal_interval(reveal_interval_ms)?;

    let config = LotteryConfig {
        admin: info.sender.clone(),
        operator: deps.api.addr_validate(&msg.operator)?,
        blocks,
        degrade_policy: msg.degrade_policy.unwrap_or_default(),
        reveal_interval_ms,
    };
    CONFIG.save(deps.storage, &config)?;
    DRAW_SESSION.save(deps.storage, &DrawState::new())?;
    APPLICANT_COUNT.save(deps.storage, &0u32)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("contract", "parking-lottery")
        .add_attribute("admin", info.sender.to_string())
        .add_attribute("total_slots", inventory.total_slots().to_string())
        .add_attribute("total_pairs", inventory.total_pairs().to_string()))
}

#[entry_point]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::RegisterApplicants { applicants } => {
            execute::register_applicants(deps, env, info, applicants)
        }
        ExecuteMsg::StartDraw { seed_hex } => execute::start_draw(deps, env, info, seed_hex),
        ExecuteMsg::PauseDraw {} => execute::pause_draw(deps, env, info),
        ExecuteMsg::ResumeDraw {} => execute::resume_draw(deps, env, info),
        ExecuteMsg::Advance { steps } => execute::advance(deps, env, info, steps),
        ExecuteMsg::ResetSession {} => execute::reset_session(deps, env, info),
        ExecuteMsg::UpdateConfig {
            operator,
            degrade_policy,
            reveal_interval_ms,
        } => execute::update_config(deps, env, info, operator, degrade_policy, reveal_interval_ms),
    }
}

#[entry_point]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::Config {} => query::query_config(deps),
        QueryMsg::DrawState {} => query::query_draw_state(deps),
        QueryMsg::History { start_after, limit } => query::query_history(deps, start_after, limit),
        QueryMsg::Applicants { start_after, limit } => {
            query::query_applicants(deps, start_after, limit)
        }
        QueryMsg::IsLocked {} => query::query_is_locked(deps),
        QueryMsg::FlatResult { flat_number } => query::query_flat_result(deps, flat_number),
        QueryMsg::Results { start_after, limit } => query::query_results(deps, start_after, limit),
        QueryMsg::Summary {} => query::query_summary(deps),
        QueryMsg::Inventory {} => query::query_inventory(deps),
    }
}

#[entry_point]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let stored = get_contract_version(deps.storage)?;
    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::Unauthorized {
            reason: format!("cannot migrate from {}", stored.contract),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("from_version", stored.version)
        .add_attribute("to_version", CONTRACT_VERSION))
}
