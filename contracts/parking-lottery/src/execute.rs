use cosmwasm_std::{DepsMut, Env, Event, MessageInfo, Response};
use parking_lottery_common::{
    normalize_flat_number, validate_applicants, Applicant, DegradePolicy, DrawError, DrawResult,
    DrawState, DrawStatus, Sha256Shuffler, SlotInventory,
};

use crate::error::ContractError;
use crate::msg::ApplicantInput;
use crate::state::{
    load_applicants, LotteryConfig, APPLICANTS, APPLICANT_COUNT, APPLICANT_ORDER, CONFIG,
    DRAW_SESSION, SESSION_SEED,
};
use crate::store::{is_locked, ContractResultStore};

/// Upper bound on reveals per `Advance` call.
pub const MAX_STEPS_PER_CALL: u32 = 50;

pub const DEFAULT_REVEAL_INTERVAL_MS: u64 = 1600;
pub const MIN_REVEAL_INTERVAL_MS: u64 = 100;
pub const MAX_REVEAL_INTERVAL_MS: u64 = 60_000;

pub fn validate_reveal_interval(interval_ms: u64) -> Result<(), ContractError> {
    if !(MIN_REVEAL_INTERVAL_MS..=MAX_REVEAL_INTERVAL_MS).contains(&interval_ms) {
        return Err(ContractError::InvalidRevealInterval {
            got: interval_ms,
            min: MIN_REVEAL_INTERVAL_MS,
            max: MAX_REVEAL_INTERVAL_MS,
        });
    }
    Ok(())
}

fn ensure_operator(config: &LotteryConfig, info: &MessageInfo, what: &str) -> Result<(), ContractError> {
    if info.sender != config.operator {
        return Err(ContractError::Unauthorized {
            reason: format!("only operator can {}", what),
        });
    }
    Ok(())
}

fn ensure_admin(config: &LotteryConfig, info: &MessageInfo, what: &str) -> Result<(), ContractError> {
    if info.sender != config.admin {
        return Err(ContractError::Unauthorized {
            reason: format!("only admin can {}", what),
        });
    }
    Ok(())
}

/// Append a batch to the applicant register. Operator only.
/// Registration order is reveal order; nothing is reordered later.
pub fn register_applicants(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    applicants: Vec<ApplicantInput>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info, "register applicants")?;

    if is_locked(deps.storage)? {
        return Err(DrawError::AlreadyLocked.into());
    }
    let session = DRAW_SESSION.load(deps.storage)?;
    if session.status != DrawStatus::NotStarted {
        return Err(ContractError::RegistrationClosed);
    }
    if applicants.is_empty() {
        return Err(DrawError::EmptyApplicantList.into());
    }

    let first_order = APPLICANT_COUNT.may_load(deps.storage)?.unwrap_or(0);
    let batch: Vec<Applicant> = applicants
        .into_iter()
        .enumerate()
        .map(|(i, input)| Applicant {
            flat_number: normalize_flat_number(&input.flat_number),
            display_name: input.display_name.trim().to_string(),
            requested_slots: input.requested_slots,
            order: first_order + i as u32,
        })
        .collect();
    validate_applicants(&batch)?;

    for applicant in &batch {
        if APPLICANT_ORDER.has(deps.storage, &applicant.flat_number) {
            return Err(DrawError::DuplicateApplicant {
                flat_number: applicant.flat_number.clone(),
            }
            .into());
        }
        APPLICANTS.save(deps.storage, applicant.order, applicant)?;
        APPLICANT_ORDER.save(deps.storage, &applicant.flat_number, &applicant.order)?;
    }

    let total = first_order + batch.len() as u32;
    APPLICANT_COUNT.save(deps.storage, &total)?;

    let two_slot = batch.iter().filter(|a| a.wants_pair()).count();

    Ok(Response::new()
        .add_attribute("action", "register_applicants")
        .add_attribute("registered", batch.len().to_string())
        .add_event(
            Event::new("parking_applicants_registered")
                .add_attribute("registered", batch.len().to_string())
                .add_attribute("two_slot", two_slot.to_string())
                .add_attribute("total_applicants", total.to_string()),
        ))
}

/// Plan the pools and begin the live draw. Operator only.
pub fn start_draw(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    seed_hex: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info, "start the draw")?;

    let seed = hex::decode(&seed_hex).map_err(|_| ContractError::InvalidHex {
        field: "seed_hex".to_string(),
    })?;
    if seed.is_empty() {
        return Err(ContractError::InvalidHex {
            field: "seed_hex".to_string(),
        });
    }
    let mut shuffler = Sha256Shuffler::from_material(&seed);
    let seed_hash = shuffler.seed_hex();

    let inventory = SlotInventory::build(&config.blocks)?;
    let applicants = load_applicants(deps.storage)?;
    let mut state = DRAW_SESSION.load(deps.storage)?;
    {
        let store = ContractResultStore::new(&mut *deps.storage, env.block.time);
        state.start(&applicants, &inventory, &mut shuffler, &store)?;
    }

    DRAW_SESSION.save(deps.storage, &state)?;
    SESSION_SEED.save(deps.storage, &seed_hash)?;

    let two_slot = applicants.iter().filter(|a| a.wants_pair()).count();

    Ok(Response::new()
        .add_attribute("action", "start_draw")
        .add_attribute("applicants", applicants.len().to_string())
        .add_event(
            Event::new("parking_draw_started")
                .add_attribute("applicants", applicants.len().to_string())
                .add_attribute("two_slot_applicants", two_slot.to_string())
                .add_attribute("pairs_planned", state.pools.pair_pool.len().to_string())
                .add_attribute("singles_available", state.pools.single_pool.len().to_string())
                .add_attribute("seed_hash", seed_hash)
                .add_attribute("reveal_interval_ms", config.reveal_interval_ms.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        ))
}

/// Suspend reveals. Operator only. No slot is consumed while paused.
pub fn pause_draw(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info, "pause the draw")?;

    let mut state = DRAW_SESSION.load(deps.storage)?;
    state.pause()?;
    DRAW_SESSION.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "pause_draw")
        .add_event(
            Event::new("parking_draw_paused").add_attribute("position", state.position.to_string()),
        ))
}

/// Continue from the next unrevealed applicant. Operator only.
pub fn resume_draw(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info, "resume the draw")?;

    let mut state = DRAW_SESSION.load(deps.storage)?;
    state.resume()?;
    DRAW_SESSION.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "resume_draw")
        .add_event(
            Event::new("parking_draw_resumed").add_attribute("position", state.position.to_string()),
        ))
}

fn reveal_event(position: u32, result: &DrawResult) -> Event {
    Event::new("parking_slot_revealed")
        .add_attribute("position", position.to_string())
        .add_attribute("flat_number", result.flat_number.clone())
        .add_attribute("display_name", result.display_name.clone())
        .add_attribute("requested_slots", result.requested_slots.to_string())
        .add_attribute("slots_granted", result.slots_granted().to_string())
        .add_attribute("slot_numbers", result.slot_numbers())
        .add_attribute("status", result.status.as_str())
        .add_attribute("degraded", result.is_degraded().to_string())
}

/// Reveal up to `steps` applicants. Operator only.
///
/// The step that reveals the last applicant also persists the whole history
/// and locks the lottery. If that write fails the entire call reverts, and a
/// retry recomputes the same final reveal from the unchanged pools.
pub fn advance(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    steps: Option<u32>,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_operator(&config, &info, "advance the draw")?;

    let steps = steps.unwrap_or(1);
    if steps == 0 || steps > MAX_STEPS_PER_CALL {
        return Err(ContractError::InvalidStepCount {
            steps,
            max: MAX_STEPS_PER_CALL,
        });
    }

    let applicants = load_applicants(deps.storage)?;
    let mut state = DRAW_SESSION.load(deps.storage)?;

    let mut events = Vec::new();
    let mut completed = false;
    for _ in 0..steps {
        let position = state.position;
        let outcome = state.advance(&applicants, config.degrade_policy)?;
        events.push(reveal_event(position, outcome.result()));
        if outcome.is_completed() {
            completed = true;
            break;
        }
    }

    if completed {
        let mut store = ContractResultStore::new(&mut *deps.storage, env.block.time);
        state.commit(&mut store)?;

        let allotted = state.history.iter().filter(|r| r.is_allotted()).count();
        let slots_used: u32 = state.history.iter().map(DrawResult::slots_granted).sum();
        events.push(
            Event::new("parking_draw_completed")
                .add_attribute("total_applicants", state.total_applicants.to_string())
                .add_attribute("allotted", allotted.to_string())
                .add_attribute("not_allotted", (state.history.len() - allotted).to_string())
                .add_attribute("slots_used", slots_used.to_string())
                .add_attribute("timestamp", env.block.time.seconds().to_string()),
        );
    }

    DRAW_SESSION.save(deps.storage, &state)?;

    Ok(Response::new()
        .add_attribute("action", "advance")
        .add_attribute("revealed", events.len().to_string())
        .add_attribute("position", state.position.to_string())
        .add_attribute("status", state.status.as_str())
        .add_events(events))
}

/// Throw away an unfinished session; the next start replans the pools.
/// Admin only, and never once results exist.
pub fn reset_session(deps: DepsMut, _env: Env, info: MessageInfo) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "reset the draw session")?;

    if is_locked(deps.storage)? {
        return Err(DrawError::AlreadyLocked.into());
    }
    let state = DRAW_SESSION.load(deps.storage)?;
    if state.status == DrawStatus::NotStarted {
        return Err(DrawError::InvalidTransition {
            action: "reset".to_string(),
            status: state.status,
        }
        .into());
    }

    DRAW_SESSION.save(deps.storage, &DrawState::new())?;
    SESSION_SEED.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("action", "reset_session")
        .add_event(
            Event::new("parking_session_reset")
                .add_attribute("discarded_status", state.status.as_str())
                .add_attribute("discarded_reveals", state.history.len().to_string()),
        ))
}

/// Update configuration. Admin only.
pub fn update_config(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    operator: Option<String>,
    degrade_policy: Option<DegradePolicy>,
    reveal_interval_ms: Option<u64>,
) -> Result<Response, ContractError> {
    let mut config = CONFIG.load(deps.storage)?;
    ensure_admin(&config, &info, "update config")?;

    if let Some(op) = operator {
        config.operator = deps.api.addr_validate(&op)?;
    }
    if let Some(policy) = degrade_policy {
        let state = DRAW_SESSION.load(deps.storage)?;
        if state.status.is_in_progress() {
            return Err(ContractError::DrawInProgress);
        }
        if is_locked(deps.storage)? {
            return Err(DrawError::AlreadyLocked.into());
        }
        config.degrade_policy = policy;
    }
    if let Some(interval) = reveal_interval_ms {
        validate_reveal_interval(interval)?;
        config.reveal_interval_ms = interval;
    }

    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "update_config")
        .add_event(
            Event::new("parking_config_updated")
                .add_attribute("operator", config.operator.to_string())
                .add_attribute("reveal_interval_ms", config.reveal_interval_ms.to_string()),
        ))
}
