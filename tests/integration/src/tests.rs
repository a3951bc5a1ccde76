//! Integration tests for the parking lottery.
//!
//! These tests drive the contract through its `instantiate` / `execute` /
//! `query` entry points using `cosmwasm_std::testing` mocks, the same way
//! a deployment would: register the member list, start with a seed, reveal
//! in batches, then read back the locked results.
//!
//! Run:
//! ```bash
//! cargo test -p parking-lottery-integration-tests
//! ```

use std::collections::HashSet;

use cosmwasm_std::testing::{message_info, mock_dependencies, mock_env, MockApi, MockQuerier};
use cosmwasm_std::{from_json, Binary, MemoryStorage, OwnedDeps, Response};
use parking_lottery::msg::{
    ApplicantInput, DrawStateResponse, ExecuteMsg, HistoryResponse, InstantiateMsg, QueryMsg,
    ResultsResponse, SummaryResponse,
};
use parking_lottery::ContractError;
use parking_lottery_common::{
    AllotmentStatus, DegradePolicy, DrawError, DrawResult, DrawStatus, SlotBlock, SlotInventory,
};

type Deps = OwnedDeps<MemoryStorage, MockApi, MockQuerier>;

const SEED_HEX: &str = "7061726b696e672d64726177";

// ─── Helpers ───

fn instantiate_msg(
    blocks: Option<Vec<SlotBlock>>,
    degrade_policy: Option<DegradePolicy>,
) -> InstantiateMsg {
    let mock_api = MockApi::default();
    InstantiateMsg {
        operator: mock_api.addr_make("operator").to_string(),
        blocks,
        degrade_policy,
        reveal_interval_ms: None,
    }
}

fn setup(deps: &mut Deps, msg: InstantiateMsg) {
    let admin = deps.api.addr_make("admin");
    let info = message_info(&admin, &[]);
    parking_lottery::contract::instantiate(deps.as_mut(), mock_env(), info, msg).unwrap();
}

fn operator_exec(deps: &mut Deps, msg: ExecuteMsg) -> Result<Response, ContractError> {
    let operator = deps.api.addr_make("operator");
    let info = message_info(&operator, &[]);
    parking_lottery::contract::execute(deps.as_mut(), mock_env(), info, msg)
}

fn query(deps: &Deps, msg: QueryMsg) -> Binary {
    parking_lottery::contract::query(deps.as_ref(), mock_env(), msg).unwrap()
}

fn applicant(flat: &str, name: &str, requested_slots: u8) -> ApplicantInput {
    ApplicantInput {
        flat_number: flat.to_string(),
        display_name: name.to_string(),
        requested_slots,
    }
}

/// 199 members; every 33rd asks for two adjacent slots (six in total).
fn reference_member_list() -> Vec<ApplicantInput> {
    (1..=199u32)
        .map(|i| {
            let requested = if i % 33 == 0 { 2 } else { 1 };
            applicant(&format!("F-{:03}", i), &format!("Member {}", i), requested)
        })
        .collect()
}

fn draw_state(deps: &Deps) -> DrawStateResponse {
    from_json(query(deps, QueryMsg::DrawState {})).unwrap()
}

fn all_results(deps: &Deps) -> Vec<DrawResult> {
    let mut results = Vec::new();
    let mut start_after = None;
    loop {
        let page: HistoryResponse = from_json(query(
            deps,
            QueryMsg::History {
                start_after,
                limit: Some(100),
            },
        ))
        .unwrap();
        if page.reveals.is_empty() {
            break;
        }
        start_after = page.reveals.last().map(|r| r.position);
        results.extend(page.reveals.into_iter().map(|r| r.result));
    }
    results
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reference_deployment_full_draw() {
    let mut deps = mock_dependencies();
    setup(&mut deps, instantiate_msg(None, None));

    // 1. Register the member list in office batches
    for batch in reference_member_list().chunks(50) {
        operator_exec(
            &mut deps,
            ExecuteMsg::RegisterApplicants {
                applicants: batch.to_vec(),
            },
        )
        .unwrap();
    }

    let summary: SummaryResponse = from_json(query(&deps, QueryMsg::Summary {})).unwrap();
    assert_eq!(summary.total_applicants, 199);
    assert_eq!(summary.two_slot_applicants, 6);
    assert_eq!(summary.total_slots, 205);
    assert_eq!(summary.total_pairs, 102);
    assert!(!summary.locked);

    // 2. Start
    operator_exec(
        &mut deps,
        ExecuteMsg::StartDraw {
            seed_hex: SEED_HEX.to_string(),
        },
    )
    .unwrap();
    let view = draw_state(&deps);
    assert_eq!(view.status, DrawStatus::Running);
    assert_eq!(view.pairs_planned, 6);
    assert_eq!(view.singles_remaining, 205 - 12);
    assert_eq!(view.next_flat, Some("F-001".to_string()));

    // 3. Reveal in batches, pausing once mid-way
    operator_exec(&mut deps, ExecuteMsg::Advance { steps: Some(50) }).unwrap();
    operator_exec(&mut deps, ExecuteMsg::Advance { steps: Some(30) }).unwrap();
    operator_exec(&mut deps, ExecuteMsg::PauseDraw {}).unwrap();

    let paused = draw_state(&deps);
    assert_eq!(paused.status, DrawStatus::Paused);
    assert_eq!(paused.position, 80);
    let is_locked: bool = from_json(query(&deps, QueryMsg::IsLocked {})).unwrap();
    assert!(!is_locked);

    let err = operator_exec(&mut deps, ExecuteMsg::Advance { steps: Some(1) }).unwrap_err();
    assert!(matches!(err, ContractError::Draw(DrawError::InvalidTransition { .. })));

    operator_exec(&mut deps, ExecuteMsg::ResumeDraw {}).unwrap();
    while draw_state(&deps).status != DrawStatus::Completed {
        operator_exec(&mut deps, ExecuteMsg::Advance { steps: Some(50) }).unwrap();
    }

    // 4. Invariants over the revealed history
    let history = all_results(&deps);
    assert_eq!(history.len(), 199);

    let inventory = SlotInventory::reference().unwrap();
    let mut used = HashSet::new();
    for result in &history {
        assert_eq!(result.status, AllotmentStatus::Allotted);
        assert_eq!(result.slots_granted(), u32::from(result.requested_slots));
        for label in &result.granted_slots {
            assert!(inventory.contains(label), "unknown slot {}", label);
            assert!(used.insert(label.clone()), "slot {} granted twice", label);
        }
        if result.requested_slots == 2 {
            let (a, b) = (&result.granted_slots[0], &result.granted_slots[1]);
            assert_eq!(a.block, b.block);
            assert_eq!(a.number % 2, 1);
            assert_eq!(a.number + 1, b.number);
        }
    }
    assert_eq!(used.len(), 205);

    // Reveal order is registration order.
    for (i, result) in history.iter().enumerate() {
        assert_eq!(result.flat_number, format!("F-{:03}", i + 1));
    }

    // 5. Locked results and export
    let summary: SummaryResponse = from_json(query(&deps, QueryMsg::Summary {})).unwrap();
    assert!(summary.locked);
    assert_eq!(summary.allotted, 199);
    assert_eq!(summary.not_allotted, 0);
    assert_eq!(summary.slots_used, 205);

    let mut rows = Vec::new();
    let mut start_after: Option<String> = None;
    loop {
        let page: ResultsResponse = from_json(query(
            &deps,
            QueryMsg::Results {
                start_after: start_after.clone(),
                limit: Some(100),
            },
        ))
        .unwrap();
        if page.rows.is_empty() {
            break;
        }
        start_after = page.rows.last().map(|r| r.flat_number.clone());
        rows.extend(page.rows);
    }
    assert_eq!(rows.len(), 199);
    let pair_row = rows.iter().find(|r| r.flat_number == "F-033").unwrap();
    assert_eq!(pair_row.owner_name, "Member 33");
    assert_eq!(pair_row.slots_granted, 2);
    assert_eq!(pair_row.slot_numbers.split(", ").count(), 2);

    let stored: Option<DrawResult> = from_json(query(
        &deps,
        QueryMsg::FlatResult {
            flat_number: "f-100".to_string(),
        },
    ))
    .unwrap();
    assert_eq!(stored.as_ref(), history.get(99));

    // 6. Nothing can rerun a locked lottery
    let err = operator_exec(
        &mut deps,
        ExecuteMsg::StartDraw {
            seed_hex: SEED_HEX.to_string(),
        },
    )
    .unwrap_err();
    assert!(matches!(err, ContractError::Draw(DrawError::AlreadyLocked)));
}

#[test]
fn test_same_seed_same_draw() {
    let run = || {
        let mut deps = mock_dependencies();
        setup(&mut deps, instantiate_msg(None, None));
        operator_exec(
            &mut deps,
            ExecuteMsg::RegisterApplicants {
                applicants: reference_member_list(),
            },
        )
        .unwrap();
        operator_exec(
            &mut deps,
            ExecuteMsg::StartDraw {
                seed_hex: SEED_HEX.to_string(),
            },
        )
        .unwrap();
        for _ in 0..4 {
            operator_exec(&mut deps, ExecuteMsg::Advance { steps: Some(50) }).unwrap();
        }
        all_results(&deps)
    };

    let first = run();
    assert_eq!(first.len(), 199);
    assert_eq!(first, run());
}

#[test]
fn test_degrade_policies_with_pair_shortage() {
    // A:3 has one pair (A-1, A-2) and one unpaired single (A-3).
    let members = vec![
        applicant("A-101", "Shah Family", 2),
        applicant("A-102", "Patel Family", 2),
        applicant("A-103", "Mehta Family", 1),
    ];

    let run = |policy: DegradePolicy| {
        let mut deps = mock_dependencies();
        setup(
            &mut deps,
            instantiate_msg(Some(vec![SlotBlock::new("A", 3)]), Some(policy)),
        );
        operator_exec(
            &mut deps,
            ExecuteMsg::RegisterApplicants {
                applicants: members.clone(),
            },
        )
        .unwrap();
        operator_exec(
            &mut deps,
            ExecuteMsg::StartDraw {
                seed_hex: SEED_HEX.to_string(),
            },
        )
        .unwrap();
        operator_exec(&mut deps, ExecuteMsg::Advance { steps: Some(3) }).unwrap();
        all_results(&deps)
    };

    let degraded = run(DegradePolicy::DegradeToSingle);
    assert_eq!(degraded[0].slot_numbers(), "A-1, A-2");
    assert_eq!(degraded[1].slot_numbers(), "A-3");
    assert!(degraded[1].is_degraded());
    assert_eq!(degraded[2].status, AllotmentStatus::NotAllotted);

    let strict = run(DegradePolicy::GrantNothing);
    assert_eq!(strict[0].slot_numbers(), "A-1, A-2");
    assert_eq!(strict[1].status, AllotmentStatus::NotAllotted);
    assert!(strict[1].granted_slots.is_empty());
    assert_eq!(strict[2].slot_numbers(), "A-3");
}

#[test]
fn test_draw_state_json_shape() {
    let mut deps = mock_dependencies();
    setup(&mut deps, instantiate_msg(Some(vec![SlotBlock::new("G", 4)]), None));

    let raw = query(&deps, QueryMsg::DrawState {});
    let value: serde_json::Value = serde_json::from_slice(raw.as_slice()).unwrap();
    assert_eq!(value["status"], "not_started");
    assert_eq!(value["position"], 0);
    assert_eq!(value["reveal_interval_ms"], 1600);
    assert_eq!(value["locked"], false);
    assert!(value["latest"].is_null());

    let config: serde_json::Value =
        serde_json::from_slice(query(&deps, QueryMsg::Config {}).as_slice()).unwrap();
    assert_eq!(config["degrade_policy"], "degrade_to_single");
    assert_eq!(config["blocks"][0]["prefix"], "G");
}
