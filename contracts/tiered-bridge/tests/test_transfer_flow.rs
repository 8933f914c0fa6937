//! Transfer Flow Integration Tests (mint mode).
//!
//! Tests the request → ratify → finalize lifecycle against a real CW20 token:
//! - Ratified tier auto-finalizes on the single required approval
//! - Multi-sig tier needs three distinct ratifiers
//! - Exactly-once finalization, revocation and invalidation
//! - Field mismatches, per-operation pause and the admin override
//! - Fee split between recipient and treasury

use cosmwasm_std::{Addr, Empty, Uint128};
use cw20::{BalanceResponse, Cw20ExecuteMsg, Cw20QueryMsg, MinterResponse};
use cw_multi_test::{App, AppResponse, Contract, ContractWrapper, Executor};

use common::ReferenceFormat;
use tiered_bridge::ledger::SlotStatus;
use tiered_bridge::msg::{
    CanFinalizeResponse, ExecuteMsg, InstantiateMsg, OperationResponse, PendingOperationsResponse,
    PoolsResponse, QueryMsg,
};
use tiered_bridge::state::{GatewayMode, Stats};
use tiered_bridge::TierValues;

// ============================================================================
// Test Setup
// ============================================================================

fn contract_bridge() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        tiered_bridge::contract::execute,
        tiered_bridge::contract::instantiate,
        tiered_bridge::contract::query,
    ))
}

fn contract_cw20() -> Box<dyn Contract<Empty>> {
    Box::new(ContractWrapper::new(
        cw20_base::contract::execute,
        cw20_base::contract::instantiate,
        cw20_base::contract::query,
    ))
}

struct TestEnv {
    app: App,
    bridge: Addr,
    token: Addr,
    admin: Addr,
    operator: Addr,
    ratifiers: [Addr; 3],
    user: Addr,
}

fn setup() -> TestEnv {
    let mut app = App::default();
    let admin = Addr::unchecked("terra1admin");
    let operator = Addr::unchecked("terra1operator");
    let ratifiers = [
        Addr::unchecked("terra1ratifier1"),
        Addr::unchecked("terra1ratifier2"),
        Addr::unchecked("terra1ratifier3"),
    ];
    let user = Addr::unchecked("terra1user");

    let cw20_code_id = app.store_code(contract_cw20());
    let token = app
        .instantiate_contract(
            cw20_code_id,
            admin.clone(),
            &cw20_base::msg::InstantiateMsg {
                name: "Bridged Dollar".to_string(),
                symbol: "BUSD".to_string(),
                decimals: 6,
                initial_balances: vec![],
                mint: Some(MinterResponse {
                    minter: admin.to_string(),
                    cap: None,
                }),
                marketing: None,
            },
            &[],
            "stablecoin",
            None,
        )
        .unwrap();

    let bridge_code_id = app.store_code(contract_bridge());
    let bridge = app
        .instantiate_contract(
            bridge_code_id,
            admin.clone(),
            &InstantiateMsg {
                admin: admin.to_string(),
                operators: vec![operator.to_string()],
                ratifiers: ratifiers.iter().map(|r| r.to_string()).collect(),
                gateway: token.to_string(),
                mode: GatewayMode::Mint,
                reference_format: ReferenceFormat::HexPrefixed,
                thresholds: TierValues::new(1_000, 10_000, 1_000_000),
                limits: TierValues::new(10_000, 100_000, 10_000_000),
                fee_rate: 0,
                treasury: None,
            },
            &[],
            "tiered-bridge",
            Some(admin.to_string()),
        )
        .unwrap();

    // The controller becomes the token's minter
    app.execute_contract(
        admin.clone(),
        token.clone(),
        &Cw20ExecuteMsg::UpdateMinter {
            new_minter: Some(bridge.to_string()),
        },
        &[],
    )
    .unwrap();

    TestEnv {
        app,
        bridge,
        token,
        admin,
        operator,
        ratifiers,
        user,
    }
}

fn reference(n: u8) -> String {
    format!("0x{}", hex_byte(n).repeat(32))
}

fn hex_byte(n: u8) -> String {
    format!("{:02x}", n)
}

fn request(env: &mut TestEnv, amount: u128, reference: &str) -> u64 {
    let res = env
        .app
        .execute_contract(
            env.operator.clone(),
            env.bridge.clone(),
            &ExecuteMsg::Request {
                recipient: env.user.to_string(),
                amount: Uint128::new(amount),
                reference: reference.to_string(),
            },
            &[],
        )
        .unwrap();
    attr(&res, "index").parse().unwrap()
}

fn ratify(
    env: &mut TestEnv,
    ratifier: usize,
    index: u64,
    amount: u128,
    reference: &str,
) -> Result<AppResponse, String> {
    let sender = env.ratifiers[ratifier].clone();
    let msg = ExecuteMsg::Ratify {
        index,
        recipient: env.user.to_string(),
        amount: Uint128::new(amount),
        reference: reference.to_string(),
    };
    env.app
        .execute_contract(sender, env.bridge.clone(), &msg, &[])
        .map_err(|e| e.root_cause().to_string())
}

fn attr(res: &AppResponse, key: &str) -> String {
    res.events
        .iter()
        .flat_map(|e| &e.attributes)
        .find(|a| a.key == key)
        .map(|a| a.value.clone())
        .unwrap_or_else(|| panic!("{} attribute not found", key))
}

fn count_events(res: &AppResponse, ty: &str) -> usize {
    res.events.iter().filter(|e| e.ty == ty).count()
}

fn balance(env: &TestEnv, address: &Addr) -> Uint128 {
    let res: BalanceResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.token,
            &Cw20QueryMsg::Balance {
                address: address.to_string(),
            },
        )
        .unwrap();
    res.balance
}

fn operation(env: &TestEnv, index: u64) -> OperationResponse {
    env.app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::Operation { index })
        .unwrap()
}

fn pools(env: &TestEnv) -> PoolsResponse {
    env.app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::Pools {})
        .unwrap()
}

fn next_block(env: &mut TestEnv) {
    env.app.update_block(|block| {
        block.height += 1;
        block.time = block.time.plus_seconds(5);
    });
}

// ============================================================================
// Ratified Tier
// ============================================================================

#[test]
fn test_single_ratification_finalizes_exactly_once() {
    let mut env = setup();
    let reference = reference(0xab);
    let index = request(&mut env, 5_000, &reference);
    assert_eq!(index, 0);

    let res = ratify(&mut env, 0, index, 5_000, &reference).unwrap();
    assert_eq!(count_events(&res, "wasm-ratified"), 1);
    assert_eq!(count_events(&res, "wasm-finalized"), 1);
    assert_eq!(attr(&res, "net_amount"), "5000");

    assert_eq!(balance(&env, &env.user.clone()), Uint128::new(5_000));
    let op = operation(&env, index);
    assert_eq!(op.status, SlotStatus::Finalized);
    assert!(op.operation.is_none());

    // Ratified pool debited once
    assert_eq!(pools(&env).ratified.available, Uint128::new(95_000));

    // A second ratifier sees a closed slot
    let err = ratify(&mut env, 1, index, 5_000, &reference).unwrap_err();
    assert!(err.contains("no longer pending"));

    // So does an explicit finalize
    let err = env
        .app
        .execute_contract(
            env.user.clone(),
            env.bridge.clone(),
            &ExecuteMsg::Finalize { index },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("no longer pending"));
    assert_eq!(balance(&env, &env.user.clone()), Uint128::new(5_000));
}

#[test]
fn test_ratify_field_mismatch() {
    let mut env = setup();
    let reference = reference(0x01);
    let index = request(&mut env, 5_000, &reference);

    let other = Addr::unchecked("terra1other");
    let err = env
        .app
        .execute_contract(
            env.ratifiers[0].clone(),
            env.bridge.clone(),
            &ExecuteMsg::Ratify {
                index,
                recipient: other.to_string(),
                amount: Uint128::new(5_000),
                reference: reference.clone(),
            },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("recipient differs"));

    let err = ratify(&mut env, 0, index, 5_001, &reference).unwrap_err();
    assert!(err.contains("amount differs"));

    let err = ratify(&mut env, 0, index, 5_000, &self::reference(0x02)).unwrap_err();
    assert!(err.contains("reference differs"));

    // Nothing was recorded
    let op = operation(&env, index).operation.unwrap();
    assert!(op.approvers.is_empty());
}

#[test]
fn test_request_validation() {
    let mut env = setup();

    let cases = [
        ("", 1_000u128, reference(0x01), "Invalid recipient"),
        ("terra1user", 0, reference(0x01), "greater than zero"),
        ("terra1user", 1_000, "0x1234".to_string(), "Malformed reference"),
        ("terra1user", 1_000, "ab".repeat(33), "Malformed reference"),
    ];
    for (recipient, amount, reference, expected) in cases {
        let err = env
            .app
            .execute_contract(
                env.operator.clone(),
                env.bridge.clone(),
                &ExecuteMsg::Request {
                    recipient: recipient.to_string(),
                    amount: Uint128::new(amount),
                    reference,
                },
                &[],
            )
            .unwrap_err();
        assert!(
            err.root_cause().to_string().contains(expected),
            "expected '{}', got '{}'",
            expected,
            err.root_cause()
        );
    }

    // Only operators request
    let err = env
        .app
        .execute_contract(
            env.ratifiers[0].clone(),
            env.bridge.clone(),
            &ExecuteMsg::Request {
                recipient: env.user.to_string(),
                amount: Uint128::new(1_000),
                reference: reference(0x01),
            },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Unauthorized"));
}

// ============================================================================
// Multi-Sig Tier
// ============================================================================

#[test]
fn test_multi_sig_requires_three_distinct_ratifiers() {
    let mut env = setup();
    let reference = reference(0x0c);
    let index = request(&mut env, 50_000, &reference);

    let res = ratify(&mut env, 0, index, 50_000, &reference).unwrap();
    assert_eq!(count_events(&res, "wasm-finalized"), 0);

    let err = ratify(&mut env, 0, index, 50_000, &reference).unwrap_err();
    assert!(err.contains("Already approved"));

    let res = ratify(&mut env, 1, index, 50_000, &reference).unwrap();
    assert_eq!(count_events(&res, "wasm-finalized"), 0);
    assert_eq!(attr(&res, "approvals"), "2");

    let res = ratify(&mut env, 2, index, 50_000, &reference).unwrap();
    assert_eq!(count_events(&res, "wasm-finalized"), 1);

    assert_eq!(balance(&env, &env.user.clone()), Uint128::new(50_000));
    let pools = pools(&env);
    assert_eq!(pools.ratified.available, Uint128::new(100_000));
    assert_eq!(pools.multi_sig.available, Uint128::new(9_950_000));
}

#[test]
fn test_drained_ratified_pool_moves_operation_to_multi_sig() {
    let mut env = setup();
    let admin = env.admin.clone();

    // Shrink the ratified pool to two 5,000 operations
    env.app
        .execute_contract(
            admin,
            env.bridge.clone(),
            &ExecuteMsg::SetLimits {
                instant: Uint128::new(5_000),
                ratified: Uint128::new(10_000),
                multi_sig: Uint128::new(10_000_000),
            },
            &[],
        )
        .unwrap();
    assert_eq!(pools(&env).ratified.available, Uint128::new(10_000));

    for n in 0..2u8 {
        let reference = reference(n);
        let index = request(&mut env, 5_000, &reference);
        ratify(&mut env, 0, index, 5_000, &reference).unwrap();
    }
    assert_eq!(pools(&env).ratified.available, Uint128::zero());

    let reference = reference(0x10);
    let index = request(&mut env, 5_000, &reference);
    let res = ratify(&mut env, 0, index, 5_000, &reference).unwrap();
    assert_eq!(count_events(&res, "wasm-finalized"), 0);

    let can: CanFinalizeResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.bridge,
            &QueryMsg::CanFinalize {
                index,
                caller: None,
            },
        )
        .unwrap();
    assert!(!can.can_finalize);
    assert!(can.reason.unwrap().contains("enough approvals"));

    ratify(&mut env, 1, index, 5_000, &reference).unwrap();
    let res = ratify(&mut env, 2, index, 5_000, &reference).unwrap();
    assert_eq!(count_events(&res, "wasm-finalized"), 1);
    assert_eq!(attr(&res, "tier"), "multi_sig");
    assert_eq!(pools(&env).multi_sig.available, Uint128::new(9_995_000));
}

// ============================================================================
// Finalize, Pause and Admin Override
// ============================================================================

#[test]
fn test_paused_operation_records_approval_then_anyone_finalizes() {
    let mut env = setup();
    let reference = reference(0x22);
    let index = request(&mut env, 5_000, &reference);

    env.app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::PauseOperation { index },
            &[],
        )
        .unwrap();

    let res = ratify(&mut env, 0, index, 5_000, &reference).unwrap();
    assert_eq!(count_events(&res, "wasm-finalized"), 0);

    let err = env
        .app
        .execute_contract(
            env.user.clone(),
            env.bridge.clone(),
            &ExecuteMsg::Finalize { index },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("is paused"));

    env.app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::UnpauseOperation { index },
            &[],
        )
        .unwrap();

    let stranger = Addr::unchecked("terra1stranger");
    let res = env
        .app
        .execute_contract(stranger, env.bridge.clone(), &ExecuteMsg::Finalize { index }, &[])
        .unwrap();
    assert_eq!(count_events(&res, "wasm-finalized"), 1);
    assert_eq!(balance(&env, &env.user.clone()), Uint128::new(5_000));
}

#[test]
fn test_finalize_without_approvals_fails() {
    let mut env = setup();
    let reference = reference(0x33);
    let index = request(&mut env, 5_000, &reference);

    let err = env
        .app
        .execute_contract(
            env.user.clone(),
            env.bridge.clone(),
            &ExecuteMsg::Finalize { index },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("enough approvals"));
    assert_eq!(operation(&env, index).status, SlotStatus::Pending);
}

#[test]
fn test_admin_finalize_bypasses_approvals_and_pools() {
    let mut env = setup();
    let reference = reference(0x44);
    let index = request(&mut env, 50_000, &reference);

    let res = env
        .app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::Finalize { index },
            &[],
        )
        .unwrap();
    assert_eq!(attr(&res, "tier"), "admin");
    assert_eq!(balance(&env, &env.user.clone()), Uint128::new(50_000));

    let pools = pools(&env);
    assert_eq!(pools.ratified.available, Uint128::new(100_000));
    assert_eq!(pools.multi_sig.available, Uint128::new(10_000_000));
}

#[test]
fn test_admin_ratification_finalizes_without_pool_debit() {
    let mut env = setup();
    let reference = reference(0x46);
    let index = request(&mut env, 50_000, &reference);

    let res = env
        .app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::Ratify {
                index,
                recipient: env.user.to_string(),
                amount: Uint128::new(50_000),
                reference: reference.clone(),
            },
            &[],
        )
        .unwrap();
    assert_eq!(count_events(&res, "wasm-ratified"), 1);
    assert_eq!(count_events(&res, "wasm-finalized"), 1);
    assert_eq!(attr(&res, "tier"), "admin");
    assert_eq!(operation(&env, index).status, SlotStatus::Finalized);
    assert_eq!(balance(&env, &env.user.clone()), Uint128::new(50_000));

    let pools = pools(&env);
    assert_eq!(pools.ratified.available, Uint128::new(100_000));
    assert_eq!(pools.multi_sig.available, Uint128::new(10_000_000));
}

// ============================================================================
// Revoke & Invalidation
// ============================================================================

#[test]
fn test_revoke_closes_operation() {
    let mut env = setup();
    let reference = reference(0x55);
    let index = request(&mut env, 50_000, &reference);
    ratify(&mut env, 0, index, 50_000, &reference).unwrap();

    let res = env
        .app
        .execute_contract(
            env.operator.clone(),
            env.bridge.clone(),
            &ExecuteMsg::Revoke { index },
            &[],
        )
        .unwrap();
    assert_eq!(count_events(&res, "wasm-revoked"), 1);
    assert_eq!(operation(&env, index).status, SlotStatus::Revoked);

    let err = ratify(&mut env, 1, index, 50_000, &reference).unwrap_err();
    assert!(err.contains("no longer pending"));

    let err = env
        .app
        .execute_contract(
            env.operator.clone(),
            env.bridge.clone(),
            &ExecuteMsg::Revoke { index },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("no longer pending"));

    let stats: Stats = env
        .app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::Stats {})
        .unwrap();
    assert_eq!(stats.total_requested, 1);
    assert_eq!(stats.total_revoked, 1);
    assert_eq!(stats.total_finalized, 0);
}

#[test]
fn test_invalidate_all_pending() {
    let mut env = setup();
    let old_reference = reference(0x66);
    let old_index = request(&mut env, 5_000, &old_reference);

    // Requested in the same block as the invalidation
    let same_block_reference = reference(0x67);
    let same_block_index = request(&mut env, 5_000, &same_block_reference);

    env.app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::InvalidateAllPending {},
            &[],
        )
        .unwrap();

    for (index, reference) in [
        (old_index, &old_reference),
        (same_block_index, &same_block_reference),
    ] {
        let err = ratify(&mut env, 0, index, 5_000, reference).unwrap_err();
        assert!(err.contains("invalidation height"));

        let err = env
            .app
            .execute_contract(
                env.admin.clone(),
                env.bridge.clone(),
                &ExecuteMsg::Finalize { index },
                &[],
            )
            .unwrap_err();
        assert!(err.root_cause().to_string().contains("invalidation height"));

        // Invalidated operations stay pending but inert
        assert_eq!(operation(&env, index).status, SlotStatus::Pending);
    }

    // Requests in later blocks are unaffected
    next_block(&mut env);
    let reference = reference(0x68);
    let index = request(&mut env, 5_000, &reference);
    let res = ratify(&mut env, 0, index, 5_000, &reference).unwrap();
    assert_eq!(count_events(&res, "wasm-finalized"), 1);

    let pending: PendingOperationsResponse = env
        .app
        .wrap()
        .query_wasm_smart(
            &env.bridge,
            &QueryMsg::PendingOperations {
                start_after: None,
                limit: None,
            },
        )
        .unwrap();
    let indices: Vec<u64> = pending.operations.iter().map(|e| e.index).collect();
    assert_eq!(indices, vec![old_index, same_block_index]);
}

// ============================================================================
// Fees
// ============================================================================

#[test]
fn test_fee_split_on_finalize() {
    let mut env = setup();
    let treasury = Addr::unchecked("terra1treasury");

    env.app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetTreasury {
                treasury: treasury.to_string(),
            },
            &[],
        )
        .unwrap();
    env.app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetFeeRate { rate: 1_000 },
            &[],
        )
        .unwrap();

    let reference = reference(0x77);
    let index = request(&mut env, 100_000, &reference);
    ratify(&mut env, 0, index, 100_000, &reference).unwrap();
    ratify(&mut env, 1, index, 100_000, &reference).unwrap();
    let res = ratify(&mut env, 2, index, 100_000, &reference).unwrap();

    assert_eq!(count_events(&res, "wasm-fee_paid"), 1);
    assert_eq!(attr(&res, "net_amount"), "99900");
    assert_eq!(balance(&env, &env.user.clone()), Uint128::new(99_900));
    assert_eq!(balance(&env, &treasury), Uint128::new(100));

    // The gross amount is what the pool pays
    assert_eq!(pools(&env).multi_sig.available, Uint128::new(9_900_000));

    let stats: Stats = env
        .app
        .wrap()
        .query_wasm_smart(&env.bridge, &QueryMsg::Stats {})
        .unwrap();
    assert_eq!(stats.total_finalized, 1);
    assert_eq!(stats.total_fees_collected, Uint128::new(100));
}

#[test]
fn test_fee_rate_requires_treasury() {
    let mut env = setup();
    let err = env
        .app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetFeeRate { rate: 1_000 },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Treasury must be set"));

    env.app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetTreasury {
                treasury: "terra1treasury".to_string(),
            },
            &[],
        )
        .unwrap();
    let err = env
        .app
        .execute_contract(
            env.admin.clone(),
            env.bridge.clone(),
            &ExecuteMsg::SetFeeRate { rate: 1_000_001 },
            &[],
        )
        .unwrap_err();
    assert!(err.root_cause().to_string().contains("Invalid fee rate"));
}
