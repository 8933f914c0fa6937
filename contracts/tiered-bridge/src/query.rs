//! Query handlers for the tiered bridge controller.
//!
//! This module contains all query message handlers for retrieving contract state.

use cosmwasm_std::{Addr, Deps, Order, StdError, StdResult, Uint128};
use cw_storage_plus::Map;

use crate::auth::load_roles;
use crate::error::ContractError;
use crate::fee_manager::{FeeQuote, FEE_CONFIG};
use crate::ledger::{OperationLedger, OperationSlot};
use crate::msg::{
    CanFinalizeResponse, ConfigResponse, FeeConfigResponse, IsValidReferenceResponse,
    MembersResponse, OperationCountResponse, OperationResponse, PendingAdminResponse,
    PendingOperationEntry, PendingOperationsResponse, PolicyResponse, PoolsResponse,
    RefillApprovalsResponse, RolesResponse,
};
use crate::state::{
    Stats, CONFIG, INVALID_BEFORE_HEIGHT, OPERATORS, PENDING_ADMIN, POLICY, POOLS, RATIFIERS,
    RATIFIED_REFILL_APPROVALS, RATIFIED_REFILL_APPROVALS_REQUIRED, STATS,
};

fn std_err(err: ContractError) -> StdError {
    match err {
        ContractError::Std(e) => e,
        other => StdError::generic_err(other.to_string()),
    }
}

// ============================================================================
// Core Queries
// ============================================================================

/// Query contract configuration.
pub fn query_config(deps: Deps) -> StdResult<ConfigResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(ConfigResponse {
        admin: config.admin,
        paused: config.paused,
        gateway: config.gateway,
        mode: config.mode,
        reference_format: config.reference_format,
        invalid_before_height: INVALID_BEFORE_HEIGHT.load(deps.storage)?,
    })
}

/// Query bridge statistics.
pub fn query_stats(deps: Deps) -> StdResult<Stats> {
    STATS.load(deps.storage)
}

/// Query pending admin proposal.
pub fn query_pending_admin(deps: Deps) -> StdResult<Option<PendingAdminResponse>> {
    let pending = PENDING_ADMIN.may_load(deps.storage)?;
    Ok(pending.map(|p| PendingAdminResponse {
        new_address: p.new_address,
        execute_after: p.execute_after,
    }))
}

/// Check a reference against the configured format.
pub fn query_is_valid_reference(
    deps: Deps,
    reference: String,
) -> StdResult<IsValidReferenceResponse> {
    let config = CONFIG.load(deps.storage)?;
    Ok(IsValidReferenceResponse {
        valid: config.reference_format.is_valid(&reference),
        format: config.reference_format,
    })
}

// ============================================================================
// Policy, Pool and Fee Queries
// ============================================================================

pub fn query_policy(deps: Deps) -> StdResult<PolicyResponse> {
    let policy = POLICY.load(deps.storage)?;
    Ok(PolicyResponse {
        thresholds: policy.thresholds,
        limits: policy.limits,
    })
}

pub fn query_pools(deps: Deps) -> StdResult<PoolsResponse> {
    let pools = POOLS.load(deps.storage)?;
    Ok(PoolsResponse {
        instant: pools.instant,
        ratified: pools.ratified,
        multi_sig: pools.multi_sig,
    })
}

/// Query ratifiers recorded for the next ratified-pool refill.
pub fn query_refill_approvals(deps: Deps) -> StdResult<RefillApprovalsResponse> {
    Ok(RefillApprovalsResponse {
        approvers: RATIFIED_REFILL_APPROVALS
            .may_load(deps.storage)?
            .unwrap_or_default(),
        required: RATIFIED_REFILL_APPROVALS_REQUIRED as u32,
    })
}

pub fn query_fee_config(deps: Deps) -> StdResult<FeeConfigResponse> {
    let fee_config = FEE_CONFIG.load(deps.storage)?;
    Ok(FeeConfigResponse {
        rate: fee_config.rate,
        treasury: fee_config.treasury,
    })
}

/// Fee and net amount at the current rate.
pub fn query_compute_fee(deps: Deps, amount: Uint128) -> StdResult<FeeQuote> {
    let fee_config = FEE_CONFIG.load(deps.storage)?;
    fee_config.quote(amount).map_err(std_err)
}

// ============================================================================
// Operation Queries
// ============================================================================

/// Query the slot at `index`. Closed slots carry no operation.
pub fn query_operation(deps: Deps, index: u64) -> StdResult<OperationResponse> {
    let slot = OperationLedger::slot(deps.storage, index).map_err(std_err)?;
    let status = slot.status();
    let operation = match slot {
        OperationSlot::Pending(op) => Some(op),
        OperationSlot::Finalized | OperationSlot::Revoked => None,
    };
    Ok(OperationResponse {
        index,
        status,
        operation,
    })
}

/// Query pending operations with pagination.
pub fn query_pending_operations(
    deps: Deps,
    start_after: Option<u64>,
    limit: Option<u32>,
) -> StdResult<PendingOperationsResponse> {
    let operations = OperationLedger::pending(deps.storage, start_after, limit)?
        .into_iter()
        .map(|(index, operation)| PendingOperationEntry { index, operation })
        .collect();
    Ok(PendingOperationsResponse { operations })
}

pub fn query_operation_count(deps: Deps) -> StdResult<OperationCountResponse> {
    Ok(OperationCountResponse {
        count: OperationLedger::count(deps.storage)?,
    })
}

/// Whether `index` could be finalized now by `caller` (anyone when absent).
///
/// Evaluates the same gate as `Finalize`, including the bridge pause.
pub fn query_can_finalize(
    deps: Deps,
    index: u64,
    caller: Option<String>,
) -> StdResult<CanFinalizeResponse> {
    let config = CONFIG.load(deps.storage)?;
    let is_admin = match caller {
        Some(caller) => deps.api.addr_validate(&caller)? == config.admin,
        None => false,
    };

    let check = || -> Result<(), ContractError> {
        if config.paused {
            return Err(ContractError::BridgePaused);
        }
        let op = OperationLedger::get(deps.storage, index)?;
        let policy = POLICY.load(deps.storage)?;
        let pools = POOLS.load(deps.storage)?;
        let watermark = INVALID_BEFORE_HEIGHT.load(deps.storage)?;
        policy.assert_can_finalize(&pools, index, &op, watermark, is_admin)
    };

    Ok(match check() {
        Ok(()) => CanFinalizeResponse {
            can_finalize: true,
            reason: None,
        },
        Err(err) => CanFinalizeResponse {
            can_finalize: false,
            reason: Some(err.to_string()),
        },
    })
}

// ============================================================================
// Role Queries
// ============================================================================

pub fn query_roles(deps: Deps, address: String) -> StdResult<RolesResponse> {
    let address = deps.api.addr_validate(&address)?;
    let roles = load_roles(deps.storage, &address)?;
    Ok(RolesResponse {
        address,
        roles: roles.names(),
    })
}

pub fn query_operators(deps: Deps) -> StdResult<MembersResponse> {
    list_members(deps, OPERATORS)
}

pub fn query_ratifiers(deps: Deps) -> StdResult<MembersResponse> {
    list_members(deps, RATIFIERS)
}

fn list_members(deps: Deps, members: Map<&Addr, bool>) -> StdResult<MembersResponse> {
    let members = members
        .range(deps.storage, None, None, Order::Ascending)
        .filter_map(|item| match item {
            Ok((addr, true)) => Some(Ok(addr)),
            Ok(_) => None,
            Err(e) => Some(Err(e)),
        })
        .collect::<StdResult<Vec<Addr>>>()?;
    Ok(MembersResponse { members })
}
