//! Tiered Bridge Controller - Entry Points
//!
//! The implementation is modularized into:
//! - `execute/` - Execute message handlers
//! - `query` - Query message handlers

use cosmwasm_std::{
    entry_point, to_json_binary, Binary, Deps, DepsMut, Env, MessageInfo, Response, StdResult,
};
use cw2::set_contract_version;

use crate::error::ContractError;
use crate::execute::{
    execute_accept_admin, execute_cancel_admin_proposal, execute_finalize, execute_gateway_admin,
    execute_grant_role, execute_instant_transfer, execute_invalidate_all_pending, execute_pause,
    execute_pause_operation, execute_propose_admin, execute_ratify, execute_refill_instant_pool,
    execute_refill_multi_sig_pool, execute_refill_ratified_pool, execute_request,
    execute_revoke, execute_revoke_role, execute_set_fee_rate, execute_set_limits,
    execute_set_thresholds, execute_set_treasury, execute_unpause, execute_unpause_operation,
};
use crate::fee_manager::{FeeConfig, FEE_CONFIG};
use crate::gateway::GatewayAdminMsg;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::policy::Policy;
use crate::pool::RiskPools;
use crate::query::{
    query_can_finalize, query_compute_fee, query_config, query_fee_config,
    query_is_valid_reference, query_operation, query_operation_count, query_operators,
    query_pending_admin, query_pending_operations, query_policy, query_pools, query_ratifiers,
    query_refill_approvals, query_roles, query_stats,
};
use crate::state::{
    Config, Stats, CONFIG, CONTRACT_NAME, CONTRACT_VERSION, INVALID_BEFORE_HEIGHT, OPERATORS,
    POLICY, POOLS, RATIFIED_REFILL_APPROVALS, RATIFIERS, STATS,
};

// ============================================================================
// Instantiate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    _info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let admin = deps.api.addr_validate(&msg.admin)?;
    let gateway = deps.api.addr_validate(&msg.gateway)?;
    let treasury = msg
        .treasury
        .map(|t| deps.api.addr_validate(&t))
        .transpose()?;

    let policy = Policy::new(msg.thresholds, msg.limits)?;
    let fee_config = FeeConfig::new(msg.fee_rate, treasury)?;

    let config = Config {
        admin,
        paused: false,
        gateway,
        mode: msg.mode,
        reference_format: msg.reference_format,
    };
    CONFIG.save(deps.storage, &config)?;
    POLICY.save(deps.storage, &policy)?;
    FEE_CONFIG.save(deps.storage, &fee_config)?;

    // Every pool starts full
    POOLS.save(deps.storage, &RiskPools::from_limits(&policy.limits))?;
    INVALID_BEFORE_HEIGHT.save(deps.storage, &0u64)?;
    RATIFIED_REFILL_APPROVALS.save(deps.storage, &vec![])?;
    STATS.save(deps.storage, &Stats::default())?;

    for operator in &msg.operators {
        OPERATORS.save(deps.storage, &deps.api.addr_validate(operator)?, &true)?;
    }
    for ratifier in &msg.ratifiers {
        RATIFIERS.save(deps.storage, &deps.api.addr_validate(ratifier)?, &true)?;
    }

    Ok(Response::new()
        .add_attribute("method", "instantiate")
        .add_attribute("admin", config.admin)
        .add_attribute("gateway", config.gateway)
        .add_attribute("mode", config.mode.as_str())
        .add_attribute("operator_count", msg.operators.len().to_string())
        .add_attribute("ratifier_count", msg.ratifiers.len().to_string()))
}

// ============================================================================
// Execute
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        // Transfer flow
        ExecuteMsg::Request {
            recipient,
            amount,
            reference,
        } => execute_request(deps, env, info, recipient, amount, reference),
        ExecuteMsg::InstantTransfer {
            recipient,
            amount,
            reference,
        } => execute_instant_transfer(deps, info, recipient, amount, reference),
        ExecuteMsg::Ratify {
            index,
            recipient,
            amount,
            reference,
        } => execute_ratify(deps, info, index, recipient, amount, reference),
        ExecuteMsg::Finalize { index } => execute_finalize(deps, info, index),
        ExecuteMsg::Revoke { index } => execute_revoke(deps, info, index),
        ExecuteMsg::PauseOperation { index } => execute_pause_operation(deps, info, index),
        ExecuteMsg::UnpauseOperation { index } => execute_unpause_operation(deps, info, index),
        ExecuteMsg::InvalidateAllPending {} => execute_invalidate_all_pending(deps, env, info),

        // Pools
        ExecuteMsg::RefillInstantPool {} => execute_refill_instant_pool(deps, info),
        ExecuteMsg::RefillRatifiedPool {} => execute_refill_ratified_pool(deps, info),
        ExecuteMsg::RefillMultiSigPool {} => execute_refill_multi_sig_pool(deps, info),

        // Policy & fees
        ExecuteMsg::SetThresholds {
            instant,
            ratified,
            multi_sig,
        } => execute_set_thresholds(deps, info, instant, ratified, multi_sig),
        ExecuteMsg::SetLimits {
            instant,
            ratified,
            multi_sig,
        } => execute_set_limits(deps, info, instant, ratified, multi_sig),
        ExecuteMsg::SetFeeRate { rate } => execute_set_fee_rate(deps, info, rate),
        ExecuteMsg::SetTreasury { treasury } => execute_set_treasury(deps, info, treasury),

        // Roles & admin
        ExecuteMsg::GrantRole { role, address } => execute_grant_role(deps, info, role, address),
        ExecuteMsg::RevokeRole { role, address } => {
            execute_revoke_role(deps, info, role, address)
        }
        ExecuteMsg::Pause {} => execute_pause(deps, info),
        ExecuteMsg::Unpause {} => execute_unpause(deps, info),
        ExecuteMsg::ProposeAdmin { new_admin } => {
            execute_propose_admin(deps, env, info, new_admin)
        }
        ExecuteMsg::AcceptAdmin {} => execute_accept_admin(deps, env, info),
        ExecuteMsg::CancelAdminProposal {} => execute_cancel_admin_proposal(deps, info),

        // Gateway passthrough
        ExecuteMsg::GatewayPause {} => execute_gateway_admin(deps, info, GatewayAdminMsg::Pause {}),
        ExecuteMsg::GatewayUnpause {} => {
            execute_gateway_admin(deps, info, GatewayAdminMsg::Unpause {})
        }
        ExecuteMsg::GatewayBlacklist { account } => {
            execute_gateway_admin(deps, info, GatewayAdminMsg::Blacklist { account })
        }
        ExecuteMsg::GatewayUnblacklist { account } => {
            execute_gateway_admin(deps, info, GatewayAdminMsg::Unblacklist { account })
        }
        ExecuteMsg::TransferGatewayOwnership { new_owner } => {
            execute_gateway_admin(deps, info, GatewayAdminMsg::TransferOwnership { new_owner })
        }
        ExecuteMsg::ClaimGatewayOwnership {} => {
            execute_gateway_admin(deps, info, GatewayAdminMsg::ClaimOwnership {})
        }
    }
}

// ============================================================================
// Query
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        // Core queries
        QueryMsg::Config {} => to_json_binary(&query_config(deps)?),
        QueryMsg::Stats {} => to_json_binary(&query_stats(deps)?),
        QueryMsg::PendingAdmin {} => to_json_binary(&query_pending_admin(deps)?),
        QueryMsg::IsValidReference { reference } => {
            to_json_binary(&query_is_valid_reference(deps, reference)?)
        }

        // Policy, pool and fee queries
        QueryMsg::Policy {} => to_json_binary(&query_policy(deps)?),
        QueryMsg::Pools {} => to_json_binary(&query_pools(deps)?),
        QueryMsg::RefillApprovals {} => to_json_binary(&query_refill_approvals(deps)?),
        QueryMsg::FeeConfig {} => to_json_binary(&query_fee_config(deps)?),
        QueryMsg::ComputeFee { amount } => to_json_binary(&query_compute_fee(deps, amount)?),

        // Operation queries
        QueryMsg::Operation { index } => to_json_binary(&query_operation(deps, index)?),
        QueryMsg::PendingOperations { start_after, limit } => {
            to_json_binary(&query_pending_operations(deps, start_after, limit)?)
        }
        QueryMsg::OperationCount {} => to_json_binary(&query_operation_count(deps)?),
        QueryMsg::CanFinalize { index, caller } => {
            to_json_binary(&query_can_finalize(deps, index, caller)?)
        }

        // Role queries
        QueryMsg::Roles { address } => to_json_binary(&query_roles(deps, address)?),
        QueryMsg::Operators {} => to_json_binary(&query_operators(deps)?),
        QueryMsg::Ratifiers {} => to_json_binary(&query_ratifiers(deps)?),
    }
}

// ============================================================================
// Migrate
// ============================================================================

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    if STATS.may_load(deps.storage)?.is_none() {
        STATS.save(deps.storage, &Stats::default())?;
    }

    Ok(Response::new()
        .add_attribute("method", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}
