//! Configuration management handlers.
//!
//! This module handles:
//! - Tier thresholds and pool limits
//! - Fee rate and treasury
//! - Operator and ratifier membership

use cosmwasm_std::{DepsMut, MessageInfo, Response, Uint128};

use crate::auth::{authorize, Action, Role};
use crate::error::ContractError;
use crate::events::BridgeEvent;
use crate::fee_manager::FEE_CONFIG;
use crate::pool::TierValues;
use crate::state::{OPERATORS, POLICY, POOLS, RATIFIERS};

// ============================================================================
// Policy
// ============================================================================

/// Replace the tier thresholds.
pub fn execute_set_thresholds(
    deps: DepsMut,
    info: MessageInfo,
    instant: Uint128,
    ratified: Uint128,
    multi_sig: Uint128,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::ConfigurePolicy)?;

    let thresholds = TierValues {
        instant,
        ratified,
        multi_sig,
    };
    let mut policy = POLICY.load(deps.storage)?;
    policy.set_thresholds(thresholds)?;
    POLICY.save(deps.storage, &policy)?;

    Ok(Response::new()
        .add_attribute("method", "set_thresholds")
        .add_event(BridgeEvent::ThresholdsChanged(thresholds).into()))
}

/// Replace the pool limits, clamping any pool now above its limit.
pub fn execute_set_limits(
    deps: DepsMut,
    info: MessageInfo,
    instant: Uint128,
    ratified: Uint128,
    multi_sig: Uint128,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::ConfigurePolicy)?;

    let limits = TierValues {
        instant,
        ratified,
        multi_sig,
    };
    let mut policy = POLICY.load(deps.storage)?;
    policy.set_limits(limits)?;
    POLICY.save(deps.storage, &policy)?;

    let mut pools = POOLS.load(deps.storage)?;
    pools.set_limits(&limits);
    POOLS.save(deps.storage, &pools)?;

    Ok(Response::new()
        .add_attribute("method", "set_limits")
        .add_event(BridgeEvent::LimitsChanged(limits).into()))
}

// ============================================================================
// Fees
// ============================================================================

/// Set the fee rate in millionths.
pub fn execute_set_fee_rate(
    deps: DepsMut,
    info: MessageInfo,
    rate: u64,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::ConfigureFees)?;

    let mut fee_config = FEE_CONFIG.load(deps.storage)?;
    fee_config.set_rate(rate)?;
    FEE_CONFIG.save(deps.storage, &fee_config)?;

    Ok(Response::new()
        .add_attribute("method", "set_fee_rate")
        .add_attribute("rate", rate.to_string()))
}

/// Set the address receiving fees.
pub fn execute_set_treasury(
    deps: DepsMut,
    info: MessageInfo,
    treasury: String,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::ConfigureFees)?;

    let treasury_addr = deps.api.addr_validate(&treasury)?;
    let mut fee_config = FEE_CONFIG.load(deps.storage)?;
    fee_config.treasury = Some(treasury_addr);
    FEE_CONFIG.save(deps.storage, &fee_config)?;

    Ok(Response::new()
        .add_attribute("method", "set_treasury")
        .add_attribute("treasury", treasury))
}

// ============================================================================
// Role Management
// ============================================================================

/// Grant the operator or ratifier role.
pub fn execute_grant_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    address: String,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::ManageRoles)?;

    let members = match role {
        Role::Admin => return Err(ContractError::AdminRoleNotGrantable),
        Role::Operator => OPERATORS,
        Role::Ratifier => RATIFIERS,
    };

    let addr = deps.api.addr_validate(&address)?;
    if members.has(deps.storage, &addr) {
        return Err(ContractError::RoleAlreadyGranted {
            role: role.to_string(),
            address,
        });
    }
    members.save(deps.storage, &addr, &true)?;

    Ok(Response::new()
        .add_attribute("method", "grant_role")
        .add_attribute("role", role.as_str())
        .add_attribute("address", address))
}

/// Revoke the operator or ratifier role.
pub fn execute_revoke_role(
    deps: DepsMut,
    info: MessageInfo,
    role: Role,
    address: String,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::ManageRoles)?;

    let members = match role {
        Role::Admin => return Err(ContractError::AdminRoleNotGrantable),
        Role::Operator => OPERATORS,
        Role::Ratifier => RATIFIERS,
    };

    let addr = deps.api.addr_validate(&address)?;
    if !members.has(deps.storage, &addr) {
        return Err(ContractError::RoleNotHeld {
            role: role.to_string(),
            address,
        });
    }
    members.remove(deps.storage, &addr);

    Ok(Response::new()
        .add_attribute("method", "revoke_role")
        .add_attribute("role", role.as_str())
        .add_attribute("address", address))
}
