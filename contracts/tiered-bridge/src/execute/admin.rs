//! Admin operations handlers.
//!
//! This module handles:
//! - Pause/unpause the bridge
//! - Invalidating every pending operation
//! - Admin transfer (propose/accept/cancel)
//! - Administrative passthrough to the asset gateway

use cosmwasm_std::{DepsMut, Env, MessageInfo, Response};

use crate::auth::{authorize, Action};
use crate::error::ContractError;
use crate::gateway::{AssetGateway, GatewayAdminMsg};
use crate::state::{
    PendingAdmin, ADMIN_TIMELOCK_DURATION, CONFIG, INVALID_BEFORE_HEIGHT, PENDING_ADMIN,
};

// ============================================================================
// Pause/Unpause
// ============================================================================

/// Pause the bridge (stops requests, ratification, finalization and refills).
pub fn execute_pause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    set_paused(deps, info, true)
}

/// Unpause the bridge.
pub fn execute_unpause(deps: DepsMut, info: MessageInfo) -> Result<Response, ContractError> {
    set_paused(deps, info, false)
}

fn set_paused(deps: DepsMut, info: MessageInfo, paused: bool) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::PauseBridge)?;

    let mut config = CONFIG.load(deps.storage)?;
    config.paused = paused;
    CONFIG.save(deps.storage, &config)?;

    let action = if paused { "pause" } else { "unpause" };
    Ok(Response::new().add_attribute("method", action))
}

// ============================================================================
// Invalidation
// ============================================================================

/// Void every operation requested at or before the current block height.
///
/// Invalidated operations stay pending in the ledger but can never be
/// ratified or finalized.
pub fn execute_invalidate_all_pending(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::InvalidateAllPending)?;

    let watermark = env.block.height;
    INVALID_BEFORE_HEIGHT.save(deps.storage, &watermark)?;

    Ok(Response::new()
        .add_attribute("method", "invalidate_all_pending")
        .add_attribute("invalid_before_height", watermark.to_string()))
}

// ============================================================================
// Admin Transfer
// ============================================================================

/// Propose a new admin (starts timelock).
pub fn execute_propose_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    new_admin: String,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::TransferAdmin)?;

    let new_admin_addr = deps.api.addr_validate(&new_admin)?;
    let pending = PendingAdmin {
        new_address: new_admin_addr.clone(),
        execute_after: env.block.time.plus_seconds(ADMIN_TIMELOCK_DURATION),
    };
    PENDING_ADMIN.save(deps.storage, &pending)?;

    Ok(Response::new()
        .add_attribute("method", "propose_admin")
        .add_attribute("new_admin", new_admin_addr.to_string())
        .add_attribute("execute_after", pending.execute_after.seconds().to_string()))
}

/// Accept pending admin role (after timelock).
pub fn execute_accept_admin(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let pending = PENDING_ADMIN
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingAdmin)?;

    if info.sender != pending.new_address {
        return Err(ContractError::UnauthorizedPendingAdmin);
    }

    if env.block.time < pending.execute_after {
        let remaining = pending.execute_after.seconds() - env.block.time.seconds();
        return Err(ContractError::TimelockNotExpired {
            remaining_seconds: remaining,
        });
    }

    let mut config = CONFIG.load(deps.storage)?;
    config.admin = pending.new_address.clone();
    CONFIG.save(deps.storage, &config)?;
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new()
        .add_attribute("method", "accept_admin")
        .add_attribute("new_admin", pending.new_address.to_string()))
}

/// Cancel pending admin proposal.
pub fn execute_cancel_admin_proposal(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::TransferAdmin)?;

    PENDING_ADMIN
        .may_load(deps.storage)?
        .ok_or(ContractError::NoPendingAdmin)?;
    PENDING_ADMIN.remove(deps.storage);

    Ok(Response::new().add_attribute("method", "cancel_admin_proposal"))
}

// ============================================================================
// Gateway Passthrough
// ============================================================================

/// Forward an administrative call to the token or vault.
///
/// The controller must own the gateway for these calls to succeed; the
/// gateway's own error is returned unchanged.
pub fn execute_gateway_admin(
    deps: DepsMut,
    info: MessageInfo,
    msg: GatewayAdminMsg,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::GatewayAdmin)?;

    if let GatewayAdminMsg::Blacklist { account }
    | GatewayAdminMsg::Unblacklist { account }
    | GatewayAdminMsg::TransferOwnership { new_owner: account } = &msg
    {
        deps.api.addr_validate(account)?;
    }

    let config = CONFIG.load(deps.storage)?;
    let gateway = AssetGateway::from_config(&config);

    Ok(Response::new()
        .add_message(gateway.admin(&msg)?)
        .add_attribute("method", msg.action())
        .add_attribute("gateway", config.gateway))
}
