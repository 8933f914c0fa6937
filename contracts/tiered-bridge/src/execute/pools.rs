//! Risk pool refill handlers.
//!
//! Each refill restores a pool to its limit and debits the tier above it by
//! the same amount. The multi-sig pool has no donor and simply resets.

use cosmwasm_std::{DepsMut, MessageInfo, Response};

use crate::auth::{authorize, Action};
use crate::error::ContractError;
use crate::events::BridgeEvent;
use crate::execute::ensure_not_paused;
use crate::pool::Tier;
use crate::state::{
    CONFIG, POOLS, RATIFIED_REFILL_APPROVALS, RATIFIED_REFILL_APPROVALS_REQUIRED, RATIFIERS,
};

/// Refill the instant pool from the ratified pool.
pub fn execute_refill_instant_pool(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;
    authorize(deps.storage, &info.sender, Action::RefillInstantPool)?;

    refill(deps, Tier::Instant)
}

/// Record a ratifier's approval for a ratified-pool refill, or complete it.
///
/// The admin completes the refill alone. Otherwise two distinct ratifiers
/// are recorded and a third distinct ratifier completes it. An approver who
/// has since lost the ratifier role no longer counts.
pub fn execute_refill_ratified_pool(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;
    let caller = authorize(deps.storage, &info.sender, Action::RefillRatifiedPool)?;

    // Approvals only count while the approver still holds the ratifier role
    let mut approvals = RATIFIED_REFILL_APPROVALS
        .may_load(deps.storage)?
        .unwrap_or_default();
    approvals.retain(|approver| RATIFIERS.has(&*deps.storage, approver));

    if !caller.is_admin() {
        if approvals.contains(&caller.address) {
            return Err(ContractError::AlreadyApproved {
                approver: caller.address.to_string(),
            });
        }
        if approvals.len() < RATIFIED_REFILL_APPROVALS_REQUIRED {
            approvals.push(caller.address.clone());
            RATIFIED_REFILL_APPROVALS.save(deps.storage, &approvals)?;

            return Ok(Response::new()
                .add_attribute("method", "approve_ratified_refill")
                .add_attribute("approver", caller.address)
                .add_attribute("approvals", approvals.len().to_string()));
        }
    }

    refill(deps, Tier::Ratified)
}

/// Reset the multi-sig pool to its limit.
pub fn execute_refill_multi_sig_pool(
    deps: DepsMut,
    info: MessageInfo,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;
    authorize(deps.storage, &info.sender, Action::RefillMultiSigPool)?;

    refill(deps, Tier::MultiSig)
}

fn refill(deps: DepsMut, tier: Tier) -> Result<Response, ContractError> {
    let mut pools = POOLS.load(deps.storage)?;
    let amount = pools.refill(tier)?;
    POOLS.save(deps.storage, &pools)?;

    if tier == Tier::Ratified {
        RATIFIED_REFILL_APPROVALS.save(deps.storage, &vec![])?;
    }

    Ok(Response::new()
        .add_attribute("method", format!("refill_{}_pool", tier.as_str()))
        .add_attribute("amount", amount)
        .add_attribute("available", pools.get(tier).available)
        .add_event(BridgeEvent::PoolRefilled { tier, amount }.into()))
}
