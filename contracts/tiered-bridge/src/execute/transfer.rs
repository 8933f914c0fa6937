//! Transfer flow handlers.
//!
//! This module implements the request → ratify → finalize lifecycle:
//! 1. `Request` - operator records a pending operation
//! 2. `Ratify` - ratifiers approve; the last required approval finalizes
//! 3. `Finalize` - anyone finalizes once the operation's tier is satisfied
//! 4. `Revoke` - operator cancels a pending operation
//!
//! `InstantTransfer` bypasses the ledger and draws on the instant pool.

use cosmwasm_std::{
    Addr, CosmosMsg, Deps, DepsMut, Env, Event, MessageInfo, Response, Storage, Uint128,
};

use crate::auth::{authorize, Action};
use crate::error::ContractError;
use crate::events::BridgeEvent;
use crate::execute::ensure_not_paused;
use crate::fee_manager::{FeeConfig, FeeQuote, FEE_CONFIG};
use crate::gateway::AssetGateway;
use crate::ledger::{Operation, OperationLedger};
use crate::pool::Tier;
use crate::state::{Config, CONFIG, INVALID_BEFORE_HEIGHT, POLICY, POOLS, STATS};

// ============================================================================
// Request (Operator)
// ============================================================================

/// Record a pending transfer request at the current block height.
pub fn execute_request(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
    reference: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;
    authorize(deps.storage, &info.sender, Action::Request)?;

    let recipient = validate_transfer(deps.as_ref(), &config, &recipient, amount, &reference)?;

    let op = Operation::new(recipient.clone(), amount, reference.clone(), env.block.height);
    let index = OperationLedger::append(deps.storage, op)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_requested += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_attribute("method", "request")
        .add_attribute("index", index.to_string())
        .add_attribute("requested_at", env.block.height.to_string())
        .add_event(
            BridgeEvent::Requested {
                to: recipient,
                amount,
                reference,
                index,
            }
            .into(),
        ))
}

// ============================================================================
// InstantTransfer (Operator)
// ============================================================================

/// Move `amount` right away, reserving it from the instant pool.
pub fn execute_instant_transfer(
    deps: DepsMut,
    info: MessageInfo,
    recipient: String,
    amount: Uint128,
    reference: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;
    authorize(deps.storage, &info.sender, Action::InstantTransfer)?;

    let recipient = validate_transfer(deps.as_ref(), &config, &recipient, amount, &reference)?;

    let policy = POLICY.load(deps.storage)?;
    if amount > policy.thresholds.instant {
        return Err(ContractError::OverThreshold {
            amount,
            threshold: policy.thresholds.instant,
        });
    }

    let mut pools = POOLS.load(deps.storage)?;
    if !pools.instant.try_reserve(amount) {
        return Err(ContractError::PoolDry {
            tier: Tier::Instant,
            available: pools.instant.available,
            requested: amount,
        });
    }

    let fee_config = FEE_CONFIG.load(deps.storage)?;
    let quote = fee_config.quote(amount)?;
    let payout = pay_out(&config, &fee_config, &recipient, &quote)?;

    POOLS.save(deps.storage, &pools)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_instant += 1;
    stats.total_volume = stats.total_volume.checked_add(amount)?;
    stats.total_fees_collected = stats.total_fees_collected.checked_add(quote.fee)?;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_messages(payout.messages)
        .add_attribute("method", "instant_transfer")
        .add_attribute("recipient", recipient.to_string())
        .add_attribute("amount", amount)
        .add_attribute("fee", quote.fee)
        .add_attribute("instant_available", pools.instant.available)
        .add_event(
            BridgeEvent::InstantTransfer {
                to: recipient,
                net_amount: quote.net,
                reference,
            }
            .into(),
        )
        .add_events(payout.events))
}

// ============================================================================
// Ratify (Ratifier)
// ============================================================================

/// Ratify a pending operation, finalizing it if this approval completes its tier.
pub fn execute_ratify(
    deps: DepsMut,
    info: MessageInfo,
    index: u64,
    recipient: String,
    amount: Uint128,
    reference: String,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;
    let caller = authorize(deps.storage, &info.sender, Action::Ratify)?;

    let mut op = OperationLedger::get(deps.storage, index)?;
    if op.recipient.as_str() != recipient {
        return Err(ContractError::RecipientMismatch { index });
    }
    if op.amount != amount {
        return Err(ContractError::AmountMismatch { index });
    }
    if op.reference != reference {
        return Err(ContractError::ReferenceMismatch { index });
    }

    let watermark = INVALID_BEFORE_HEIGHT.load(deps.storage)?;
    if op.requested_at <= watermark {
        return Err(ContractError::InvalidOperation { index, watermark });
    }

    let approvals = op.approve(&caller.address)?;
    OperationLedger::update(deps.storage, index, &op)?;

    let mut response = Response::new()
        .add_attribute("method", "ratify")
        .add_attribute("index", index.to_string())
        .add_attribute("approvals", approvals.to_string())
        .add_event(
            BridgeEvent::Ratified {
                index,
                approver: caller.address.clone(),
            }
            .into(),
        );

    // An admin ratification satisfies the approval gate on its own
    let policy = POLICY.load(deps.storage)?;
    let pools = POOLS.load(deps.storage)?;
    if policy.can_finalize(&pools, index, &op, watermark, caller.is_admin()) {
        let finalized = finalize_operation(deps.storage, &config, index, caller.is_admin())?;
        response = response
            .add_submessages(finalized.messages)
            .add_attributes(finalized.attributes)
            .add_events(finalized.events);
    }

    Ok(response)
}

// ============================================================================
// Finalize (Anyone)
// ============================================================================

/// Finalize a pending operation whose tier is satisfied.
pub fn execute_finalize(
    deps: DepsMut,
    info: MessageInfo,
    index: u64,
) -> Result<Response, ContractError> {
    let config = CONFIG.load(deps.storage)?;
    ensure_not_paused(&config)?;
    let caller = authorize(deps.storage, &info.sender, Action::Finalize)?;

    let finalized = finalize_operation(deps.storage, &config, index, caller.is_admin())?;
    Ok(Response::new()
        .add_attribute("method", "finalize")
        .add_submessages(finalized.messages)
        .add_attributes(finalized.attributes)
        .add_events(finalized.events))
}

/// Gate, debit, tombstone and pay out one operation.
///
/// Everything is checked before anything is written, so a failure leaves
/// the ledger and the pools untouched. With `admin_override` the approval
/// gate is waived and no pool is debited.
fn finalize_operation(
    storage: &mut dyn Storage,
    config: &Config,
    index: u64,
    admin_override: bool,
) -> Result<Response, ContractError> {
    let op = OperationLedger::get(storage, index)?;
    let policy = POLICY.load(storage)?;
    let mut pools = POOLS.load(storage)?;
    let watermark = INVALID_BEFORE_HEIGHT.load(storage)?;

    policy.assert_can_finalize(&pools, index, &op, watermark, admin_override)?;

    let tier = if admin_override {
        None
    } else {
        Some(policy.subtract_from_pool(&mut pools, op.approval_count(), op.amount)?)
    };

    let fee_config = FEE_CONFIG.load(storage)?;
    let quote = fee_config.quote(op.amount)?;
    let payout = pay_out(config, &fee_config, &op.recipient, &quote)?;

    OperationLedger::finalize(storage, index)?;
    if tier.is_some() {
        POOLS.save(storage, &pools)?;
    }

    let mut stats = STATS.load(storage)?;
    stats.total_finalized += 1;
    stats.total_volume = stats.total_volume.checked_add(op.amount)?;
    stats.total_fees_collected = stats.total_fees_collected.checked_add(quote.fee)?;
    STATS.save(storage, &stats)?;

    Ok(Response::new()
        .add_messages(payout.messages)
        .add_attribute("finalized_index", index.to_string())
        .add_attribute("tier", tier.map(|t| t.as_str()).unwrap_or("admin"))
        .add_attribute("fee", quote.fee)
        .add_event(
            BridgeEvent::Finalized {
                to: op.recipient,
                net_amount: quote.net,
                reference: op.reference,
                index,
            }
            .into(),
        )
        .add_events(payout.events))
}

// ============================================================================
// Revoke & Per-Operation Pause
// ============================================================================

/// Cancel a pending operation, whatever its ratification progress.
pub fn execute_revoke(
    deps: DepsMut,
    info: MessageInfo,
    index: u64,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::Revoke)?;

    OperationLedger::revoke(deps.storage, index)?;

    let mut stats = STATS.load(deps.storage)?;
    stats.total_revoked += 1;
    STATS.save(deps.storage, &stats)?;

    Ok(Response::new()
        .add_attribute("method", "revoke")
        .add_attribute("index", index.to_string())
        .add_attribute("revoked_by", info.sender)
        .add_event(BridgeEvent::Revoked { index }.into()))
}

pub fn execute_pause_operation(
    deps: DepsMut,
    info: MessageInfo,
    index: u64,
) -> Result<Response, ContractError> {
    set_operation_paused(deps, info, index, true)
}

pub fn execute_unpause_operation(
    deps: DepsMut,
    info: MessageInfo,
    index: u64,
) -> Result<Response, ContractError> {
    set_operation_paused(deps, info, index, false)
}

fn set_operation_paused(
    deps: DepsMut,
    info: MessageInfo,
    index: u64,
    paused: bool,
) -> Result<Response, ContractError> {
    authorize(deps.storage, &info.sender, Action::PauseOperation)?;

    let mut op = OperationLedger::get(deps.storage, index)?;
    match (op.paused, paused) {
        (true, true) => return Err(ContractError::OperationAlreadyPaused { index }),
        (false, false) => return Err(ContractError::OperationNotPaused { index }),
        _ => {}
    }
    op.paused = paused;
    OperationLedger::update(deps.storage, index, &op)?;

    let action = if paused {
        "pause_operation"
    } else {
        "unpause_operation"
    };
    Ok(Response::new()
        .add_attribute("method", action)
        .add_attribute("index", index.to_string()))
}

// ============================================================================
// Internal Helpers
// ============================================================================

/// Validate the recipient, amount and reference shared by every transfer entry point.
fn validate_transfer(
    deps: Deps,
    config: &Config,
    recipient: &str,
    amount: Uint128,
    reference: &str,
) -> Result<Addr, ContractError> {
    if recipient.is_empty() {
        return Err(ContractError::InvalidRecipient {
            reason: "recipient is empty".to_string(),
        });
    }
    let recipient = deps
        .api
        .addr_validate(recipient)
        .map_err(|e| ContractError::InvalidRecipient {
            reason: e.to_string(),
        })?;

    if amount.is_zero() {
        return Err(ContractError::ZeroAmount);
    }

    if !config.reference_format.is_valid(reference) {
        return Err(ContractError::InvalidReference {
            format: config.reference_format.as_str().to_string(),
        });
    }

    Ok(recipient)
}

struct Payout {
    messages: Vec<CosmosMsg>,
    events: Vec<Event>,
}

/// Gateway messages moving the net amount to the recipient and the fee to the treasury.
fn pay_out(
    config: &Config,
    fee_config: &FeeConfig,
    recipient: &Addr,
    quote: &FeeQuote,
) -> Result<Payout, ContractError> {
    let gateway = AssetGateway::from_config(config);
    let mut payout = Payout {
        messages: vec![],
        events: vec![],
    };

    // A zero-amount transfer is rejected by CW20 tokens
    if !quote.net.is_zero() {
        payout.messages.push(gateway.transfer(recipient, quote.net)?);
    }

    if !quote.fee.is_zero() {
        let treasury = fee_config
            .treasury
            .clone()
            .ok_or(ContractError::TreasuryNotSet)?;
        payout.messages.push(gateway.transfer(&treasury, quote.fee)?);
        payout.events.push(
            BridgeEvent::FeePaid {
                treasury,
                fee: quote.fee,
            }
            .into(),
        );
    }

    Ok(payout)
}
