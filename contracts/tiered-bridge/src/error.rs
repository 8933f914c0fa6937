//! Error types for the tiered bridge controller
//!
//! Variants are grouped by how an operator tool should react: validation
//! errors are caller-fixable, policy denials depend on current state,
//! access-control failures are reported uniformly.

use cosmwasm_std::{CheckedMultiplyRatioError, OverflowError, StdError, Uint128};
use thiserror::Error;

use crate::ledger::SlotStatus;
use crate::pool::Tier;

#[derive(Error, Debug, PartialEq)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    // ========================================================================
    // Authorization Errors
    // ========================================================================
    #[error("Unauthorized: caller lacks the required role")]
    Unauthorized,

    #[error("Unauthorized: only pending admin can accept")]
    UnauthorizedPendingAdmin,

    #[error("No pending admin change")]
    NoPendingAdmin,

    #[error("Timelock not expired: {remaining_seconds} seconds remaining")]
    TimelockNotExpired { remaining_seconds: u64 },

    // ========================================================================
    // Bridge State Errors
    // ========================================================================
    #[error("Bridge is paused")]
    BridgePaused,

    // ========================================================================
    // Validation Errors
    // ========================================================================
    #[error("Invalid recipient: {reason}")]
    InvalidRecipient { reason: String },

    #[error("Amount must be greater than zero")]
    ZeroAmount,

    #[error("Malformed reference: expected {format} format")]
    InvalidReference { format: String },

    #[error("Invalid fee rate {rate}: maximum is {max}")]
    InvalidFeeRate { rate: u64, max: u64 },

    #[error("Treasury must be set before enabling fees")]
    TreasuryNotSet,

    #[error("Invalid thresholds: {reason}")]
    InvalidThresholds { reason: String },

    #[error("Invalid limits: {reason}")]
    InvalidLimits { reason: String },

    #[error("The admin role moves only through ProposeAdmin / AcceptAdmin")]
    AdminRoleNotGrantable,

    #[error("Role {role} already granted to {address}")]
    RoleAlreadyGranted { role: String, address: String },

    #[error("Role {role} not held by {address}")]
    RoleNotHeld { role: String, address: String },

    // ========================================================================
    // Ledger Errors
    // ========================================================================
    #[error("Operation {index} not found")]
    OperationNotFound { index: u64 },

    #[error("Operation {index} is no longer pending: {status}")]
    OperationClosed { index: u64, status: SlotStatus },

    #[error("Operation {index} mismatch: recipient differs")]
    RecipientMismatch { index: u64 },

    #[error("Operation {index} mismatch: amount differs")]
    AmountMismatch { index: u64 },

    #[error("Operation {index} mismatch: reference differs")]
    ReferenceMismatch { index: u64 },

    #[error("Operation {index} is already paused")]
    OperationAlreadyPaused { index: u64 },

    #[error("Operation {index} is not paused")]
    OperationNotPaused { index: u64 },

    // ========================================================================
    // Policy Denials
    // ========================================================================
    #[error("Amount {amount} exceeds the instant threshold {threshold}")]
    OverThreshold { amount: Uint128, threshold: Uint128 },

    #[error("{tier} pool has {available} available, requested {requested}")]
    PoolDry {
        tier: Tier,
        available: Uint128,
        requested: Uint128,
    },

    #[error("Operation {index} does not have enough approvals ({approvals})")]
    NotEnoughApprovals { index: u64, approvals: u32 },

    #[error("Operation {index} is paused")]
    OperationPaused { index: u64 },

    #[error("Operation {index} was requested at or before the invalidation height {watermark}")]
    InvalidOperation { index: u64, watermark: u64 },

    #[error("Already approved by {approver}")]
    AlreadyApproved { approver: String },

    #[error("No pool can cover {amount} at the current tiers")]
    NoEligiblePool { amount: Uint128 },

    // ========================================================================
    // Arithmetic Hazards
    // ========================================================================
    #[error("Refilling {tier} pool needs {needed} from its donor, which has {available}")]
    InsufficientDonorCapacity {
        tier: Tier,
        needed: Uint128,
        available: Uint128,
    },

    #[error("{0}")]
    Overflow(#[from] OverflowError),

    #[error("{0}")]
    FeeOverflow(#[from] CheckedMultiplyRatioError),
}
