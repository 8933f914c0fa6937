//! Message types for the tiered bridge controller

use common::ReferenceFormat;
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Timestamp, Uint128};

use crate::auth::Role;
use crate::fee_manager::FeeQuote;
use crate::ledger::{Operation, SlotStatus};
use crate::pool::{RiskPool, TierValues};
use crate::state::{GatewayMode, Stats};

// ============================================================================
// Instantiate & Migrate
// ============================================================================

/// Migrate message
#[cw_serde]
pub struct MigrateMsg {}

/// Instantiate message
#[cw_serde]
pub struct InstantiateMsg {
    /// Admin address for contract management
    pub admin: String,
    /// Initial operator addresses
    pub operators: Vec<String>,
    /// Initial ratifier addresses
    pub ratifiers: Vec<String>,
    /// Token contract (mint mode) or custody vault (release mode)
    pub gateway: String,
    pub mode: GatewayMode,
    /// Shape of counter-chain transaction references
    pub reference_format: ReferenceFormat,
    pub thresholds: TierValues,
    pub limits: TierValues,
    /// Fee rate in millionths (0 = no fee)
    pub fee_rate: u64,
    /// Fee recipient (required when `fee_rate > 0`)
    pub treasury: Option<String>,
}

// ============================================================================
// Execute Messages
// ============================================================================

#[cw_serde]
pub enum ExecuteMsg {
    // ========================================================================
    // Transfer Flow
    // ========================================================================
    /// Record a pending transfer request
    ///
    /// Authorization: Operator
    Request {
        recipient: String,
        amount: Uint128,
        /// Counter-chain transaction hash
        reference: String,
    },

    /// Transfer immediately out of the instant pool, without ratification
    ///
    /// Authorization: Operator
    InstantTransfer {
        recipient: String,
        amount: Uint128,
        reference: String,
    },

    /// Ratify a pending operation. The stored fields must match exactly.
    /// Finalizes in the same transaction once the operation's tier is satisfied.
    ///
    /// Authorization: Ratifier
    Ratify {
        index: u64,
        recipient: String,
        amount: Uint128,
        reference: String,
    },

    /// Finalize a sufficiently ratified operation
    ///
    /// Authorization: Anyone (admin bypasses approvals and pools)
    Finalize { index: u64 },

    /// Cancel a pending operation regardless of its approvals
    ///
    /// Authorization: Operator
    Revoke { index: u64 },

    /// Authorization: Admin
    PauseOperation { index: u64 },

    /// Authorization: Admin
    UnpauseOperation { index: u64 },

    /// Void every operation requested at or before the current height
    ///
    /// Authorization: Admin
    InvalidateAllPending {},

    // ========================================================================
    // Pools
    // ========================================================================
    /// Refill the instant pool from the ratified pool
    ///
    /// Authorization: Ratifier
    RefillInstantPool {},

    /// Approve, or complete, a refill of the ratified pool from the multi-sig pool
    ///
    /// Authorization: Ratifier (two recorded approvals, completed by a third),
    /// or Admin alone
    RefillRatifiedPool {},

    /// Reset the multi-sig pool to its limit
    ///
    /// Authorization: Admin
    RefillMultiSigPool {},

    // ========================================================================
    // Policy & Fees
    // ========================================================================
    /// Authorization: Admin
    SetThresholds {
        instant: Uint128,
        ratified: Uint128,
        multi_sig: Uint128,
    },

    /// Authorization: Admin
    SetLimits {
        instant: Uint128,
        ratified: Uint128,
        multi_sig: Uint128,
    },

    /// Set the fee rate in millionths
    ///
    /// Authorization: Admin
    SetFeeRate { rate: u64 },

    /// Authorization: Admin
    SetTreasury { treasury: String },

    // ========================================================================
    // Roles & Admin
    // ========================================================================
    /// Authorization: Admin
    GrantRole { role: Role, address: String },

    /// Authorization: Admin
    RevokeRole { role: Role, address: String },

    /// Pause the bridge (admin only)
    Pause {},

    /// Unpause the bridge (admin only)
    Unpause {},

    /// Initiate 7-day timelock for admin transfer
    ProposeAdmin { new_admin: String },

    /// Accept admin role (pending admin only, after timelock)
    AcceptAdmin {},

    /// Cancel pending admin proposal
    CancelAdminProposal {},

    // ========================================================================
    // Gateway Passthrough (admin only)
    // ========================================================================
    GatewayPause {},
    GatewayUnpause {},
    GatewayBlacklist { account: String },
    GatewayUnblacklist { account: String },
    TransferGatewayOwnership { new_owner: String },
    ClaimGatewayOwnership {},
}

// ============================================================================
// Query Messages
// ============================================================================

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(ConfigResponse)]
    Config {},

    #[returns(PolicyResponse)]
    Policy {},

    #[returns(PoolsResponse)]
    Pools {},

    #[returns(FeeConfigResponse)]
    FeeConfig {},

    /// Fee and net amount for a gross amount at the current rate
    #[returns(FeeQuote)]
    ComputeFee { amount: Uint128 },

    #[returns(OperationResponse)]
    Operation { index: u64 },

    #[returns(PendingOperationsResponse)]
    PendingOperations {
        start_after: Option<u64>,
        limit: Option<u32>,
    },

    #[returns(OperationCountResponse)]
    OperationCount {},

    /// Whether `index` could be finalized now, as seen by `caller`
    #[returns(CanFinalizeResponse)]
    CanFinalize {
        index: u64,
        caller: Option<String>,
    },

    #[returns(RefillApprovalsResponse)]
    RefillApprovals {},

    #[returns(RolesResponse)]
    Roles { address: String },

    #[returns(MembersResponse)]
    Operators {},

    #[returns(MembersResponse)]
    Ratifiers {},

    #[returns(Stats)]
    Stats {},

    #[returns(Option<PendingAdminResponse>)]
    PendingAdmin {},

    #[returns(IsValidReferenceResponse)]
    IsValidReference { reference: String },
}

// ============================================================================
// Query Responses
// ============================================================================

#[cw_serde]
pub struct ConfigResponse {
    pub admin: Addr,
    pub paused: bool,
    pub gateway: Addr,
    pub mode: GatewayMode,
    pub reference_format: ReferenceFormat,
    pub invalid_before_height: u64,
}

#[cw_serde]
pub struct PolicyResponse {
    pub thresholds: TierValues,
    pub limits: TierValues,
}

#[cw_serde]
pub struct PoolsResponse {
    pub instant: RiskPool,
    pub ratified: RiskPool,
    pub multi_sig: RiskPool,
}

#[cw_serde]
pub struct FeeConfigResponse {
    pub rate: u64,
    pub treasury: Option<Addr>,
}

#[cw_serde]
pub struct OperationResponse {
    pub index: u64,
    pub status: SlotStatus,
    /// Present only while the operation is pending
    pub operation: Option<Operation>,
}

#[cw_serde]
pub struct PendingOperationEntry {
    pub index: u64,
    pub operation: Operation,
}

#[cw_serde]
pub struct PendingOperationsResponse {
    pub operations: Vec<PendingOperationEntry>,
}

#[cw_serde]
pub struct OperationCountResponse {
    pub count: u64,
}

#[cw_serde]
pub struct CanFinalizeResponse {
    pub can_finalize: bool,
    /// Why finalization is blocked, when it is
    pub reason: Option<String>,
}

#[cw_serde]
pub struct RefillApprovalsResponse {
    pub approvers: Vec<Addr>,
    pub required: u32,
}

#[cw_serde]
pub struct RolesResponse {
    pub address: Addr,
    pub roles: Vec<String>,
}

#[cw_serde]
pub struct MembersResponse {
    pub members: Vec<Addr>,
}

#[cw_serde]
pub struct PendingAdminResponse {
    pub new_address: Addr,
    pub execute_after: Timestamp,
}

#[cw_serde]
pub struct IsValidReferenceResponse {
    pub valid: bool,
    pub format: ReferenceFormat,
}
