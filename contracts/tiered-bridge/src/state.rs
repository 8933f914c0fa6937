//! State definitions for the tiered bridge controller
//!
//! The ledger, pools and fee config live in their own modules; this module
//! holds the controller-wide configuration and bookkeeping.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Timestamp, Uint128};
use cw_storage_plus::{Item, Map};

use common::ReferenceFormat;

use crate::policy::Policy;
use crate::pool::RiskPools;

// ============================================================================
// Core Configuration
// ============================================================================

/// How finalized operations move the asset
#[cw_serde]
#[derive(Copy, Eq)]
pub enum GatewayMode {
    /// Mint the stablecoin (the controller is the token's minter)
    Mint,
    /// Release custody from the vault
    Release,
}

impl GatewayMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GatewayMode::Mint => "mint",
            GatewayMode::Release => "release",
        }
    }
}

/// Contract configuration
#[cw_serde]
pub struct Config {
    /// Admin address for contract management
    pub admin: Addr,
    /// Whether the bridge is currently paused
    pub paused: bool,
    /// Token contract (mint mode) or custody vault (release mode)
    pub gateway: Addr,
    pub mode: GatewayMode,
    /// Shape of counter-chain transaction references
    pub reference_format: ReferenceFormat,
}

/// Pending admin change proposal
#[cw_serde]
pub struct PendingAdmin {
    /// Proposed new admin address
    pub new_address: Addr,
    /// Block time when the change can be executed
    pub execute_after: Timestamp,
}

/// Bridge statistics
#[cw_serde]
#[derive(Default)]
pub struct Stats {
    pub total_requested: u64,
    pub total_finalized: u64,
    pub total_revoked: u64,
    pub total_instant: u64,
    /// Gross amount moved by finalized and instant transfers
    pub total_volume: Uint128,
    pub total_fees_collected: Uint128,
}

// ============================================================================
// Constants
// ============================================================================

/// Contract name for cw2 migration info
pub const CONTRACT_NAME: &str = "crates.io:tiered-bridge";

/// Contract version for cw2 migration info
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// 7 days in seconds for admin change timelock
pub const ADMIN_TIMELOCK_DURATION: u64 = 604_800;

/// Non-admin approvals recorded before the next ratifier completes a ratified-pool refill
pub const RATIFIED_REFILL_APPROVALS_REQUIRED: usize = 2;

// ============================================================================
// Core State Storage
// ============================================================================

/// Primary config storage
pub const CONFIG: Item<Config> = Item::new("config");

/// Pending admin proposal (if any)
pub const PENDING_ADMIN: Item<PendingAdmin> = Item::new("pending_admin");

/// Bridge statistics
pub const STATS: Item<Stats> = Item::new("stats");

/// Tier thresholds and limits
pub const POLICY: Item<Policy> = Item::new("policy");

/// Instant, ratified and multi-sig pools
pub const POOLS: Item<RiskPools> = Item::new("pools");

/// Operations requested at or below this height can never finalize
pub const INVALID_BEFORE_HEIGHT: Item<u64> = Item::new("invalid_before_height");

/// Ratifiers that have approved the next ratified-pool refill
pub const RATIFIED_REFILL_APPROVALS: Item<Vec<Addr>> = Item::new("ratified_refill_approvals");

// ============================================================================
// Role Membership
// ============================================================================

/// Operators may request, instant-transfer and revoke
/// Key: operator address, Value: whether active
pub const OPERATORS: Map<&Addr, bool> = Map::new("operators");

/// Ratifiers may ratify operations and refill the lower pools
/// Key: ratifier address, Value: whether active
pub const RATIFIERS: Map<&Addr, bool> = Map::new("ratifiers");
