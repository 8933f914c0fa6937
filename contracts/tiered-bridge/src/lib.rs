//! Tiered Bridge Controller - Mint/Withdraw Authorization for a Custodial Stablecoin Bridge
//!
//! Operators submit transfer requests observed on the counter-chain; the
//! controller tracks ratification and finalizes each request exactly once
//! through the configured asset gateway.
//!
//! # Tiers
//! - **Instant**: small amounts move immediately via `InstantTransfer`
//! - **Ratified**: one ratifier approval, drawn from the ratified pool
//! - **Multi-sig**: three ratifier approvals, drawn from the multi-sig pool
//!
//! # Flow
//! 1. Operator calls `Request`, recording a pending operation at the current height
//! 2. Ratifiers call `Ratify` with the exact recipient, amount and reference
//! 3. The approval that satisfies the operation's tier finalizes it in the
//!    same transaction; otherwise anyone may call `Finalize` later
//!
//! # Security
//! - Each pool caps the value its tier may move until it is refilled
//! - Refills debit the tier above, so total capacity never grows
//! - `InvalidateAllPending` voids every outstanding request at once
//! - Emergency pause, per-operation pause and timelocked admin transfer

pub mod auth;
pub mod contract;
pub mod error;
pub mod events;
mod execute;
pub mod fee_manager;
pub mod gateway;
pub mod ledger;
pub mod msg;
pub mod policy;
pub mod pool;
mod query;
pub mod state;

pub use crate::error::ContractError;
pub use crate::fee_manager::{compute_fee, FeeConfig, FeeQuote};
pub use crate::pool::{RiskPool, Tier, TierValues};
