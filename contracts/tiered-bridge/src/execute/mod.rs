//! Execute handlers for the tiered bridge controller.
//!
//! This module contains all execute message handlers, organized by category:
//! - `transfer` - Request, InstantTransfer, Ratify, Finalize, Revoke and per-operation pause
//! - `pools` - Refill handlers for the three risk pools
//! - `config` - Thresholds, limits, fees and role management
//! - `admin` - Pause, invalidation, admin transfer and gateway passthrough

mod admin;
mod config;
mod pools;
mod transfer;

pub use admin::*;
pub use config::*;
pub use pools::*;
pub use transfer::*;

use crate::error::ContractError;
use crate::state::Config;

/// Reject transfer-flow calls while the bridge is paused.
pub(crate) fn ensure_not_paused(config: &Config) -> Result<(), ContractError> {
    if config.paused {
        return Err(ContractError::BridgePaused);
    }
    Ok(())
}
