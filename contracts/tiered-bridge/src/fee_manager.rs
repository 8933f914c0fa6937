//! Fee Manager Module
//!
//! Fees are proportional to the transferred amount and expressed in
//! millionths: a rate of 1,000 is 0.1%, a rate of 1,000,000 is 100%.
//!
//! ```text
//! fee = floor(amount * rate / 1_000_000)
//! ```
//!
//! The product is computed with a 256-bit intermediate, so no amount that
//! fits in a `Uint128` can overflow before the division.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Uint128};
use cw_storage_plus::Item;

use crate::error::ContractError;

// ============================================================================
// Constants
// ============================================================================

/// Rate denominator (1,000,000 = 100%)
pub const FEE_RATE_DENOMINATOR: u64 = 1_000_000;

/// Highest accepted rate (100%)
pub const MAX_FEE_RATE: u64 = FEE_RATE_DENOMINATOR;

// ============================================================================
// Data Structures
// ============================================================================

/// Fee configuration parameters
#[cw_serde]
pub struct FeeConfig {
    /// Fee rate in millionths of the amount
    pub rate: u64,
    /// Address receiving collected fees (required while `rate > 0`)
    pub treasury: Option<Addr>,
}

impl FeeConfig {
    pub fn new(rate: u64, treasury: Option<Addr>) -> Result<Self, ContractError> {
        let config = Self { rate, treasury };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ContractError> {
        if self.rate > MAX_FEE_RATE {
            return Err(ContractError::InvalidFeeRate {
                rate: self.rate,
                max: MAX_FEE_RATE,
            });
        }
        if self.rate != 0 && self.treasury.is_none() {
            return Err(ContractError::TreasuryNotSet);
        }
        Ok(())
    }

    /// Change the rate, keeping the treasury invariant
    pub fn set_rate(&mut self, rate: u64) -> Result<(), ContractError> {
        Self {
            rate,
            treasury: self.treasury.clone(),
        }
        .validate()?;
        self.rate = rate;
        Ok(())
    }

    pub fn quote(&self, amount: Uint128) -> Result<FeeQuote, ContractError> {
        let fee = compute_fee(amount, self.rate)?;
        Ok(FeeQuote {
            fee,
            net: amount.checked_sub(fee)?,
        })
    }
}

/// Split of a gross amount into the recipient's share and the fee
#[cw_serde]
#[derive(Copy, Eq)]
pub struct FeeQuote {
    pub fee: Uint128,
    pub net: Uint128,
}

// ============================================================================
// Storage
// ============================================================================

/// Fee configuration storage
pub const FEE_CONFIG: Item<FeeConfig> = Item::new("fee_config");

// ============================================================================
// Fee Calculation
// ============================================================================

/// Fee owed on `amount` at `rate` millionths, floored.
pub fn compute_fee(amount: Uint128, rate: u64) -> Result<Uint128, ContractError> {
    Ok(amount.checked_multiply_ratio(rate, FEE_RATE_DENOMINATOR)?)
}
