//! Tiered risk pools
//!
//! Each tier (instant, ratified, multi-sig) owns a pool of capacity that
//! finalized transfers consume. Refilling a pool moves capacity down from the
//! tier above it; the multi-sig pool is the top of the chain and resets to
//! its limit with no donor.
//!
//! Invariant: `available <= limit` for every pool after every operation.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::error::ContractError;

/// Authorization tier, ordered by value and required approvals
#[cw_serde]
#[derive(Copy, Eq, PartialOrd, Ord)]
pub enum Tier {
    Instant,
    Ratified,
    MultiSig,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Instant, Tier::Ratified, Tier::MultiSig];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Instant => "instant",
            Tier::Ratified => "ratified",
            Tier::MultiSig => "multi_sig",
        }
    }

    /// Tier whose pool funds this tier's refill
    pub fn donor(&self) -> Option<Tier> {
        match self {
            Tier::Instant => Some(Tier::Ratified),
            Tier::Ratified => Some(Tier::MultiSig),
            Tier::MultiSig => None,
        }
    }

    /// Ratifications needed before an operation in this tier can finalize
    pub fn required_approvals(&self) -> u32 {
        match self {
            Tier::Instant => 0,
            Tier::Ratified => 1,
            Tier::MultiSig => 3,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One value per tier (used for both thresholds and limits)
#[cw_serde]
#[derive(Copy, Eq)]
pub struct TierValues {
    pub instant: Uint128,
    pub ratified: Uint128,
    pub multi_sig: Uint128,
}

impl TierValues {
    pub fn new(instant: u128, ratified: u128, multi_sig: u128) -> Self {
        Self {
            instant: Uint128::new(instant),
            ratified: Uint128::new(ratified),
            multi_sig: Uint128::new(multi_sig),
        }
    }

    pub fn get(&self, tier: Tier) -> Uint128 {
        match tier {
            Tier::Instant => self.instant,
            Tier::Ratified => self.ratified,
            Tier::MultiSig => self.multi_sig,
        }
    }

    /// True when instant < ratified < multi_sig
    pub fn is_strictly_ascending(&self) -> bool {
        self.instant < self.ratified && self.ratified < self.multi_sig
    }
}

/// Capacity tracker for a single tier
#[cw_serde]
#[derive(Copy, Eq)]
pub struct RiskPool {
    pub limit: Uint128,
    pub available: Uint128,
}

impl RiskPool {
    /// A pool starts full
    pub fn full(limit: Uint128) -> Self {
        Self {
            limit,
            available: limit,
        }
    }

    /// Deduct `amount` if it fits, otherwise leave the pool untouched.
    pub fn try_reserve(&mut self, amount: Uint128) -> bool {
        if amount > self.available {
            return false;
        }
        self.available -= amount;
        true
    }

    /// Capacity missing from the pool right now
    pub fn shortfall(&self) -> Uint128 {
        self.limit.saturating_sub(self.available)
    }

    /// Lower or raise the limit, clamping `available` down if it no longer fits.
    pub fn set_limit(&mut self, new_limit: Uint128) {
        self.limit = new_limit;
        if self.available > new_limit {
            self.available = new_limit;
        }
    }
}

/// The three pools of a controller, persisted as one item so a refill that
/// touches two tiers is written in a single save.
#[cw_serde]
#[derive(Copy, Eq)]
pub struct RiskPools {
    pub instant: RiskPool,
    pub ratified: RiskPool,
    pub multi_sig: RiskPool,
}

impl RiskPools {
    pub fn from_limits(limits: &TierValues) -> Self {
        Self {
            instant: RiskPool::full(limits.instant),
            ratified: RiskPool::full(limits.ratified),
            multi_sig: RiskPool::full(limits.multi_sig),
        }
    }

    pub fn get(&self, tier: Tier) -> &RiskPool {
        match tier {
            Tier::Instant => &self.instant,
            Tier::Ratified => &self.ratified,
            Tier::MultiSig => &self.multi_sig,
        }
    }

    pub fn get_mut(&mut self, tier: Tier) -> &mut RiskPool {
        match tier {
            Tier::Instant => &mut self.instant,
            Tier::Ratified => &mut self.ratified,
            Tier::MultiSig => &mut self.multi_sig,
        }
    }

    /// Restore `tier` to its limit, debiting its donor by the shortfall.
    ///
    /// The shortfall is computed once, before either pool is touched. If the
    /// donor cannot cover it, nothing changes. Returns the refilled amount.
    pub fn refill(&mut self, tier: Tier) -> Result<Uint128, ContractError> {
        let needed = self.get(tier).shortfall();

        if let Some(donor_tier) = tier.donor() {
            let donor = self.get_mut(donor_tier);
            if donor.available < needed {
                return Err(ContractError::InsufficientDonorCapacity {
                    tier,
                    needed,
                    available: donor.available,
                });
            }
            donor.available = donor.available.checked_sub(needed)?;
        }

        let pool = self.get_mut(tier);
        pool.available = pool.limit;
        Ok(needed)
    }

    /// Apply new limits to every pool
    pub fn set_limits(&mut self, limits: &TierValues) {
        for tier in Tier::ALL {
            self.get_mut(tier).set_limit(limits.get(tier));
        }
    }

    #[cfg(test)]
    pub fn is_consistent(&self) -> bool {
        Tier::ALL
            .iter()
            .all(|tier| self.get(*tier).available <= self.get(*tier).limit)
    }
}
