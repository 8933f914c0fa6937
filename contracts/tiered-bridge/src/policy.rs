//! Tiered approval policy
//!
//! Thresholds decide which tier an amount belongs to; limits cap each
//! tier's pool. Tier resolution is evaluated against the pools' *current*
//! availability, so a drained ratified pool pushes even small operations up
//! to the multi-sig tier.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::Uint128;

use crate::error::ContractError;
use crate::ledger::Operation;
use crate::pool::{RiskPools, Tier, TierValues};

/// Thresholds and limits for the three tiers
#[cw_serde]
#[derive(Copy, Eq)]
pub struct Policy {
    pub thresholds: TierValues,
    pub limits: TierValues,
}

impl Policy {
    pub fn new(thresholds: TierValues, limits: TierValues) -> Result<Self, ContractError> {
        validate_limits(&limits)?;
        validate_thresholds(&thresholds, &limits)?;
        Ok(Self { thresholds, limits })
    }

    /// Replace thresholds after checking them against the current limits
    pub fn set_thresholds(&mut self, thresholds: TierValues) -> Result<(), ContractError> {
        validate_thresholds(&thresholds, &self.limits)?;
        self.thresholds = thresholds;
        Ok(())
    }

    /// Replace limits after checking them against the current thresholds
    pub fn set_limits(&mut self, limits: TierValues) -> Result<(), ContractError> {
        validate_limits(&limits)?;
        for tier in Tier::ALL {
            if limits.get(tier) < self.thresholds.get(tier) {
                return Err(ContractError::InvalidLimits {
                    reason: format!(
                        "{} limit {} is below its threshold {}",
                        tier,
                        limits.get(tier),
                        self.thresholds.get(tier)
                    ),
                });
            }
        }
        self.limits = limits;
        Ok(())
    }

    /// Tier that authorizes `amount` with `approvals` ratifications, if any.
    ///
    /// Evaluated in ascending order; the first tier whose pool can cover the
    /// amount, whose threshold admits it and whose approval count is met wins.
    pub fn resolve_tier(&self, pools: &RiskPools, approvals: u32, amount: Uint128) -> Option<Tier> {
        [Tier::Ratified, Tier::MultiSig].into_iter().find(|tier| {
            amount <= pools.get(*tier).available
                && amount <= self.thresholds.get(*tier)
                && approvals >= tier.required_approvals()
        })
    }

    pub fn has_enough_approval(
        &self,
        pools: &RiskPools,
        approvals: u32,
        amount: Uint128,
        is_admin: bool,
    ) -> bool {
        self.resolve_tier(pools, approvals, amount).is_some() || is_admin
    }

    /// Fail with the first reason `op` cannot be finalized right now.
    ///
    /// The watermark and the pause flag bind every caller; only the approval
    /// gate is waived for the admin.
    pub fn assert_can_finalize(
        &self,
        pools: &RiskPools,
        index: u64,
        op: &Operation,
        watermark: u64,
        is_admin: bool,
    ) -> Result<(), ContractError> {
        if op.requested_at <= watermark {
            return Err(ContractError::InvalidOperation { index, watermark });
        }
        if op.paused {
            return Err(ContractError::OperationPaused { index });
        }
        if !self.has_enough_approval(pools, op.approval_count(), op.amount, is_admin) {
            return Err(ContractError::NotEnoughApprovals {
                index,
                approvals: op.approval_count(),
            });
        }
        Ok(())
    }

    pub fn can_finalize(
        &self,
        pools: &RiskPools,
        index: u64,
        op: &Operation,
        watermark: u64,
        is_admin: bool,
    ) -> bool {
        self.assert_can_finalize(pools, index, op, watermark, is_admin)
            .is_ok()
    }

    /// Debit the pool of the tier that authorizes this finalize.
    pub fn subtract_from_pool(
        &self,
        pools: &mut RiskPools,
        approvals: u32,
        amount: Uint128,
    ) -> Result<Tier, ContractError> {
        let tier = self
            .resolve_tier(pools, approvals, amount)
            .ok_or(ContractError::NoEligiblePool { amount })?;
        let pool = pools.get_mut(tier);
        if !pool.try_reserve(amount) {
            return Err(ContractError::PoolDry {
                tier,
                available: pool.available,
                requested: amount,
            });
        }
        Ok(tier)
    }
}

fn validate_limits(limits: &TierValues) -> Result<(), ContractError> {
    if limits.instant.is_zero() {
        return Err(ContractError::InvalidLimits {
            reason: "limits must be greater than zero".to_string(),
        });
    }
    if !limits.is_strictly_ascending() {
        return Err(ContractError::InvalidLimits {
            reason: "limits must be strictly ascending (instant < ratified < multi_sig)"
                .to_string(),
        });
    }
    Ok(())
}

fn validate_thresholds(thresholds: &TierValues, limits: &TierValues) -> Result<(), ContractError> {
    if thresholds.instant.is_zero() {
        return Err(ContractError::InvalidThresholds {
            reason: "thresholds must be greater than zero".to_string(),
        });
    }
    if !thresholds.is_strictly_ascending() {
        return Err(ContractError::InvalidThresholds {
            reason: "thresholds must be strictly ascending (instant < ratified < multi_sig)"
                .to_string(),
        });
    }
    for tier in Tier::ALL {
        if thresholds.get(tier) > limits.get(tier) {
            return Err(ContractError::InvalidThresholds {
                reason: format!(
                    "{} threshold {} exceeds its limit {}",
                    tier,
                    thresholds.get(tier),
                    limits.get(tier)
                ),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy() -> Policy {
        Policy::new(
            TierValues::new(1_000, 10_000, 100_000),
            TierValues::new(10_000, 100_000, 1_000_000),
        )
        .unwrap()
    }

    fn amount(value: u128) -> Uint128 {
        Uint128::new(value)
    }

    #[test]
    fn test_set_thresholds_validates_against_limits() {
        let mut policy = policy();

        let err = policy
            .set_thresholds(TierValues::new(5_000, 5_000, 100_000))
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidThresholds { .. }));

        let err = policy
            .set_thresholds(TierValues::new(1_000, 200_000, 300_000))
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidThresholds { .. }));
        assert_eq!(policy.thresholds, TierValues::new(1_000, 10_000, 100_000));

        policy
            .set_thresholds(TierValues::new(2_000, 20_000, 200_000))
            .unwrap();
        assert_eq!(policy.thresholds.instant, amount(2_000));
    }

    #[test]
    fn test_new_rejects_unordered_values() {
        let err = Policy::new(
            TierValues::new(1_000, 1_000, 100_000),
            TierValues::new(10_000, 100_000, 1_000_000),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidThresholds { .. }));

        let err = Policy::new(
            TierValues::new(1_000, 10_000, 100_000),
            TierValues::new(10_000, 1_000_000, 1_000_000),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidLimits { .. }));

        // threshold above its limit
        let err = Policy::new(
            TierValues::new(20_000, 30_000, 100_000),
            TierValues::new(10_000, 100_000, 1_000_000),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidThresholds { .. }));
    }

    #[test]
    fn test_set_limits_below_threshold_rejected() {
        let mut policy = policy();
        let err = policy
            .set_limits(TierValues::new(500, 100_000, 1_000_000))
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidLimits { .. }));
        assert_eq!(policy.limits, TierValues::new(10_000, 100_000, 1_000_000));
    }

    #[test]
    fn test_resolve_tier_by_amount() {
        let policy = policy();
        let pools = RiskPools::from_limits(&policy.limits);

        assert_eq!(
            policy.resolve_tier(&pools, 1, amount(5_000)),
            Some(Tier::Ratified)
        );
        // Above the ratified threshold: needs three approvals
        assert_eq!(policy.resolve_tier(&pools, 1, amount(50_000)), None);
        assert_eq!(policy.resolve_tier(&pools, 2, amount(50_000)), None);
        assert_eq!(
            policy.resolve_tier(&pools, 3, amount(50_000)),
            Some(Tier::MultiSig)
        );
        // Above every threshold
        assert_eq!(policy.resolve_tier(&pools, 10, amount(100_001)), None);
        // No approvals never resolves
        assert_eq!(policy.resolve_tier(&pools, 0, amount(1)), None);
    }

    #[test]
    fn test_drained_ratified_pool_retiers_small_amounts() {
        let policy = policy();
        let mut pools = RiskPools::from_limits(&policy.limits);
        assert!(pools.ratified.try_reserve(amount(97_000)));

        // 5_000 is below the ratified threshold but the pool only has 3_000
        assert_eq!(policy.resolve_tier(&pools, 1, amount(5_000)), None);
        assert_eq!(
            policy.resolve_tier(&pools, 3, amount(5_000)),
            Some(Tier::MultiSig)
        );
        assert!(!policy.has_enough_approval(&pools, 2, amount(5_000), false));
        assert!(policy.has_enough_approval(&pools, 2, amount(5_000), true));
    }

    #[test]
    fn test_required_approvals_never_undercut() {
        let policy = policy();
        let mut pools = RiskPools::from_limits(&policy.limits);
        pools.ratified.available = amount(4_000);

        for value in [1u128, 3_999, 4_000, 4_001, 10_000, 60_000, 100_000] {
            for approvals in 0..5u32 {
                if let Some(tier) = policy.resolve_tier(&pools, approvals, amount(value)) {
                    assert!(approvals >= tier.required_approvals());
                    assert!(amount(value) <= pools.get(tier).available);
                }
            }
        }
    }

    fn pending(value: u128, requested_at: u64, approvers: &[&str]) -> Operation {
        let mut op = Operation::new(
            cosmwasm_std::Addr::unchecked("recipient"),
            amount(value),
            "ab".repeat(32),
            requested_at,
        );
        for approver in approvers {
            op.approve(&cosmwasm_std::Addr::unchecked(*approver)).unwrap();
        }
        op
    }

    #[test]
    fn test_assert_can_finalize_reports_each_reason() {
        let policy = policy();
        let pools = RiskPools::from_limits(&policy.limits);

        let op = pending(5_000, 10, &["r1"]);
        assert!(policy.can_finalize(&pools, 0, &op, 9, false));

        // at the watermark counts as invalidated
        assert_eq!(
            policy.assert_can_finalize(&pools, 0, &op, 10, true),
            Err(ContractError::InvalidOperation {
                index: 0,
                watermark: 10
            })
        );

        let mut paused = op.clone();
        paused.paused = true;
        assert_eq!(
            policy.assert_can_finalize(&pools, 0, &paused, 0, true),
            Err(ContractError::OperationPaused { index: 0 })
        );

        let large = pending(50_000, 10, &["r1", "r2"]);
        assert_eq!(
            policy.assert_can_finalize(&pools, 3, &large, 0, false),
            Err(ContractError::NotEnoughApprovals {
                index: 3,
                approvals: 2
            })
        );
        assert!(policy.can_finalize(&pools, 3, &large, 0, true));
    }

    #[test]
    fn test_subtract_from_pool_debits_resolved_tier() {
        let policy = policy();
        let mut pools = RiskPools::from_limits(&policy.limits);

        let tier = policy
            .subtract_from_pool(&mut pools, 1, amount(5_000))
            .unwrap();
        assert_eq!(tier, Tier::Ratified);
        assert_eq!(pools.ratified.available, amount(95_000));

        let tier = policy
            .subtract_from_pool(&mut pools, 3, amount(60_000))
            .unwrap();
        assert_eq!(tier, Tier::MultiSig);
        assert_eq!(pools.multi_sig.available, amount(940_000));

        let before = pools;
        let err = policy
            .subtract_from_pool(&mut pools, 1, amount(60_000))
            .unwrap_err();
        assert_eq!(
            err,
            ContractError::NoEligiblePool {
                amount: amount(60_000)
            }
        );
        assert_eq!(pools, before);
    }
}
