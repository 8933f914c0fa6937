//! Events watched by off-chain monitors
//!
//! Attribute keys and payloads are part of the monitoring contract and must
//! not change. CosmWasm prefixes custom event types with `wasm-`.

use cosmwasm_std::{Addr, Event, Uint128};

use crate::pool::{Tier, TierValues};

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    Requested {
        to: Addr,
        amount: Uint128,
        reference: String,
        index: u64,
    },
    Ratified {
        index: u64,
        approver: Addr,
    },
    Finalized {
        to: Addr,
        net_amount: Uint128,
        reference: String,
        index: u64,
    },
    Revoked {
        index: u64,
    },
    InstantTransfer {
        to: Addr,
        net_amount: Uint128,
        reference: String,
    },
    FeePaid {
        treasury: Addr,
        fee: Uint128,
    },
    PoolRefilled {
        tier: Tier,
        amount: Uint128,
    },
    ThresholdsChanged(TierValues),
    LimitsChanged(TierValues),
}

impl BridgeEvent {
    pub fn name(&self) -> &'static str {
        match self {
            BridgeEvent::Requested { .. } => "requested",
            BridgeEvent::Ratified { .. } => "ratified",
            BridgeEvent::Finalized { .. } => "finalized",
            BridgeEvent::Revoked { .. } => "revoked",
            BridgeEvent::InstantTransfer { .. } => "instant_transfer",
            BridgeEvent::FeePaid { .. } => "fee_paid",
            BridgeEvent::PoolRefilled { .. } => "pool_refilled",
            BridgeEvent::ThresholdsChanged(_) => "thresholds_changed",
            BridgeEvent::LimitsChanged(_) => "limits_changed",
        }
    }
}

fn tier_values(event: Event, values: &TierValues) -> Event {
    event
        .add_attribute("instant", values.instant)
        .add_attribute("ratified", values.ratified)
        .add_attribute("multi_sig", values.multi_sig)
}

impl From<BridgeEvent> for Event {
    fn from(event: BridgeEvent) -> Self {
        let base = Event::new(event.name());
        match event {
            BridgeEvent::Requested {
                to,
                amount,
                reference,
                index,
            } => base
                .add_attribute("to", to)
                .add_attribute("amount", amount)
                .add_attribute("reference", reference)
                .add_attribute("index", index.to_string()),
            BridgeEvent::Ratified { index, approver } => base
                .add_attribute("index", index.to_string())
                .add_attribute("approver", approver),
            BridgeEvent::Finalized {
                to,
                net_amount,
                reference,
                index,
            } => base
                .add_attribute("to", to)
                .add_attribute("net_amount", net_amount)
                .add_attribute("reference", reference)
                .add_attribute("index", index.to_string()),
            BridgeEvent::Revoked { index } => base.add_attribute("index", index.to_string()),
            BridgeEvent::InstantTransfer {
                to,
                net_amount,
                reference,
            } => base
                .add_attribute("to", to)
                .add_attribute("net_amount", net_amount)
                .add_attribute("reference", reference),
            BridgeEvent::FeePaid { treasury, fee } => base
                .add_attribute("treasury", treasury)
                .add_attribute("fee", fee),
            BridgeEvent::PoolRefilled { tier, amount } => base
                .add_attribute("tier", tier.as_str())
                .add_attribute("amount", amount),
            BridgeEvent::ThresholdsChanged(values) => tier_values(base, &values),
            BridgeEvent::LimitsChanged(values) => tier_values(base, &values),
        }
    }
}
