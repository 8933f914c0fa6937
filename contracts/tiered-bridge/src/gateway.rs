//! Asset gateway boundary
//!
//! The controller never holds balances itself. Once an operation is
//! authorized it dispatches exactly one movement message to the gateway:
//! a CW20 `Mint` on the stablecoin (mint mode) or a `Withdraw` on the
//! custody vault (release mode). Fees go to the treasury the same way.

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{to_json_binary, Addr, CosmosMsg, StdResult, Uint128, WasmMsg};
use cw20::Cw20ExecuteMsg;

use crate::state::{Config, GatewayMode};

/// Withdraw interface of the custody vault
#[cw_serde]
pub enum VaultExecuteMsg {
    Withdraw { recipient: String, amount: Uint128 },
}

/// Administrative surface of the token/vault, passed through by the admin
#[cw_serde]
pub enum GatewayAdminMsg {
    Pause {},
    Unpause {},
    Blacklist { account: String },
    Unblacklist { account: String },
    TransferOwnership { new_owner: String },
    ClaimOwnership {},
}

impl GatewayAdminMsg {
    pub fn action(&self) -> &'static str {
        match self {
            GatewayAdminMsg::Pause {} => "gateway_pause",
            GatewayAdminMsg::Unpause {} => "gateway_unpause",
            GatewayAdminMsg::Blacklist { .. } => "gateway_blacklist",
            GatewayAdminMsg::Unblacklist { .. } => "gateway_unblacklist",
            GatewayAdminMsg::TransferOwnership { .. } => "transfer_gateway_ownership",
            GatewayAdminMsg::ClaimOwnership {} => "claim_gateway_ownership",
        }
    }
}

/// Message builder for the configured gateway
pub struct AssetGateway {
    contract: Addr,
    mode: GatewayMode,
}

impl AssetGateway {
    pub fn new(contract: Addr, mode: GatewayMode) -> Self {
        Self { contract, mode }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.gateway.clone(), config.mode)
    }

    /// Move `amount` to `recipient` according to the gateway mode
    pub fn transfer(&self, recipient: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
        match self.mode {
            GatewayMode::Mint => self.mint(recipient, amount),
            GatewayMode::Release => self.release(recipient, amount),
        }
    }

    pub fn mint(&self, recipient: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
        self.execute(&Cw20ExecuteMsg::Mint {
            recipient: recipient.to_string(),
            amount,
        })
    }

    pub fn release(&self, recipient: &Addr, amount: Uint128) -> StdResult<CosmosMsg> {
        self.execute(&VaultExecuteMsg::Withdraw {
            recipient: recipient.to_string(),
            amount,
        })
    }

    pub fn admin(&self, msg: &GatewayAdminMsg) -> StdResult<CosmosMsg> {
        self.execute(msg)
    }

    fn execute<T: serde::Serialize>(&self, msg: &T) -> StdResult<CosmosMsg> {
        Ok(CosmosMsg::Wasm(WasmMsg::Execute {
            contract_addr: self.contract.to_string(),
            msg: to_json_binary(msg)?,
            funds: vec![],
        }))
    }
}
