//! Capability layer
//!
//! Every entry point declares the [`Action`] it performs; [`authorize`]
//! resolves the sender's roles and checks them against the action's allowed
//! roles before any business logic runs. The admin holds every role.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage};

use crate::error::ContractError;
use crate::state::{CONFIG, OPERATORS, RATIFIERS};

#[cw_serde]
#[derive(Copy, Eq)]
pub enum Role {
    Admin,
    Operator,
    Ratifier,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Operator => "operator",
            Role::Ratifier => "ratifier",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const OPERATOR_OR_ADMIN: &[Role] = &[Role::Operator, Role::Admin];
const RATIFIER_OR_ADMIN: &[Role] = &[Role::Ratifier, Role::Admin];
const ADMIN_ONLY: &[Role] = &[Role::Admin];

/// Operations gated by the capability layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Request,
    InstantTransfer,
    Ratify,
    Finalize,
    Revoke,
    PauseOperation,
    InvalidateAllPending,
    RefillInstantPool,
    RefillRatifiedPool,
    RefillMultiSigPool,
    ConfigurePolicy,
    ConfigureFees,
    ManageRoles,
    PauseBridge,
    TransferAdmin,
    GatewayAdmin,
}

impl Action {
    /// Roles allowed to perform the action. `None` means anyone.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            Action::Finalize => None,
            Action::Request | Action::InstantTransfer | Action::Revoke => Some(OPERATOR_OR_ADMIN),
            Action::Ratify | Action::RefillInstantPool | Action::RefillRatifiedPool => {
                Some(RATIFIER_OR_ADMIN)
            }
            Action::PauseOperation
            | Action::InvalidateAllPending
            | Action::RefillMultiSigPool
            | Action::ConfigurePolicy
            | Action::ConfigureFees
            | Action::ManageRoles
            | Action::PauseBridge
            | Action::TransferAdmin
            | Action::GatewayAdmin => Some(ADMIN_ONLY),
        }
    }
}

/// Roles held by one address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RoleSet {
    pub admin: bool,
    pub operator: bool,
    pub ratifier: bool,
}

impl RoleSet {
    pub fn holds(&self, role: Role) -> bool {
        match role {
            Role::Admin => self.admin,
            Role::Operator => self.operator || self.admin,
            Role::Ratifier => self.ratifier || self.admin,
        }
    }

    pub fn permits(&self, action: Action) -> bool {
        match action.allowed_roles() {
            None => true,
            Some(roles) => roles.iter().any(|role| self.holds(*role)),
        }
    }

    pub fn names(&self) -> Vec<String> {
        [
            (self.admin, Role::Admin),
            (self.operator, Role::Operator),
            (self.ratifier, Role::Ratifier),
        ]
        .into_iter()
        .filter(|(held, _)| *held)
        .map(|(_, role)| role.to_string())
        .collect()
    }
}

/// An authorized sender and the roles it was resolved with
#[derive(Debug, Clone)]
pub struct Caller {
    pub address: Addr,
    pub roles: RoleSet,
}

impl Caller {
    pub fn is_admin(&self) -> bool {
        self.roles.admin
    }
}

/// Look up every role `address` holds
pub fn load_roles(storage: &dyn Storage, address: &Addr) -> StdResult<RoleSet> {
    let config = CONFIG.load(storage)?;
    Ok(RoleSet {
        admin: *address == config.admin,
        operator: OPERATORS.may_load(storage, address)?.unwrap_or(false),
        ratifier: RATIFIERS.may_load(storage, address)?.unwrap_or(false),
    })
}

/// Check that `sender` may perform `action`
pub fn authorize(
    storage: &dyn Storage,
    sender: &Addr,
    action: Action,
) -> Result<Caller, ContractError> {
    let roles = load_roles(storage, sender)?;
    if !roles.permits(action) {
        return Err(ContractError::Unauthorized);
    }
    Ok(Caller {
        address: sender.clone(),
        roles,
    })
}
