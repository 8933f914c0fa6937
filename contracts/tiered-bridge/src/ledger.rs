//! Operation ledger
//!
//! Pending mint/withdraw requests are stored under a monotonically increasing
//! index. Finalizing or revoking an operation closes its slot in place: the
//! index stays addressable, is never reused, and reports how it was closed.

use std::fmt;

use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, Order, StdResult, Storage, Uint128};
use cw_storage_plus::{Bound, Item, Map};

use crate::error::ContractError;

/// A pending transfer request.
///
/// `recipient`, `amount` and `reference` never change after creation.
#[cw_serde]
pub struct Operation {
    /// Account that receives the asset on this chain
    pub recipient: Addr,
    /// Amount in the token's minor units (6 decimals)
    pub amount: Uint128,
    /// Counter-chain transaction hash that justifies the transfer
    pub reference: String,
    /// Block height at which the request was recorded
    pub requested_at: u64,
    /// Distinct ratifiers, in approval order
    pub approvers: Vec<Addr>,
    /// A paused operation cannot be finalized
    pub paused: bool,
}

impl Operation {
    pub fn new(recipient: Addr, amount: Uint128, reference: String, requested_at: u64) -> Self {
        Self {
            recipient,
            amount,
            reference,
            requested_at,
            approvers: vec![],
            paused: false,
        }
    }

    pub fn approval_count(&self) -> u32 {
        self.approvers.len() as u32
    }

    pub fn has_approved(&self, approver: &Addr) -> bool {
        self.approvers.contains(approver)
    }

    /// Record `approver`'s ratification and return the new count.
    pub fn approve(&mut self, approver: &Addr) -> Result<u32, ContractError> {
        if self.has_approved(approver) {
            return Err(ContractError::AlreadyApproved {
                approver: approver.to_string(),
            });
        }
        self.approvers.push(approver.clone());
        Ok(self.approval_count())
    }
}

/// Lifecycle of a ledger slot
#[cw_serde]
pub enum OperationSlot {
    Pending(Operation),
    Finalized,
    Revoked,
}

impl OperationSlot {
    pub fn status(&self) -> SlotStatus {
        match self {
            OperationSlot::Pending(_) => SlotStatus::Pending,
            OperationSlot::Finalized => SlotStatus::Finalized,
            OperationSlot::Revoked => SlotStatus::Revoked,
        }
    }
}

#[cw_serde]
#[derive(Copy, Eq)]
pub enum SlotStatus {
    Pending,
    Finalized,
    Revoked,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotStatus::Pending => "pending",
            SlotStatus::Finalized => "finalized",
            SlotStatus::Revoked => "revoked",
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Number of operations ever appended
const OPERATION_COUNT: Item<u64> = Item::new("operation_count");

/// Ledger slots
/// Key: operation index, Value: OperationSlot
const OPERATIONS: Map<u64, OperationSlot> = Map::new("operations");

/// Default page size for pending operation listings
const DEFAULT_PAGE_LIMIT: u32 = 10;
const MAX_PAGE_LIMIT: u32 = 50;

/// Storage-backed ledger of transfer requests
pub struct OperationLedger;

impl OperationLedger {
    pub fn count(storage: &dyn Storage) -> StdResult<u64> {
        Ok(OPERATION_COUNT.may_load(storage)?.unwrap_or_default())
    }

    /// Store `op` at the next index and return that index.
    pub fn append(storage: &mut dyn Storage, op: Operation) -> StdResult<u64> {
        let index = Self::count(storage)?;
        OPERATIONS.save(storage, index, &OperationSlot::Pending(op))?;
        OPERATION_COUNT.save(storage, &(index + 1))?;
        Ok(index)
    }

    /// Load the raw slot at `index`
    pub fn slot(storage: &dyn Storage, index: u64) -> Result<OperationSlot, ContractError> {
        if index >= Self::count(storage)? {
            return Err(ContractError::OperationNotFound { index });
        }
        OPERATIONS
            .may_load(storage, index)?
            .ok_or(ContractError::OperationNotFound { index })
    }

    /// Load a pending operation, failing on closed or unknown slots
    pub fn get(storage: &dyn Storage, index: u64) -> Result<Operation, ContractError> {
        match Self::slot(storage, index)? {
            OperationSlot::Pending(op) => Ok(op),
            closed => Err(ContractError::OperationClosed {
                index,
                status: closed.status(),
            }),
        }
    }

    /// Overwrite a pending operation
    pub fn update(
        storage: &mut dyn Storage,
        index: u64,
        op: &Operation,
    ) -> Result<(), ContractError> {
        // Only a pending slot may be rewritten
        Self::get(storage, index)?;
        OPERATIONS.save(storage, index, &OperationSlot::Pending(op.clone()))?;
        Ok(())
    }

    /// Close a pending slot as finalized and return its operation
    pub fn finalize(storage: &mut dyn Storage, index: u64) -> Result<Operation, ContractError> {
        Self::tombstone(storage, index, OperationSlot::Finalized)
    }

    /// Close a pending slot as revoked and return its operation
    pub fn revoke(storage: &mut dyn Storage, index: u64) -> Result<Operation, ContractError> {
        Self::tombstone(storage, index, OperationSlot::Revoked)
    }

    fn tombstone(
        storage: &mut dyn Storage,
        index: u64,
        closed: OperationSlot,
    ) -> Result<Operation, ContractError> {
        let op = Self::get(storage, index)?;
        OPERATIONS.save(storage, index, &closed)?;
        Ok(op)
    }

    /// Page through pending operations in index order
    pub fn pending(
        storage: &dyn Storage,
        start_after: Option<u64>,
        limit: Option<u32>,
    ) -> StdResult<Vec<(u64, Operation)>> {
        let limit = limit.unwrap_or(DEFAULT_PAGE_LIMIT).min(MAX_PAGE_LIMIT) as usize;
        let start = start_after.map(Bound::exclusive);

        OPERATIONS
            .range(storage, start, None, Order::Ascending)
            .filter_map(|item| match item {
                Ok((index, OperationSlot::Pending(op))) => Some(Ok((index, op))),
                Ok(_) => None,
                Err(e) => Some(Err(e)),
            })
            .take(limit)
            .collect()
    }
}
