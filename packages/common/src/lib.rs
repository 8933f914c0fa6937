//! Common - Shared Types and Utilities for the Tiered Bridge Contracts
//!
//! This package provides the proof-format contracts used to validate the
//! counter-chain transaction references attached to every transfer request.

pub mod reference;

pub use reference::{is_valid_reference, ReferenceFormat, TX_HASH_HEX_LEN};
