//! Counter-chain transaction reference validation
//!
//! Every mint or withdraw request carries the hash of the counter-chain
//! transaction that justifies it. The hash is opaque to the bridge, but its
//! shape is fixed per counter-chain:
//!
//! | Format        | Example                     | Length |
//! |---------------|-----------------------------|--------|
//! | `HexPrefixed` | `0x` + 64 hex chars (EVM)   | 66     |
//! | `HexBare`     | 64 hex chars (Tron, Cosmos) | 64     |
//!
//! Validators are pure and total: any input string yields `true` or `false`.

use cosmwasm_schema::cw_serde;

/// Number of hex characters in a 32-byte transaction hash
pub const TX_HASH_HEX_LEN: usize = 64;

const HEX_PREFIX: &str = "0x";

/// Shape of a counter-chain transaction reference
#[cw_serde]
#[derive(Copy, Eq)]
pub enum ReferenceFormat {
    /// `0x`-prefixed 32-byte hex hash
    HexPrefixed,
    /// Bare 32-byte hex hash, no prefix allowed
    HexBare,
}

impl ReferenceFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReferenceFormat::HexPrefixed => "hex_prefixed",
            ReferenceFormat::HexBare => "hex_bare",
        }
    }

    /// Total string length of a well-formed reference
    pub fn expected_len(&self) -> usize {
        match self {
            ReferenceFormat::HexPrefixed => HEX_PREFIX.len() + TX_HASH_HEX_LEN,
            ReferenceFormat::HexBare => TX_HASH_HEX_LEN,
        }
    }

    /// Check a reference against this format
    pub fn is_valid(&self, reference: &str) -> bool {
        if reference.len() != self.expected_len() {
            return false;
        }
        let digits = match self {
            ReferenceFormat::HexPrefixed => match reference.strip_prefix(HEX_PREFIX) {
                Some(rest) => rest,
                None => return false,
            },
            ReferenceFormat::HexBare => reference,
        };
        // hex::decode accepts both cases, which matches explorer output
        hex::decode(digits).is_ok()
    }
}

/// Validate `reference` against `format`
pub fn is_valid_reference(format: ReferenceFormat, reference: &str) -> bool {
    format.is_valid(reference)
}
