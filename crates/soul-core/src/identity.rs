// crates/soul-core/src/identity.rs

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A 32-byte account identity.
///
/// Users, payout accounts (dao, team, vault treasury), and the ledger, vault,
/// and token accounts themselves are all addressed this way.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Address(pub [u8; 32]);

impl Address {
    /// The all-zero address. Never a valid payout destination.
    pub const ZERO: Address = Address([0u8; 32]);

    /// Derive a deterministic address from a human-readable label.
    ///
    /// `Address::derive("dao")` always yields the same 32 bytes (SHA-256 of
    /// the label), which keeps configs and tests readable.
    pub fn derive(label: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"soul:address:");
        hasher.update(label.as_bytes());
        let digest = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&digest);
        Address(bytes)
    }

    /// Parse a `0x`-prefixed (or bare) 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, crate::SoulError> {
        let trimmed = s.strip_prefix("0x").unwrap_or(s);
        let decoded = hex::decode(trimmed)
            .map_err(|e| crate::SoulError::InvalidParameter(format!("bad address hex: {}", e)))?;
        let bytes: [u8; 32] = decoded.try_into().map_err(|_| {
            crate::SoulError::InvalidParameter("address must be exactly 32 bytes".to_string())
        })?;
        Ok(Address(bytes))
    }

    /// Returns `true` for the zero address.
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Short form keeps log lines readable.
        write!(f, "0x{}..", hex::encode(&self.0[..4]))
    }
}

/// Authority roles checked synchronously by tokens and ledgers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Governs the holder: grants roles, changes parameters.
    Admin,
    /// May mint and burn the reward token.
    Minter,
    /// May mint and burn the receipt token.
    Operator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "Admin"),
            Role::Minter => write!(f, "Minter"),
            Role::Operator => write!(f, "Operator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_is_deterministic() {
        assert_eq!(Address::derive("dao"), Address::derive("dao"));
        assert_ne!(Address::derive("dao"), Address::derive("team"));
        assert!(!Address::derive("dao").is_zero());
    }

    #[test]
    fn test_hex_roundtrip() {
        let addr = Address::derive("alice");
        let parsed = Address::from_hex(&addr.to_string()).unwrap();
        assert_eq!(parsed, addr);
    }

    #[test]
    fn test_from_hex_rejects_short() {
        assert!(Address::from_hex("0xdeadbeef").is_err());
        assert!(Address::from_hex("zz").is_err());
    }
}
