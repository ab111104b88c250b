// crates/soul-core/src/lib.rs
//
// soul-core: Core types, errors, and collaborator traits for the Soul reward ledger.
//
// This is the leaf crate that the rest of the workspace depends on. It defines
// account identities, authority roles, the protocol-wide error type, and the
// minimal token/authority interfaces the ledger calls into.

pub mod error;
pub mod identity;
pub mod math;
pub mod traits;

// Re-export key types for ergonomic access from downstream crates.
// Usage: `use soul_core::Address;`

// Identity types
pub use identity::{Address, Role};

// Error type
pub use error::SoulError;

// Fixed-point math
pub use math::mul_div;

// Traits
pub use traits::{read_token, write_token, Authority, FungibleToken, TokenRef};

/// Token amounts in base units (18 decimals).
pub type Amount = u128;

/// Seconds since the epoch, always supplied by the caller.
pub type Timestamp = u64;
