// crates/soul-core/src/traits.rs

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use crate::error::SoulError;
use crate::identity::{Address, Role};
use crate::Amount;

/// Role-based authority over a collaborator.
///
/// Implemented by the token ledgers in soul-economics so the Summoner can be
/// the sole minter of the reward token and the sole operator of the receipt
/// token.
pub trait Authority {
    /// Grant `role` to `account`. `caller` must hold `Role::Admin`.
    fn grant_role(&mut self, caller: &Address, role: Role, account: &Address)
        -> Result<(), SoulError>;

    /// Revoke `role` from `account`. `caller` must hold `Role::Admin`.
    fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), SoulError>;

    /// Returns `true` if `account` currently holds `role`.
    fn has_role(&self, role: Role, account: &Address) -> bool;
}

/// Minimal fungible-token interface the ledger calls into.
///
/// All operations take the acting account explicitly; there is no ambient
/// "message sender".
pub trait FungibleToken: Authority {
    /// The token's own account address (also its identity in pool registries).
    fn address(&self) -> Address;

    /// Ticker symbol, used in logs.
    fn symbol(&self) -> &str;

    /// Total units in circulation.
    fn total_supply(&self) -> Amount;

    /// Balance held by `account`.
    fn balance_of(&self, account: &Address) -> Amount;

    /// Remaining amount `spender` may move on behalf of `owner`.
    fn allowance(&self, owner: &Address, spender: &Address) -> Amount;

    /// Move `amount` from `from` to `to`, acting as `from`.
    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), SoulError>;

    /// Move `amount` from `from` to `to`, acting as `spender` against its allowance.
    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), SoulError>;

    /// Set `spender`'s allowance over `owner`'s balance.
    fn approve(&mut self, owner: &Address, spender: &Address, amount: Amount)
        -> Result<(), SoulError>;

    /// Create `amount` new units for `to`. Authority-gated.
    fn mint(&mut self, caller: &Address, to: &Address, amount: Amount) -> Result<(), SoulError>;

    /// Destroy `amount` units held by `from`. Authority-gated.
    fn burn(&mut self, caller: &Address, from: &Address, amount: Amount) -> Result<(), SoulError>;
}

/// Shared handle to a token collaborator.
///
/// Several parties (the Summoner, the vault, test harnesses) hold the same
/// token, the way contracts share a token by address. Each call borrows the
/// cell only for the duration of that call.
pub type TokenRef = Rc<RefCell<dyn FungibleToken>>;

/// Borrow a token for a read-only call.
///
/// # Errors
/// Returns `SoulError::Reentrancy` if the token is mid-call.
pub fn read_token(token: &TokenRef) -> Result<Ref<'_, dyn FungibleToken + 'static>, SoulError> {
    token
        .try_borrow()
        .map_err(|_| SoulError::Reentrancy("token is busy".to_string()))
}

/// Borrow a token for a state-changing call.
///
/// # Errors
/// Returns `SoulError::Reentrancy` if the token is already borrowed.
pub fn write_token(token: &TokenRef) -> Result<RefMut<'_, dyn FungibleToken + 'static>, SoulError> {
    token
        .try_borrow_mut()
        .map_err(|_| SoulError::Reentrancy("token is busy".to_string()))
}
