// crates/soul-economics/src/token.rs
//
// Fungible token ledgers and unit constants.
//
// The smallest unit of every token is the "wei": 1 token = 10^18 wei. All
// internal accounting is integer wei to avoid floating-point drift.
//
// Two ledgers are built from the same `TokenLedger` type:
//   - SOUL (reward token): mint/burn gated by `Role::Minter`.
//   - SEANCE (receipt token): mint/burn gated by `Role::Operator`, issued
//     1:1 against SOUL staked in pool 0.
// Liquidity-pool deposit tokens are plain `TokenLedger`s as well.

use std::collections::{HashMap, HashSet};

use soul_core::{Address, Amount, Authority, FungibleToken, Role, SoulError};

/// Number of base units in one whole token.
pub const WEI_PER_TOKEN: Amount = 1_000_000_000_000_000_000;

/// Token decimals.
pub const DECIMALS: u32 = 18;

/// Convert a whole-token amount to wei.
///
/// # Example
/// ```
/// use soul_economics::token::{to_wei, WEI_PER_TOKEN};
/// assert_eq!(to_wei(3), 3 * WEI_PER_TOKEN);
/// ```
pub fn to_wei(whole: u128) -> Amount {
    whole * WEI_PER_TOKEN
}

/// Render a wei amount as a decimal token string, trimming trailing zeros.
pub fn format_amount(amount: Amount) -> String {
    let whole = amount / WEI_PER_TOKEN;
    let frac = amount % WEI_PER_TOKEN;
    if frac == 0 {
        format!("{}", whole)
    } else {
        let frac_str = format!("{:018}", frac);
        format!("{}.{}", whole, frac_str.trim_end_matches('0'))
    }
}

/// An in-memory fungible token with role-gated minting.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    address: Address,
    symbol: String,
    /// Role required for `mint` and `burn`.
    supply_role: Role,
    total_supply: Amount,
    balances: HashMap<Address, Amount>,
    allowances: HashMap<(Address, Address), Amount>,
    roles: HashMap<Address, HashSet<Role>>,
}

impl TokenLedger {
    /// Create an empty token. `admin` receives `Role::Admin` and the supply role.
    pub fn new(symbol: &str, supply_role: Role, admin: Address) -> Self {
        let mut roles = HashMap::new();
        roles.insert(admin, HashSet::from([Role::Admin, supply_role]));
        Self {
            address: Address::derive(&format!("token:{}", symbol)),
            symbol: symbol.to_string(),
            supply_role,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
            roles,
        }
    }

    /// The SOUL reward token.
    pub fn reward_token(admin: Address) -> Self {
        Self::new("SOUL", Role::Minter, admin)
    }

    /// The SEANCE receipt token.
    pub fn receipt_token(admin: Address) -> Self {
        Self::new("SEANCE", Role::Operator, admin)
    }

    /// A plain deposit token (e.g. an LP pair) with `initial` units minted to `admin`.
    pub fn with_supply(symbol: &str, admin: Address, initial: Amount) -> Self {
        let mut token = Self::new(symbol, Role::Minter, admin);
        token.balances.insert(admin, initial);
        token.total_supply = initial;
        token
    }

    fn require_role(&self, role: Role, caller: &Address) -> Result<(), SoulError> {
        if self.has_role(role, caller) {
            Ok(())
        } else {
            Err(SoulError::Unauthorized(format!(
                "{} requires {} role on {}",
                caller, role, self.symbol
            )))
        }
    }

    fn debit(&mut self, from: &Address, amount: Amount) -> Result<(), SoulError> {
        let available = self.balance_of(from);
        if amount > available {
            return Err(SoulError::InsufficientBalance {
                requested: amount,
                available,
            });
        }
        self.balances.insert(*from, available - amount);
        Ok(())
    }

    fn credit(&mut self, to: &Address, amount: Amount) -> Result<(), SoulError> {
        let current = self.balance_of(to);
        let updated = current
            .checked_add(amount)
            .ok_or_else(|| SoulError::overflow("token credit"))?;
        self.balances.insert(*to, updated);
        Ok(())
    }
}

impl Authority for TokenLedger {
    fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), SoulError> {
        self.require_role(Role::Admin, caller)?;
        self.roles.entry(*account).or_default().insert(role);
        Ok(())
    }

    fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), SoulError> {
        self.require_role(Role::Admin, caller)?;
        if let Some(set) = self.roles.get_mut(account) {
            set.remove(&role);
        }
        Ok(())
    }

    fn has_role(&self, role: Role, account: &Address) -> bool {
        self.roles
            .get(account)
            .map(|set| set.contains(&role))
            .unwrap_or(false)
    }
}

impl FungibleToken for TokenLedger {
    fn address(&self) -> Address {
        self.address
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn total_supply(&self) -> Amount {
        self.total_supply
    }

    fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(0)
    }

    fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), SoulError> {
        self.debit(from, amount)?;
        self.credit(to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: &Address,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Result<(), SoulError> {
        let approved = self.allowance(from, spender);
        if amount > approved {
            return Err(SoulError::InsufficientAllowance {
                requested: amount,
                approved,
            });
        }
        self.debit(from, amount)?;
        self.allowances.insert((*from, *spender), approved - amount);
        self.credit(to, amount)
    }

    fn approve(
        &mut self,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Result<(), SoulError> {
        self.allowances.insert((*owner, *spender), amount);
        Ok(())
    }

    fn mint(&mut self, caller: &Address, to: &Address, amount: Amount) -> Result<(), SoulError> {
        self.require_role(self.supply_role, caller)?;
        let supply = self
            .total_supply
            .checked_add(amount)
            .ok_or_else(|| SoulError::overflow("mint"))?;
        self.credit(to, amount)?;
        self.total_supply = supply;
        Ok(())
    }

    fn burn(&mut self, caller: &Address, from: &Address, amount: Amount) -> Result<(), SoulError> {
        self.require_role(self.supply_role, caller)?;
        self.debit(from, amount)?;
        self.total_supply -= amount;
        Ok(())
    }
}
