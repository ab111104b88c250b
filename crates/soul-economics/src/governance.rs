// crates/soul-economics/src/governance.rs
//
// Governance state for the Summoner: role map, payout accounts, active flag.
//
// Configuration that would otherwise be ambient globals lives here and is only
// mutated through gated setters:
//   - `Role::Admin` holders update accounts, rates, weights, and pools.
//   - Only the current team account may hand the team role to a new address.

use std::collections::{HashMap, HashSet};

use soul_core::{Address, Authority, Role, SoulError};

/// Who may do what, and where the non-user share of rewards goes.
#[derive(Debug, Clone)]
pub struct GovernanceState {
    roles: HashMap<Address, HashSet<Role>>,
    dao: Address,
    team: Address,
    active: bool,
}

impl GovernanceState {
    /// Create governance with `admin` holding `Role::Admin`.
    ///
    /// # Errors
    /// Returns `SoulError::InvalidParameter` if `dao` or `team` is the zero address.
    pub fn new(admin: Address, dao: Address, team: Address, active: bool) -> Result<Self, SoulError> {
        require_non_zero(&dao, "dao")?;
        require_non_zero(&team, "team")?;
        let mut roles = HashMap::new();
        roles.insert(admin, HashSet::from([Role::Admin]));
        Ok(Self {
            roles,
            dao,
            team,
            active,
        })
    }

    /// # Errors
    /// Returns `SoulError::Unauthorized` unless `caller` holds `Role::Admin`.
    pub fn require_admin(&self, caller: &Address) -> Result<(), SoulError> {
        if self.has_role(Role::Admin, caller) {
            Ok(())
        } else {
            tracing::warn!("Rejected admin operation from {}", caller);
            Err(SoulError::Unauthorized(format!("{} is not an admin", caller)))
        }
    }

    /// # Errors
    /// Returns `SoulError::Inactive` while the ledger is toggled off.
    pub fn require_active(&self) -> Result<(), SoulError> {
        if self.active {
            Ok(())
        } else {
            Err(SoulError::Inactive)
        }
    }

    /// Replace both payout accounts. Admin only.
    pub fn update_accounts(
        &mut self,
        caller: &Address,
        dao: Address,
        team: Address,
    ) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        require_non_zero(&dao, "dao")?;
        require_non_zero(&team, "team")?;
        self.dao = dao;
        self.team = team;
        tracing::info!("Payout accounts updated: dao={}, team={}", dao, team);
        Ok(())
    }

    /// Hand the team account over. Only the current team may call this.
    pub fn new_team(&mut self, caller: &Address, team: Address) -> Result<(), SoulError> {
        if *caller != self.team {
            return Err(SoulError::Unauthorized(format!(
                "{} is not the current team account",
                caller
            )));
        }
        require_non_zero(&team, "team")?;
        self.team = team;
        tracing::info!("Team account handed over to {}", team);
        Ok(())
    }

    /// Switch deposits on or off. Admin only.
    pub fn toggle_active(&mut self, caller: &Address, active: bool) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        self.active = active;
        tracing::info!("Ledger active: {}", active);
        Ok(())
    }

    pub fn dao(&self) -> Address {
        self.dao
    }

    pub fn team(&self) -> Address {
        self.team
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

impl Authority for GovernanceState {
    fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        self.roles.entry(*account).or_default().insert(role);
        Ok(())
    }

    fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), SoulError> {
        self.require_admin(caller)?;
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

fn require_non_zero(account: &Address, name: &str) -> Result<(), SoulError> {
    if account.is_zero() {
        Err(SoulError::InvalidParameter(format!(
            "{} account cannot be the zero address",
            name
        )))
    } else {
        Ok(())
    }
}
