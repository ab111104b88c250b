// crates/soul-economics/src/vault.rs
//
// Auto-compounding vault over the staking pool.
//
// Depositors hand SOUL to the vault and receive shares. The vault stakes
// everything it holds in pool 0 as a single Summoner user; `harvest` collects
// the vault's reward, pays a performance fee to the treasury and a call fee
// to whoever triggered it, and re-stakes the rest, so the SOUL behind each
// share grows over time.
//
//   shares = amount                                  (first deposit)
//   shares = amount * total_shares / balance_of()    (afterwards)
//
// `balance_of()` is idle SOUL plus principal staked in pool 0. Reward that
// has accrued but not yet been harvested is not counted, so a deposit made
// just before a harvest shares in that harvest. The withdraw fee window
// discourages in-and-out timing around harvests.
//
// Fees are in basis points (10_000 = 100%).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use soul_core::{mul_div, read_token, write_token, Address, Amount, SoulError, Timestamp, TokenRef};

use crate::config::VaultConfig;
use crate::events::{EventLog, LedgerEvent};
use crate::pool::STAKING_POOL_ID;
use crate::rewards;
use crate::summoner::SummonerLedger;
use crate::token::WEI_PER_TOKEN;

/// Basis-point denominator.
pub const FEE_BASIS: u128 = 10_000;

/// Hard cap on the performance fee: 5%.
pub const MAX_PERFORMANCE_FEE: u128 = 500;

/// Hard cap on the call fee: 1%.
pub const MAX_CALL_FEE: u128 = 100;

/// Hard cap on the withdraw fee: 1%.
pub const MAX_WITHDRAW_FEE: u128 = 100;

/// Hard cap on the withdraw fee window: 72 hours.
pub const MAX_WITHDRAW_FEE_PERIOD: u64 = 72 * 3_600;

/// A depositor's share position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VaultUser {
    pub shares: Amount,
    /// Start of the withdraw fee window.
    pub last_deposited_time: Timestamp,
    /// SOUL value of the position right after the user's last action.
    pub underlying_at_last_action: Amount,
    pub last_user_action_time: Timestamp,
}

/// Result of a harvest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HarvestOutcome {
    /// Reward collected from pool 0 by this harvest.
    pub collected: Amount,
    pub performance_fee: Amount,
    pub call_fee: Amount,
    /// SOUL staked back into pool 0.
    pub restaked: Amount,
}

/// Share ledger that compounds pool 0 rewards.
pub struct CompoundingVault {
    address: Address,
    token: TokenRef,
    admin: Address,
    treasury: Address,
    users: HashMap<Address, VaultUser>,
    total_shares: Amount,
    performance_fee: u128,
    call_fee: u128,
    withdraw_fee: u128,
    withdraw_fee_period: u64,
    paused: bool,
    last_harvested_time: Timestamp,
    events: EventLog,
}

impl CompoundingVault {
    /// Create a vault that stakes `ledger`'s reward token.
    pub fn new(
        admin: Address,
        treasury: Address,
        ledger: &SummonerLedger,
        config: &VaultConfig,
    ) -> Result<Self, SoulError> {
        config
            .validate()
            .map_err(|e| SoulError::InvalidParameter(e.to_string()))?;
        if treasury.is_zero() {
            return Err(SoulError::InvalidParameter(
                "treasury cannot be the zero address".to_string(),
            ));
        }
        Ok(Self {
            address: Address::derive("vault"),
            token: ledger.reward_token(),
            admin,
            treasury,
            users: HashMap::new(),
            total_shares: 0,
            performance_fee: config.performance_fee.into(),
            call_fee: config.call_fee.into(),
            withdraw_fee: config.withdraw_fee.into(),
            withdraw_fee_period: config.withdraw_fee_period,
            paused: false,
            last_harvested_time: 0,
            events: EventLog::new(),
        })
    }

    /// Deposit `amount` SOUL and stake it. Returns the shares issued.
    ///
    /// The user must have approved the vault account for `amount`.
    pub fn deposit(
        &mut self,
        ledger: &mut SummonerLedger,
        user: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Amount, SoulError> {
        self.require_not_paused()?;
        if amount == 0 {
            return Err(SoulError::InvalidParameter(
                "deposit amount must be positive".to_string(),
            ));
        }
        if !ledger.is_active() {
            return Err(SoulError::Inactive);
        }
        {
            let token = read_token(&self.token)?;
            let available = token.balance_of(user);
            if available < amount {
                return Err(SoulError::InsufficientBalance {
                    requested: amount,
                    available,
                });
            }
            let approved = token.allowance(user, &self.address);
            if approved < amount {
                return Err(SoulError::InsufficientAllowance {
                    requested: amount,
                    approved,
                });
            }
        }

        // Everything fallible is computed before the first token move.
        let pool = self.balance_of(ledger)?;
        let shares = if self.total_shares == 0 {
            amount
        } else {
            mul_div(amount, self.total_shares, pool, "share issue")?
        };
        if shares == 0 {
            return Err(SoulError::InvalidParameter(
                "deposit too small to issue a share".to_string(),
            ));
        }
        let total_shares = self
            .total_shares
            .checked_add(shares)
            .ok_or_else(|| SoulError::overflow("total shares"))?;
        let user_before = self.users.get(user).cloned();
        let mut info = user_before.clone().unwrap_or_default();
        info.shares = info
            .shares
            .checked_add(shares)
            .ok_or_else(|| SoulError::overflow("user shares"))?;
        let pool_after = pool
            .checked_add(amount)
            .ok_or_else(|| SoulError::overflow("vault balance"))?;
        info.underlying_at_last_action = mul_div(pool_after, info.shares, total_shares, "underlying")?;
        info.last_deposited_time = now;
        info.last_user_action_time = now;
        let shares_before = self.total_shares;

        write_token(&self.token)?.transfer_from(&self.address, user, &self.address, amount)?;
        self.total_shares = total_shares;
        self.users.insert(*user, info);

        if let Err(e) = self.earn(ledger, now) {
            tracing::warn!("Vault deposit by {} could not be staked: {}", user, e);
            self.total_shares = shares_before;
            match user_before {
                Some(previous) => self.users.insert(*user, previous),
                None => self.users.remove(user),
            };
            // Funds that did not reach the pool are still idle in the vault.
            write_token(&self.token)?.transfer(&self.address, user, amount)?;
            return Err(e);
        }

        tracing::info!("{} deposited {} into the vault for {} shares", user, amount, shares);
        self.events.record(LedgerEvent::VaultDeposit {
            user: *user,
            amount,
            shares,
            at: now,
        });
        Ok(shares)
    }

    /// Redeem `shares` for SOUL. Returns the amount paid to the user.
    ///
    /// Inside the withdraw fee window a fee goes to the treasury.
    pub fn withdraw(
        &mut self,
        ledger: &mut SummonerLedger,
        user: &Address,
        shares: Amount,
        now: Timestamp,
    ) -> Result<Amount, SoulError> {
        let info = self.user_info(user);
        if shares == 0 {
            return Err(SoulError::InvalidParameter(
                "nothing to withdraw".to_string(),
            ));
        }
        if shares > info.shares {
            return Err(SoulError::InsufficientBalance {
                requested: shares,
                available: info.shares,
            });
        }

        let balance = self.balance_of(ledger)?;
        let owed = mul_div(balance, shares, self.total_shares, "redeem")?;
        let remaining_shares = info.shares - shares;
        let total_after = self.total_shares - shares;
        let underlying_after = if remaining_shares == 0 {
            0
        } else {
            mul_div(balance - owed, remaining_shares, total_after, "underlying")?
        };
        let fee_window_open = now < info.last_deposited_time.saturating_add(self.withdraw_fee_period);

        let mut current = owed;
        let idle = self.available()?;
        if idle < current {
            let shortfall = current - idle;
            ledger.leave_staking(&self.address, shortfall, now)?;
            let received = self.available()?.saturating_sub(idle);
            if received < shortfall {
                current = idle + received;
            }
        }

        // withdraw_fee <= FEE_BASIS, so the fee never exceeds `current`.
        let fee = if fee_window_open {
            mul_div(current, self.withdraw_fee, FEE_BASIS, "withdraw fee")?
        } else {
            0
        };
        let paid = current - fee;

        let mut updated = info.clone();
        updated.shares = remaining_shares;
        updated.underlying_at_last_action = underlying_after;
        updated.last_user_action_time = now;
        self.total_shares = total_after;
        self.users.insert(*user, updated);

        let payout = write_token(&self.token).and_then(|mut token| {
            token.transfer(&self.address, user, paid)?;
            if fee > 0 {
                token.transfer(&self.address, &self.treasury, fee)?;
            }
            Ok(())
        });
        if let Err(e) = payout {
            // Principal pulled from pool 0 stays idle; shares are restored.
            self.total_shares = total_after + shares;
            self.users.insert(*user, info);
            return Err(e);
        }

        tracing::info!(
            "{} redeemed {} shares for {} (fee {})",
            user,
            shares,
            paid,
            fee
        );
        self.events.record(LedgerEvent::VaultWithdraw {
            user: *user,
            amount: paid,
            shares,
            fee,
            at: now,
        });
        Ok(paid)
    }

    /// Redeem every share `user` holds.
    pub fn withdraw_all(
        &mut self,
        ledger: &mut SummonerLedger,
        user: &Address,
        now: Timestamp,
    ) -> Result<Amount, SoulError> {
        let shares = self.user_info(user).shares;
        self.withdraw(ledger, user, shares, now)
    }

    /// Collect the vault's pool 0 reward, pay fees, and re-stake.
    pub fn harvest(
        &mut self,
        ledger: &mut SummonerLedger,
        caller: &Address,
        now: Timestamp,
    ) -> Result<HarvestOutcome, SoulError> {
        self.require_not_paused()?;
        let idle_before = self.available()?;
        ledger.leave_staking(&self.address, 0, now)?;

        // Fees apply to the fresh reward only, never to funds already idle.
        let collected = self.available()?.saturating_sub(idle_before);
        let performance_fee = mul_div(collected, self.performance_fee, FEE_BASIS, "performance fee")?;
        let call_fee = mul_div(collected, self.call_fee, FEE_BASIS, "call fee")?;
        {
            let mut token = write_token(&self.token)?;
            if performance_fee > 0 {
                token.transfer(&self.address, &self.treasury, performance_fee)?;
            }
            if call_fee > 0 {
                token.transfer(&self.address, caller, call_fee)?;
            }
        }
        let restaked = self.earn(ledger, now)?;
        self.last_harvested_time = now;

        tracing::info!(
            "Vault harvest by {}: collected {}, performance fee {}, call fee {}",
            caller,
            collected,
            performance_fee,
            call_fee
        );
        self.events.record(LedgerEvent::VaultHarvest {
            caller: *caller,
            performance_fee,
            call_fee,
            at: now,
        });
        Ok(HarvestOutcome {
            collected,
            performance_fee,
            call_fee,
            restaked,
        })
    }

    /// Pull all principal out of pool 0 without its reward and pause. Admin only.
    pub fn emergency_withdraw(
        &mut self,
        ledger: &mut SummonerLedger,
        caller: &Address,
        now: Timestamp,
    ) -> Result<Amount, SoulError> {
        self.require_admin(caller)?;
        let settlement = ledger.emergency_withdraw(&self.address, STAKING_POOL_ID, now)?;
        self.set_paused(true);
        tracing::warn!("Vault emergency withdraw: {} returned to idle", settlement.withdrawn);
        Ok(settlement.withdrawn)
    }

    /// Stake every idle unit. While the ledger is inactive, idle funds wait.
    fn earn(&mut self, ledger: &mut SummonerLedger, now: Timestamp) -> Result<Amount, SoulError> {
        if !ledger.is_active() {
            return Ok(0);
        }
        let idle = self.available()?;
        if idle > 0 {
            write_token(&self.token)?.approve(&self.address, &ledger.address(), idle)?;
            ledger.enter_staking(&self.address, idle, now)?;
        }
        Ok(idle)
    }

    // ---------------------------------------------------------------------
    // Views
    // ---------------------------------------------------------------------

    /// Idle SOUL held by the vault.
    pub fn available(&self) -> Result<Amount, SoulError> {
        Ok(read_token(&self.token)?.balance_of(&self.address))
    }

    /// Idle SOUL plus principal staked in pool 0.
    pub fn balance_of(&self, ledger: &SummonerLedger) -> Result<Amount, SoulError> {
        let staked = ledger.user_info(STAKING_POOL_ID, &self.address).amount;
        self.available()?
            .checked_add(staked)
            .ok_or_else(|| SoulError::overflow("vault balance"))
    }

    /// Same as `balance_of`.
    pub fn total_underlying(&self, ledger: &SummonerLedger) -> Result<Amount, SoulError> {
        self.balance_of(ledger)
    }

    /// SOUL value of `user`'s shares.
    pub fn underlying_of(&self, ledger: &SummonerLedger, user: &Address) -> Result<Amount, SoulError> {
        let shares = self.user_info(user).shares;
        if shares == 0 {
            return Ok(0);
        }
        mul_div(self.balance_of(ledger)?, shares, self.total_shares, "underlying")
    }

    /// SOUL per 1e18 shares.
    pub fn price_per_full_share(&self, ledger: &SummonerLedger) -> Result<Amount, SoulError> {
        if self.total_shares == 0 {
            return Ok(WEI_PER_TOKEN);
        }
        mul_div(self.balance_of(ledger)?, WEI_PER_TOKEN, self.total_shares, "share price")
    }

    /// SOUL a harvest at `now` would collect, before fees.
    pub fn pending_harvest_rewards(
        &self,
        ledger: &SummonerLedger,
        now: Timestamp,
    ) -> Result<Amount, SoulError> {
        let pending = ledger.pending_reward(STAKING_POOL_ID, &self.address, now)?;
        Ok(rewards::split_reward(pending)?.user)
    }

    /// Call fee a harvest at `now` would pay its caller.
    pub fn call_fee_reward(&self, ledger: &SummonerLedger, now: Timestamp) -> Result<Amount, SoulError> {
        mul_div(
            self.pending_harvest_rewards(ledger, now)?,
            self.call_fee,
            FEE_BASIS,
            "call fee",
        )
    }

    pub fn user_info(&self, user: &Address) -> VaultUser {
        self.users.get(user).cloned().unwrap_or_default()
    }

    pub fn total_shares(&self) -> Amount {
        self.total_shares
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn last_harvested_time(&self) -> Timestamp {
        self.last_harvested_time
    }

    pub fn performance_fee(&self) -> u128 {
        self.performance_fee
    }

    pub fn call_fee(&self) -> u128 {
        self.call_fee
    }

    pub fn withdraw_fee(&self) -> u128 {
        self.withdraw_fee
    }

    pub fn withdraw_fee_period(&self) -> u64 {
        self.withdraw_fee_period
    }

    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        self.events.drain()
    }

    // ---------------------------------------------------------------------
    // Admin
    // ---------------------------------------------------------------------

    pub fn set_treasury(&mut self, caller: &Address, treasury: Address) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        if treasury.is_zero() {
            return Err(SoulError::InvalidParameter(
                "treasury cannot be the zero address".to_string(),
            ));
        }
        self.treasury = treasury;
        tracing::info!("Vault treasury set to {}", treasury);
        Ok(())
    }

    pub fn set_performance_fee(&mut self, caller: &Address, fee: u128) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        self.performance_fee = capped("performance fee", fee, MAX_PERFORMANCE_FEE)?;
        Ok(())
    }

    pub fn set_call_fee(&mut self, caller: &Address, fee: u128) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        self.call_fee = capped("call fee", fee, MAX_CALL_FEE)?;
        Ok(())
    }

    pub fn set_withdraw_fee(&mut self, caller: &Address, fee: u128) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        self.withdraw_fee = capped("withdraw fee", fee, MAX_WITHDRAW_FEE)?;
        Ok(())
    }

    pub fn set_withdraw_fee_period(&mut self, caller: &Address, period: u64) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        if period > MAX_WITHDRAW_FEE_PERIOD {
            return Err(SoulError::InvalidParameter(format!(
                "withdraw fee period {}s exceeds {}s",
                period, MAX_WITHDRAW_FEE_PERIOD
            )));
        }
        self.withdraw_fee_period = period;
        Ok(())
    }

    pub fn pause(&mut self, caller: &Address) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        self.set_paused(true);
        Ok(())
    }

    pub fn unpause(&mut self, caller: &Address) -> Result<(), SoulError> {
        self.require_admin(caller)?;
        self.set_paused(false);
        Ok(())
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        tracing::info!("Vault paused: {}", paused);
        self.events.record(LedgerEvent::VaultPaused { paused });
    }

    fn require_admin(&self, caller: &Address) -> Result<(), SoulError> {
        if *caller == self.admin {
            Ok(())
        } else {
            Err(SoulError::Unauthorized(format!(
                "{} is not the vault admin",
                caller
            )))
        }
    }

    fn require_not_paused(&self) -> Result<(), SoulError> {
        if self.paused {
            Err(SoulError::Paused)
        } else {
            Ok(())
        }
    }
}

fn capped(name: &str, value: u128, cap: u128) -> Result<u128, SoulError> {
    if value > cap {
        Err(SoulError::InvalidParameter(format!(
            "{} {} exceeds cap {}",
            name, value, cap
        )))
    } else {
        Ok(value)
    }
}
