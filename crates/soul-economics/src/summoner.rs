// crates/soul-economics/src/summoner.rs
//
// The Summoner: reward ledger over every pool.
//
// Users deposit a pool's token, accrue SOUL through the pool accumulator, and
// withdraw principal minus a fee that decays with deposit age. Pool 0 is the
// staking pool: SOUL in, SEANCE receipt minted 1:1.
//
// Every balance-changing entry point runs in three phases:
//
//   1. checks       pool id, active flag, balances, allowances, and the roles
//                   the ledger needs on the reward/receipt tokens. Nothing is
//                   written if any check fails.
//   2. effects      the pool accumulator is brought up to `now` and the user
//                   record and pool total are rewritten.
//   3. interactions deposit pull, receipt mint/burn, principal and fee
//                   transfers, then reward mint and payout, in that order.
//
// If a collaborator still fails in phase 3, completed token moves are undone
// where the ledger can undo them, the user record and pool total are
// restored, and the error is returned. The accumulator update from phase 2 is
// kept; it is a valid standalone `update_pool`.
//
// Rewards are minted lazily: at settlement exactly `pending` SOUL is minted to
// the ledger and immediately split between user, dao, and team, so SOUL
// supply grows by exactly what is paid out.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use soul_core::{
    read_token, write_token, Address, Amount, Authority, Role, SoulError, Timestamp, TokenRef,
};

use crate::config::{FeeClockPolicy, SummonerConfig};
use crate::emission::EmissionSchedule;
use crate::events::{EventLog, LedgerEvent};
use crate::fees::{self, FeeSchedule};
use crate::governance::GovernanceState;
use crate::pool::{PoolInfo, PoolRegistry, STAKING_POOL_ID};
use crate::rewards::{self, RewardSplit, UserInfo};

/// What one entry point did to a position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub pid: usize,
    /// Reward settled, as split between user, dao, and team.
    pub reward: RewardSplit,
    /// Deposit-token units pulled from the caller.
    pub deposited: Amount,
    /// Deposit-token units paid to the caller after the fee.
    pub withdrawn: Amount,
    /// Withdrawal fee sent to the dao.
    pub fee: Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Movement {
    Deposit(Amount),
    Withdraw(Amount),
    Emergency,
}

/// Compensating action for a completed token move.
enum Undo {
    Refund {
        token: TokenRef,
        to: Address,
        amount: Amount,
    },
    Burn {
        token: TokenRef,
        from: Address,
        amount: Amount,
    },
    Mint {
        token: TokenRef,
        to: Address,
        amount: Amount,
    },
}

/// Token moves decided during the effects phase.
#[derive(Debug, Clone, Copy)]
struct Transfers {
    pid: usize,
    deposited: Amount,
    net: Amount,
    fee: Amount,
    reward: RewardSplit,
}

/// Reward ledger over a registry of pools.
pub struct SummonerLedger {
    address: Address,
    reward_token: TokenRef,
    receipt_token: TokenRef,
    /// Deposit token handles by token address.
    deposit_tokens: HashMap<Address, TokenRef>,
    registry: PoolRegistry,
    users: HashMap<(usize, Address), UserInfo>,
    emission: EmissionSchedule,
    fees: FeeSchedule,
    governance: GovernanceState,
    fee_clock_policy: FeeClockPolicy,
    default_fee_days: u64,
    events: EventLog,
}

impl SummonerLedger {
    /// Create a ledger with the staking pool registered as pool 0.
    ///
    /// The ledger account (`address()`) must be granted `Role::Minter` on the
    /// reward token and `Role::Operator` on the receipt token before any
    /// reward can be paid or any SOUL staked.
    pub fn new(
        admin: Address,
        dao: Address,
        team: Address,
        reward_token: TokenRef,
        receipt_token: TokenRef,
        config: &SummonerConfig,
        now: Timestamp,
    ) -> Result<Self, SoulError> {
        let emission = config.emission_schedule()?;
        let fees = config.fee_schedule()?;
        let governance = GovernanceState::new(admin, dao, team, config.start_active)?;

        let reward_address = read_token(&reward_token)?.address();
        let mut registry = PoolRegistry::new();
        registry.add_pool(
            config.staking_alloc_point.into(),
            reward_address,
            false,
            0,
            now,
            emission.reward_per_second(),
        )?;

        let mut deposit_tokens = HashMap::new();
        deposit_tokens.insert(reward_address, reward_token.clone());

        tracing::info!(
            "Summoner initialised: {} wei/day, staking alloc {}",
            emission.daily_reward(),
            config.staking_alloc_point
        );

        Ok(Self {
            address: Address::derive("summoner"),
            reward_token,
            receipt_token,
            deposit_tokens,
            registry,
            users: HashMap::new(),
            emission,
            fees,
            governance,
            fee_clock_policy: config.fee_clock_policy,
            default_fee_days: config.default_fee_days,
            events: EventLog::new(),
        })
    }

    // ---------------------------------------------------------------------
    // User entry points
    // ---------------------------------------------------------------------

    /// Deposit `amount` of pool `pid`'s token. `amount == 0` only harvests.
    ///
    /// The caller must have approved the ledger account for `amount`.
    ///
    /// # Errors
    /// `InvalidParameter` for pool 0 (use `enter_staking`), `Inactive` while
    /// deposits are switched off, `PoolNotFound`, `InsufficientBalance`, or
    /// `InsufficientAllowance`.
    pub fn deposit(
        &mut self,
        caller: &Address,
        pid: usize,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Settlement, SoulError> {
        if pid == STAKING_POOL_ID {
            return Err(SoulError::InvalidParameter(
                "deposit into the staking pool with enter_staking".to_string(),
            ));
        }
        self.governance.require_active()?;
        self.execute(caller, pid, Movement::Deposit(amount), now)
    }

    /// Withdraw `amount` from pool `pid`, paying the age-based fee to the dao.
    /// `amount == 0` only harvests.
    pub fn withdraw(
        &mut self,
        caller: &Address,
        pid: usize,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Settlement, SoulError> {
        if pid == STAKING_POOL_ID {
            return Err(SoulError::InvalidParameter(
                "withdraw from the staking pool with leave_staking".to_string(),
            ));
        }
        self.execute(caller, pid, Movement::Withdraw(amount), now)
    }

    /// Stake SOUL in pool 0 and receive SEANCE 1:1.
    pub fn enter_staking(
        &mut self,
        caller: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Settlement, SoulError> {
        self.governance.require_active()?;
        self.execute(caller, STAKING_POOL_ID, Movement::Deposit(amount), now)
    }

    /// Unstake SOUL from pool 0, burning the matching SEANCE.
    ///
    /// # Errors
    /// `InsufficientBalance` if the caller no longer holds `amount` SEANCE.
    pub fn leave_staking(
        &mut self,
        caller: &Address,
        amount: Amount,
        now: Timestamp,
    ) -> Result<Settlement, SoulError> {
        self.execute(caller, STAKING_POOL_ID, Movement::Withdraw(amount), now)
    }

    /// Return the whole position without paying its pending reward.
    ///
    /// The exit fee still applies outside the staking pool.
    pub fn emergency_withdraw(
        &mut self,
        caller: &Address,
        pid: usize,
        now: Timestamp,
    ) -> Result<Settlement, SoulError> {
        self.execute(caller, pid, Movement::Emergency, now)
    }

    // ---------------------------------------------------------------------
    // Views and maintenance
    // ---------------------------------------------------------------------

    /// Bring one pool's accumulator up to `now`. Returns the reward emitted.
    pub fn update_pool(&mut self, pid: usize, now: Timestamp) -> Result<Amount, SoulError> {
        self.registry
            .update_pool(pid, now, self.emission.reward_per_second())
    }

    /// Bring every pool up to `now`. Returns the total reward emitted.
    pub fn mass_update_pools(&mut self, now: Timestamp) -> Result<Amount, SoulError> {
        self.registry
            .mass_update(now, self.emission.reward_per_second())
    }

    /// Reward `user` would receive from pool `pid` if they settled at `now`.
    pub fn pending_reward(
        &self,
        pid: usize,
        user: &Address,
        now: Timestamp,
    ) -> Result<Amount, SoulError> {
        let pool = self.registry.pool(pid)?;
        rewards::pending_reward(
            pool,
            &self.user_info(pid, user),
            now,
            self.emission.reward_per_second(),
            self.registry.total_alloc_point(),
        )
    }

    /// The user's position in pool `pid`; empty if they never deposited.
    pub fn user_info(&self, pid: usize, user: &Address) -> UserInfo {
        self.users.get(&(pid, *user)).cloned().unwrap_or_default()
    }

    /// Seconds since the position's fee-clock anchor; 0 for an empty position.
    pub fn user_delta(&self, pid: usize, user: &Address, now: Timestamp) -> Timestamp {
        let info = self.user_info(pid, user);
        if info.is_staked() {
            now.saturating_sub(info.deposit_time)
        } else {
            0
        }
    }

    /// Scaled fee rate for pool `pid` after `elapsed` seconds.
    pub fn get_fee_rate(&self, pid: usize, elapsed: Timestamp) -> Result<Amount, SoulError> {
        let pool = self.registry.pool(pid)?;
        Ok(self.fees.rate(pid, elapsed, pool.fee_days))
    }

    /// Scaled fee rate `user` would pay withdrawing from pool `pid` at `now`.
    pub fn user_fee_rate(
        &self,
        pid: usize,
        user: &Address,
        now: Timestamp,
    ) -> Result<Amount, SoulError> {
        self.get_fee_rate(pid, self.user_delta(pid, user, now))
    }

    pub fn pool(&self, pid: usize) -> Result<&PoolInfo, SoulError> {
        self.registry.pool(pid)
    }

    pub fn pool_length(&self) -> usize {
        self.registry.pool_length()
    }

    pub fn total_alloc_point(&self) -> u128 {
        self.registry.total_alloc_point()
    }

    pub fn daily_reward(&self) -> Amount {
        self.emission.daily_reward()
    }

    pub fn reward_per_second(&self) -> Amount {
        self.emission.reward_per_second()
    }

    pub fn start_rate(&self) -> Amount {
        self.fees.start_rate()
    }

    pub fn daily_decay_rate(&self) -> Amount {
        self.fees.daily_decay_rate()
    }

    pub fn fee_clock_policy(&self) -> FeeClockPolicy {
        self.fee_clock_policy
    }

    /// The ledger's own account, which holds deposits and mints rewards.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn dao(&self) -> Address {
        self.governance.dao()
    }

    pub fn team(&self) -> Address {
        self.governance.team()
    }

    pub fn is_active(&self) -> bool {
        self.governance.is_active()
    }

    pub fn reward_token(&self) -> TokenRef {
        self.reward_token.clone()
    }

    pub fn receipt_token(&self) -> TokenRef {
        self.receipt_token.clone()
    }

    /// Events recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<LedgerEvent> {
        self.events.drain()
    }

    /// Undrained events as a JSON array.
    pub fn events_json(&self) -> Result<String, SoulError> {
        self.events.to_json()
    }

    // ---------------------------------------------------------------------
    // Governance
    // ---------------------------------------------------------------------

    /// Register a pool for `deposit_token`. `fee_days` defaults to the
    /// configured window.
    pub fn add_pool(
        &mut self,
        caller: &Address,
        alloc_point: u128,
        deposit_token: TokenRef,
        with_update: bool,
        fee_days: Option<u64>,
        now: Timestamp,
    ) -> Result<usize, SoulError> {
        self.governance.require_admin(caller)?;
        let token_address = read_token(&deposit_token)?.address();
        let fee_days = fee_days.unwrap_or(self.default_fee_days);
        let pid = self.registry.add_pool(
            alloc_point,
            token_address,
            with_update,
            fee_days,
            now,
            self.emission.reward_per_second(),
        )?;
        self.deposit_tokens.insert(token_address, deposit_token);

        tracing::info!(
            "Pool {} added: token={}, alloc={}, fee_days={}",
            pid,
            token_address,
            alloc_point,
            fee_days
        );
        self.events.record(LedgerEvent::PoolAdded {
            pid,
            deposit_token: token_address,
            alloc_point,
            fee_days,
        });
        Ok(pid)
    }

    /// Change a pool's weight.
    pub fn set_alloc_point(
        &mut self,
        caller: &Address,
        pid: usize,
        alloc_point: u128,
        with_update: bool,
        now: Timestamp,
    ) -> Result<(), SoulError> {
        self.governance.require_admin(caller)?;
        self.registry.set_alloc_point(
            pid,
            alloc_point,
            with_update,
            now,
            self.emission.reward_per_second(),
        )?;
        tracing::info!("Pool {} alloc point set to {}", pid, alloc_point);
        self.events
            .record(LedgerEvent::AllocPointUpdated { pid, alloc_point });
        Ok(())
    }

    /// Rescale emission. Every pool is settled at the old rate first.
    pub fn update_weights(
        &mut self,
        caller: &Address,
        weight: u128,
        total_weight: u128,
        now: Timestamp,
    ) -> Result<(), SoulError> {
        self.governance.require_admin(caller)?;
        let mut next = self.emission.clone();
        next.update(weight, total_weight)?;
        self.registry
            .mass_update(now, self.emission.reward_per_second())?;
        self.emission = next;

        let daily_reward = self.emission.daily_reward();
        tracing::info!(
            "Emission weights set to {}/{}: {} wei/day",
            weight,
            total_weight,
            daily_reward
        );
        self.events.record(LedgerEvent::WeightsUpdated {
            weight,
            total_weight,
            daily_reward,
        });
        Ok(())
    }

    pub fn update_accounts(
        &mut self,
        caller: &Address,
        dao: Address,
        team: Address,
    ) -> Result<(), SoulError> {
        self.governance.update_accounts(caller, dao, team)?;
        self.events.record(LedgerEvent::AccountsUpdated { dao, team });
        Ok(())
    }

    /// Set the day-0 withdrawal fee, in whole percent.
    pub fn update_start_rate(&mut self, caller: &Address, start_rate: u128) -> Result<(), SoulError> {
        self.governance.require_admin(caller)?;
        self.fees.set_start_rate(start_rate)?;
        tracing::info!("Start fee rate set to {}%", start_rate);
        self.events
            .record(LedgerEvent::StartRateUpdated { start_rate });
        Ok(())
    }

    pub fn toggle_active(&mut self, caller: &Address, active: bool) -> Result<(), SoulError> {
        self.governance.toggle_active(caller, active)?;
        self.events.record(LedgerEvent::ActiveToggled { active });
        Ok(())
    }

    /// Hand the team account to `team`. Only the current team may call this.
    pub fn new_team(&mut self, caller: &Address, team: Address) -> Result<(), SoulError> {
        self.governance.new_team(caller, team)?;
        self.events.record(LedgerEvent::TeamUpdated { team });
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Settlement
    // ---------------------------------------------------------------------

    fn deposit_token_of(&self, pid: usize) -> Result<TokenRef, SoulError> {
        let token_address = self.registry.pool(pid)?.deposit_token;
        self.deposit_tokens
            .get(&token_address)
            .cloned()
            .ok_or(SoulError::PoolNotFound(pid))
    }

    fn execute(
        &mut self,
        caller: &Address,
        pid: usize,
        movement: Movement,
        now: Timestamp,
    ) -> Result<Settlement, SoulError> {
        let deposit_token = self.deposit_token_of(pid)?;
        let reward_per_second = self.emission.reward_per_second();
        let user_before = self.users.get(&(pid, *caller)).cloned();
        let mut user = user_before.clone().unwrap_or_default();

        // Checks.
        let mut pool = self.registry.pool(pid)?.clone();
        let staked_before = pool.total_staked;
        rewards::update_pool(
            &mut pool,
            now,
            reward_per_second,
            self.registry.total_alloc_point(),
        )?;
        let acc = pool.acc_reward_per_share;

        let pending = match movement {
            Movement::Emergency => 0,
            _ => rewards::pending(&user, acc)?,
        };
        let reward = rewards::split_reward(pending)?;

        let (deposited, withdrawn) = match movement {
            Movement::Deposit(amount) => (amount, 0),
            Movement::Withdraw(amount) => (0, amount),
            Movement::Emergency => (0, user.amount),
        };
        if withdrawn > user.amount {
            return Err(SoulError::InsufficientBalance {
                requested: withdrawn,
                available: user.amount,
            });
        }
        let rate = self
            .fees
            .rate(pid, now.saturating_sub(user.deposit_time), pool.fee_days);
        let (net, fee) = fees::apply_fee(withdrawn, rate)?;

        self.check_collaborators(caller, pid, &deposit_token, deposited, withdrawn, pending)?;

        let amount = user
            .amount
            .checked_add(deposited)
            .ok_or_else(|| SoulError::overflow("position amount"))?
            - withdrawn;
        let total_staked = staked_before
            .checked_add(deposited)
            .ok_or_else(|| SoulError::overflow("pool total"))?
            .checked_sub(withdrawn)
            .ok_or_else(|| SoulError::Arithmetic("pool total below position".to_string()))?;
        let total_harvested = user
            .total_harvested
            .checked_add(pending)
            .ok_or_else(|| SoulError::overflow("total harvested"))?;

        // Effects.
        if deposited > 0 {
            if !user.is_staked() || self.fee_clock_policy == FeeClockPolicy::ResetOnTopUp {
                user.deposit_time = now;
            }
            user.last_deposit_time = now;
        }
        if withdrawn > 0 {
            user.last_withdraw_time = now;
        }
        user.amount = amount;
        user.reward_debt = rewards::accumulated(amount, acc)?;
        user.total_harvested = total_harvested;

        self.registry.update_pool(pid, now, reward_per_second)?;
        self.registry.pool_mut(pid)?.total_staked = total_staked;
        self.users.insert((pid, *caller), user);

        // Interactions.
        let transfers = Transfers {
            pid,
            deposited,
            net,
            fee,
            reward,
        };
        if let Err(e) = self.interact(caller, &deposit_token, transfers) {
            tracing::warn!(
                "Pool {} operation for {} failed during token transfers: {}",
                pid,
                caller,
                e
            );
            self.registry.pool_mut(pid)?.total_staked = staked_before;
            match user_before {
                Some(previous) => self.users.insert((pid, *caller), previous),
                None => self.users.remove(&(pid, *caller)),
            };
            return Err(e);
        }

        let settlement = Settlement {
            pid,
            reward,
            deposited,
            withdrawn: net,
            fee,
        };
        self.record_settlement(caller, movement, &settlement, now);
        Ok(settlement)
    }

    fn check_collaborators(
        &self,
        caller: &Address,
        pid: usize,
        deposit_token: &TokenRef,
        deposited: Amount,
        withdrawn: Amount,
        pending: Amount,
    ) -> Result<(), SoulError> {
        if deposited > 0 {
            let token = read_token(deposit_token)?;
            let available = token.balance_of(caller);
            if available < deposited {
                return Err(SoulError::InsufficientBalance {
                    requested: deposited,
                    available,
                });
            }
            let approved = token.allowance(caller, &self.address);
            if approved < deposited {
                return Err(SoulError::InsufficientAllowance {
                    requested: deposited,
                    approved,
                });
            }
        }
        if withdrawn > 0 {
            let held = read_token(deposit_token)?.balance_of(&self.address);
            if held < withdrawn {
                return Err(SoulError::InsufficientBalance {
                    requested: withdrawn,
                    available: held,
                });
            }
        }
        if pid == STAKING_POOL_ID && (deposited > 0 || withdrawn > 0) {
            let receipt = read_token(&self.receipt_token)?;
            if !receipt.has_role(Role::Operator, &self.address) {
                return Err(SoulError::Unauthorized(format!(
                    "ledger is not an operator of {}",
                    receipt.symbol()
                )));
            }
            let receipts = receipt.balance_of(caller);
            if receipts < withdrawn {
                return Err(SoulError::InsufficientBalance {
                    requested: withdrawn,
                    available: receipts,
                });
            }
        }
        if pending > 0 {
            let reward_token = read_token(&self.reward_token)?;
            if !reward_token.has_role(Role::Minter, &self.address) {
                return Err(SoulError::Unauthorized(format!(
                    "ledger is not a minter of {}",
                    reward_token.symbol()
                )));
            }
        }
        Ok(())
    }

    fn interact(
        &self,
        caller: &Address,
        deposit_token: &TokenRef,
        transfers: Transfers,
    ) -> Result<(), SoulError> {
        let mut undo = Vec::new();
        let result = self.run_transfers(caller, deposit_token, transfers, &mut undo);
        if result.is_err() {
            self.unwind(undo);
        }
        result
    }

    fn run_transfers(
        &self,
        caller: &Address,
        deposit_token: &TokenRef,
        t: Transfers,
        undo: &mut Vec<Undo>,
    ) -> Result<(), SoulError> {
        let staking = t.pid == STAKING_POOL_ID;

        if t.deposited > 0 {
            write_token(deposit_token)?.transfer_from(
                &self.address,
                caller,
                &self.address,
                t.deposited,
            )?;
            undo.push(Undo::Refund {
                token: deposit_token.clone(),
                to: *caller,
                amount: t.deposited,
            });
            if staking {
                write_token(&self.receipt_token)?.mint(&self.address, caller, t.deposited)?;
                undo.push(Undo::Burn {
                    token: self.receipt_token.clone(),
                    from: *caller,
                    amount: t.deposited,
                });
            }
        }

        let withdrawn = t.net + t.fee;
        if withdrawn > 0 {
            if staking {
                write_token(&self.receipt_token)?.burn(&self.address, caller, withdrawn)?;
                undo.push(Undo::Mint {
                    token: self.receipt_token.clone(),
                    to: *caller,
                    amount: withdrawn,
                });
            }
            if t.net > 0 {
                write_token(deposit_token)?.transfer(&self.address, caller, t.net)?;
            }
            if t.fee > 0 {
                write_token(deposit_token)?.transfer(&self.address, &self.dao(), t.fee)?;
            }
        }

        let pending = t.reward.total();
        if pending > 0 {
            write_token(&self.reward_token)?.mint(&self.address, &self.address, pending)?;
            undo.push(Undo::Burn {
                token: self.reward_token.clone(),
                from: self.address,
                amount: pending,
            });
            let mut reward_token = write_token(&self.reward_token)?;
            reward_token.transfer(&self.address, caller, t.reward.user)?;
            reward_token.transfer(&self.address, &self.dao(), t.reward.dao)?;
            reward_token.transfer(&self.address, &self.team(), t.reward.team)?;
        }
        Ok(())
    }

    fn unwind(&self, undo: Vec<Undo>) {
        for step in undo.into_iter().rev() {
            let result = match step {
                Undo::Refund { token, to, amount } => {
                    write_token(&token).and_then(|mut t| t.transfer(&self.address, &to, amount))
                }
                Undo::Burn { token, from, amount } => {
                    write_token(&token).and_then(|mut t| t.burn(&self.address, &from, amount))
                }
                Undo::Mint { token, to, amount } => {
                    write_token(&token).and_then(|mut t| t.mint(&self.address, &to, amount))
                }
            };
            if let Err(e) = result {
                tracing::error!("Could not undo token move: {}", e);
            }
        }
    }

    fn record_settlement(
        &mut self,
        caller: &Address,
        movement: Movement,
        settlement: &Settlement,
        now: Timestamp,
    ) {
        let pid = settlement.pid;
        match movement {
            Movement::Deposit(amount) if amount > 0 => {
                tracing::info!("{} deposited {} into pool {}", caller, amount, pid);
                self.events.record(LedgerEvent::Deposit {
                    user: *caller,
                    pid,
                    amount,
                    at: now,
                });
            }
            Movement::Withdraw(amount) if amount > 0 => {
                tracing::info!(
                    "{} withdrew {} from pool {} (fee {})",
                    caller,
                    amount,
                    pid,
                    settlement.fee
                );
                self.events.record(LedgerEvent::Withdraw {
                    user: *caller,
                    pid,
                    amount,
                    fee: settlement.fee,
                    at: now,
                });
            }
            Movement::Emergency => {
                let amount = settlement.withdrawn + settlement.fee;
                tracing::info!(
                    "{} emergency-withdrew {} from pool {}",
                    caller,
                    amount,
                    pid
                );
                self.events.record(LedgerEvent::EmergencyWithdraw {
                    user: *caller,
                    pid,
                    amount,
                    fee: settlement.fee,
                });
            }
            _ => {}
        }
        if settlement.reward.total() > 0 {
            tracing::info!(
                "{} harvested {} from pool {}",
                caller,
                settlement.reward.total(),
                pid
            );
            self.events.record(LedgerEvent::Harvest {
                user: *caller,
                pid,
                user_amount: settlement.reward.user,
                dao_amount: settlement.reward.dao,
                team_amount: settlement.reward.team,
            });
        }
    }
}

impl Authority for SummonerLedger {
    fn grant_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), SoulError> {
        self.governance.grant_role(caller, role, account)
    }

    fn revoke_role(
        &mut self,
        caller: &Address,
        role: Role,
        account: &Address,
    ) -> Result<(), SoulError> {
        self.governance.revoke_role(caller, role, account)
    }

    fn has_role(&self, role: Role, account: &Address) -> bool {
        self.governance.has_role(role, account)
    }
}
