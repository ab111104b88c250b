// crates/soul-economics/src/pool.rs
//
// Ordered registry of reward pools.
//
// Pool ids are assigned sequentially; insertion order is iteration order.
// Pool 0 is the staking pool, whose deposit token is the reward token itself.
// Each deposit token may back at most one pool.
//
// Weight changes (`add_pool`, `set_alloc_point`) can first bring every pool's
// accumulator up to date ("mass update") so that emission already earned under
// the old weights is not redistributed under the new ones.

use serde::{Deserialize, Serialize};
use soul_core::{Address, Amount, SoulError, Timestamp};

use crate::rewards;

/// Id of the staking pool.
pub const STAKING_POOL_ID: usize = 0;

/// A registered deposit-token bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolInfo {
    /// Address of the token users deposit into this pool.
    pub deposit_token: Address,
    /// Share of global emission: `alloc_point / total_alloc_point`.
    pub alloc_point: u128,
    /// Last time the accumulator was brought up to date.
    pub last_reward_time: Timestamp,
    /// Cumulative reward per deposited unit, scaled by 1e12. Never decreases.
    pub acc_reward_per_share: Amount,
    /// Length of the withdrawal-fee decay window, in days.
    pub fee_days: u64,
    /// Deposit-token units held for all users of this pool.
    pub total_staked: Amount,
    /// Reward emitted to this pool so far.
    pub accrued_reward: Amount,
}

/// Sequential collection of pools plus the global weight sum.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PoolRegistry {
    pools: Vec<PoolInfo>,
    total_alloc_point: u128,
}

impl PoolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new pool and return its id.
    ///
    /// When `with_update` is set, every existing pool is updated to `now` at
    /// the current weights before the new weight is added.
    ///
    /// # Errors
    /// Returns `SoulError::DuplicatePool` if `deposit_token` already backs a
    /// pool (nothing is updated in that case), or `SoulError::Arithmetic` if
    /// the weight sum overflows.
    pub fn add_pool(
        &mut self,
        alloc_point: u128,
        deposit_token: Address,
        with_update: bool,
        fee_days: u64,
        now: Timestamp,
        reward_per_second: Amount,
    ) -> Result<usize, SoulError> {
        if let Some(existing) = self.position_of(&deposit_token) {
            return Err(SoulError::DuplicatePool(format!(
                "token {} already backs pool {}",
                deposit_token, existing
            )));
        }
        let total_alloc_point = self
            .total_alloc_point
            .checked_add(alloc_point)
            .ok_or_else(|| SoulError::overflow("total alloc point"))?;

        if with_update {
            self.mass_update(now, reward_per_second)?;
        }

        self.pools.push(PoolInfo {
            deposit_token,
            alloc_point,
            last_reward_time: now,
            acc_reward_per_share: 0,
            fee_days,
            total_staked: 0,
            accrued_reward: 0,
        });
        self.total_alloc_point = total_alloc_point;
        Ok(self.pools.len() - 1)
    }

    /// Change a pool's weight.
    ///
    /// # Errors
    /// Returns `SoulError::PoolNotFound` for an unknown id.
    pub fn set_alloc_point(
        &mut self,
        pid: usize,
        alloc_point: u128,
        with_update: bool,
        now: Timestamp,
        reward_per_second: Amount,
    ) -> Result<(), SoulError> {
        let previous = self.pool(pid)?.alloc_point;
        let total_alloc_point = (self.total_alloc_point - previous)
            .checked_add(alloc_point)
            .ok_or_else(|| SoulError::overflow("total alloc point"))?;

        if with_update {
            self.mass_update(now, reward_per_second)?;
        }

        self.pools[pid].alloc_point = alloc_point;
        self.total_alloc_point = total_alloc_point;
        Ok(())
    }

    /// Update one pool's accumulator to `now`. Returns the reward emitted.
    pub fn update_pool(
        &mut self,
        pid: usize,
        now: Timestamp,
        reward_per_second: Amount,
    ) -> Result<Amount, SoulError> {
        let total_alloc_point = self.total_alloc_point;
        let pool = self.pool_mut(pid)?;
        rewards::update_pool(pool, now, reward_per_second, total_alloc_point)
    }

    /// Update every pool to `now`. All-or-nothing: on error no pool changes.
    pub fn mass_update(
        &mut self,
        now: Timestamp,
        reward_per_second: Amount,
    ) -> Result<Amount, SoulError> {
        let mut updated = self.pools.clone();
        let mut emitted: Amount = 0;
        for pool in updated.iter_mut() {
            let reward =
                rewards::update_pool(pool, now, reward_per_second, self.total_alloc_point)?;
            emitted = emitted
                .checked_add(reward)
                .ok_or_else(|| SoulError::overflow("mass update"))?;
        }
        self.pools = updated;
        Ok(emitted)
    }

    /// Look up a pool.
    ///
    /// # Errors
    /// Returns `SoulError::PoolNotFound` for an unknown id.
    pub fn pool(&self, pid: usize) -> Result<&PoolInfo, SoulError> {
        self.pools.get(pid).ok_or(SoulError::PoolNotFound(pid))
    }

    pub(crate) fn pool_mut(&mut self, pid: usize) -> Result<&mut PoolInfo, SoulError> {
        self.pools.get_mut(pid).ok_or(SoulError::PoolNotFound(pid))
    }

    /// Id of the pool backed by `deposit_token`, if any.
    pub fn position_of(&self, deposit_token: &Address) -> Option<usize> {
        self.pools
            .iter()
            .position(|p| p.deposit_token == *deposit_token)
    }

    /// Number of registered pools.
    pub fn pool_length(&self) -> usize {
        self.pools.len()
    }

    /// Sum of every pool's `alloc_point`.
    pub fn total_alloc_point(&self) -> u128 {
        self.total_alloc_point
    }

    /// All pools in id order.
    pub fn pools(&self) -> &[PoolInfo] {
        &self.pools
    }
}
