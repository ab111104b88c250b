// crates/soul-economics/src/rewards.rs
//
// Per-pool reward accumulator and harvest split.
//
// Every pool keeps `acc_reward_per_share`, the cumulative reward earned by one
// unit of deposit since the pool was created, scaled by ACC_PRECISION (1e12).
// A user's entitlement is then a single multiplication:
//
//   pending = amount * acc_reward_per_share / 1e12 - reward_debt
//
// where `reward_debt` snapshots `amount * acc / 1e12` at the user's last
// settlement. No per-second or per-user iteration is ever needed.
//
// Harvested rewards are split per mille:
//   user 750 / dao 125 / team 125
// with floor division. The 0-2 units lost to flooring go to the dao (+1) and
// then the team (+1), so the three parts always sum to the harvested amount.

use serde::{Deserialize, Serialize};
use soul_core::{mul_div, Amount, SoulError, Timestamp};

use crate::pool::PoolInfo;

/// Fixed-point scale of `acc_reward_per_share`.
pub const ACC_PRECISION: Amount = 1_000_000_000_000;

/// Denominator of the harvest split.
pub const SPLIT_DENOMINATOR: Amount = 1_000;

/// User share of a harvest, per mille.
pub const USER_SHARE: Amount = 750;

/// Dao share of a harvest, per mille.
pub const DAO_SHARE: Amount = 125;

/// Team share of a harvest, per mille.
pub const TEAM_SHARE: Amount = 125;

/// A user's position in one pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInfo {
    /// Deposit-token units held on the user's behalf.
    pub amount: Amount,
    /// `amount * acc_reward_per_share / 1e12` at the last settlement.
    pub reward_debt: Amount,
    /// Fee-clock anchor for this position.
    pub deposit_time: Timestamp,
    /// Time of the most recent deposit (including top-ups).
    pub last_deposit_time: Timestamp,
    /// Time of the most recent withdrawal, 0 if none.
    pub last_withdraw_time: Timestamp,
    /// Gross reward settled to this position so far (before the dao/team cut).
    pub total_harvested: Amount,
}

impl UserInfo {
    /// `Staked` when `amount > 0`, otherwise `Unstaked`.
    pub fn is_staked(&self) -> bool {
        self.amount > 0
    }
}

/// Reward emitted to one pool over `elapsed` seconds.
///
/// Returns 0 when the pool or the whole registry carries no weight.
pub fn pool_emission(
    elapsed: u64,
    reward_per_second: Amount,
    alloc_point: u128,
    total_alloc_point: u128,
) -> Result<Amount, SoulError> {
    if alloc_point == 0 || total_alloc_point == 0 {
        return Ok(0);
    }
    let gross = reward_per_second
        .checked_mul(elapsed as Amount)
        .ok_or_else(|| SoulError::overflow("pool emission"))?;
    mul_div(gross, alloc_point, total_alloc_point, "pool emission")
}

/// Accumulator value `pool` would hold at `now`, without mutating it.
pub fn projected_acc_reward_per_share(
    pool: &PoolInfo,
    now: Timestamp,
    reward_per_second: Amount,
    total_alloc_point: u128,
) -> Result<Amount, SoulError> {
    if now <= pool.last_reward_time || pool.total_staked == 0 {
        return Ok(pool.acc_reward_per_share);
    }
    let elapsed = now - pool.last_reward_time;
    let reward = pool_emission(elapsed, reward_per_second, pool.alloc_point, total_alloc_point)?;
    let increment = mul_div(reward, ACC_PRECISION, pool.total_staked, "accumulator increment")?;
    pool.acc_reward_per_share
        .checked_add(increment)
        .ok_or_else(|| SoulError::overflow("accumulator"))
}

/// Bring `pool`'s accumulator up to `now`.
///
/// - `now <= last_reward_time`: no-op.
/// - Empty pool: only `last_reward_time` advances; no reward is lost
///   retroactively and nothing is divided by zero.
/// - Otherwise `acc += reward * 1e12 / total_staked`.
///
/// Returns the reward emitted to the pool over the interval. All new values
/// are computed before any field is written.
pub fn update_pool(
    pool: &mut PoolInfo,
    now: Timestamp,
    reward_per_second: Amount,
    total_alloc_point: u128,
) -> Result<Amount, SoulError> {
    if now <= pool.last_reward_time {
        return Ok(0);
    }
    if pool.total_staked == 0 {
        pool.last_reward_time = now;
        return Ok(0);
    }

    let elapsed = now - pool.last_reward_time;
    let reward = pool_emission(elapsed, reward_per_second, pool.alloc_point, total_alloc_point)?;
    let acc = projected_acc_reward_per_share(pool, now, reward_per_second, total_alloc_point)?;
    let accrued = pool
        .accrued_reward
        .checked_add(reward)
        .ok_or_else(|| SoulError::overflow("accrued reward"))?;

    pool.acc_reward_per_share = acc;
    pool.accrued_reward = accrued;
    pool.last_reward_time = now;

    tracing::debug!(
        "Pool update: +{} wei over {}s, acc_reward_per_share={}",
        reward,
        elapsed,
        acc
    );
    Ok(reward)
}

/// `amount * acc / 1e12`, floored.
pub fn accumulated(amount: Amount, acc_reward_per_share: Amount) -> Result<Amount, SoulError> {
    mul_div(amount, acc_reward_per_share, ACC_PRECISION, "accumulated reward")
}

/// Reward owed to `user` at accumulator value `acc_reward_per_share`.
///
/// # Errors
/// Returns `SoulError::Arithmetic` if `reward_debt` exceeds the current
/// entitlement, which would mean the debt was not resynchronised.
pub fn pending(user: &UserInfo, acc_reward_per_share: Amount) -> Result<Amount, SoulError> {
    accumulated(user.amount, acc_reward_per_share)?
        .checked_sub(user.reward_debt)
        .ok_or_else(|| SoulError::Arithmetic("reward debt exceeds entitlement".to_string()))
}

/// Read-only pending reward at `now`. Matches what `update_pool` followed by
/// a settlement would pay at the same timestamp.
pub fn pending_reward(
    pool: &PoolInfo,
    user: &UserInfo,
    now: Timestamp,
    reward_per_second: Amount,
    total_alloc_point: u128,
) -> Result<Amount, SoulError> {
    let acc = projected_acc_reward_per_share(pool, now, reward_per_second, total_alloc_point)?;
    pending(user, acc)
}

/// A harvested amount divided between user, dao, and team.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardSplit {
    pub user: Amount,
    pub dao: Amount,
    pub team: Amount,
}

impl RewardSplit {
    /// Sum of the three parts. Always equals the split amount.
    pub fn total(&self) -> Amount {
        self.user + self.dao + self.team
    }
}

/// Split `amount` 750/125/125 per mille, remainder to dao then team.
pub fn split_reward(amount: Amount) -> Result<RewardSplit, SoulError> {
    let share = |per_mille: Amount| {
        amount
            .checked_mul(per_mille)
            .map(|v| v / SPLIT_DENOMINATOR)
            .ok_or_else(|| SoulError::overflow("reward split"))
    };
    let user = share(USER_SHARE)?;
    let mut dao = share(DAO_SHARE)?;
    let mut team = share(TEAM_SHARE)?;

    // Each floor loses < 1 unit, so the remainder is 0, 1 or 2.
    let remainder = amount - user - dao - team;
    if remainder >= 1 {
        dao += 1;
    }
    if remainder >= 2 {
        team += 1;
    }

    Ok(RewardSplit { user, dao, team })
}

#[cfg(test)]
mod tests {
    use super::*;
    use soul_core::Address;

    fn pool(total_staked: Amount) -> PoolInfo {
        PoolInfo {
            deposit_token: Address::derive("token:LP"),
            alloc_point: 1_000,
            last_reward_time: 100,
            acc_reward_per_share: 0,
            fee_days: 14,
            total_staked,
            accrued_reward: 0,
        }
    }

    #[test]
    fn test_pool_emission_weighted() {
        // 10 wei/s for 100s, half the allocation.
        assert_eq!(pool_emission(100, 10, 500, 1_000).unwrap(), 500);
        assert_eq!(pool_emission(100, 10, 0, 1_000).unwrap(), 0);
        assert_eq!(pool_emission(100, 10, 500, 0).unwrap(), 0);
    }

    #[test]
    fn test_pool_emission_overflow() {
        assert!(matches!(
            pool_emission(u64::MAX, u128::MAX, 1, 1),
            Err(SoulError::Arithmetic(_))
        ));
    }

    #[test]
    fn test_update_pool_noop_in_past() {
        let mut p = pool(1_000);
        let reward = update_pool(&mut p, 100, 10, 1_000).unwrap();
        assert_eq!(reward, 0);
        assert_eq!(p.last_reward_time, 100);
        update_pool(&mut p, 50, 10, 1_000).unwrap();
        assert_eq!(p.last_reward_time, 100);
    }

    #[test]
    fn test_update_empty_pool_only_advances_time() {
        let mut p = pool(0);
        let reward = update_pool(&mut p, 500, 10, 1_000).unwrap();
        assert_eq!(reward, 0);
        assert_eq!(p.last_reward_time, 500);
        assert_eq!(p.acc_reward_per_share, 0);
        assert_eq!(p.accrued_reward, 0);
    }

    #[test]
    fn test_update_pool_increments_accumulator() {
        let mut p = pool(1_000);
        let reward = update_pool(&mut p, 200, 10, 1_000).unwrap();
        assert_eq!(reward, 1_000);
        // 1000 * 1e12 / 1000
        assert_eq!(p.acc_reward_per_share, ACC_PRECISION);
        assert_eq!(p.last_reward_time, 200);
        assert_eq!(p.accrued_reward, 1_000);
    }

    #[test]
    fn test_pending_view_matches_update() {
        let mut p = pool(3_000);
        let user = UserInfo {
            amount: 1_000,
            ..Default::default()
        };
        let view = pending_reward(&p, &user, 777, 13, 1_000).unwrap();
        update_pool(&mut p, 777, 13, 1_000).unwrap();
        assert_eq!(pending(&user, p.acc_reward_per_share).unwrap(), view);
    }

    #[test]
    fn test_accumulated_on_whale_position() {
        // A year of full emission into a pool that held one token, then read
        // against a 10M-token position: the raw product is far past u128.
        let year_of_reward: Amount = 250_000 * 365 * 1_000_000_000_000_000_000;
        let acc = year_of_reward * ACC_PRECISION / 1_000_000_000_000_000_000;
        let amount: Amount = 10_000_000 * 1_000_000_000_000_000_000;
        assert!(amount.checked_mul(acc).is_none());
        assert_eq!(
            accumulated(amount, acc).unwrap(),
            year_of_reward * 10_000_000
        );
    }

    #[test]
    fn test_pending_subtracts_debt() {
        let user = UserInfo {
            amount: 10,
            reward_debt: 5,
            ..Default::default()
        };
        assert_eq!(pending(&user, ACC_PRECISION).unwrap(), 5);
    }

    #[test]
    fn test_pending_rejects_stale_debt() {
        let user = UserInfo {
            amount: 10,
            reward_debt: 11,
            ..Default::default()
        };
        assert!(pending(&user, ACC_PRECISION).is_err());
    }

    #[test]
    fn test_split_exact_thousand() {
        let split = split_reward(1_000_000).unwrap();
        assert_eq!(split.user, 750_000);
        assert_eq!(split.dao, 125_000);
        assert_eq!(split.team, 125_000);
        assert_eq!(split.total(), 1_000_000);
    }

    #[test]
    fn test_split_remainder_goes_to_dao_then_team() {
        // 7 -> user 5, dao 0, team 0, remainder 2
        let split = split_reward(7).unwrap();
        assert_eq!(split, RewardSplit { user: 5, dao: 1, team: 1 });

        // 9 -> user 6, dao 1, team 1, remainder 1
        let split = split_reward(9).unwrap();
        assert_eq!(split, RewardSplit { user: 6, dao: 2, team: 1 });
    }

    #[test]
    fn test_split_always_conserves() {
        for amount in (0..5_000u128).chain([u64::MAX as u128, 250_000 * 10u128.pow(18) + 17]) {
            assert_eq!(split_reward(amount).unwrap().total(), amount);
        }
    }

    #[test]
    fn test_user_state() {
        let mut user = UserInfo::default();
        assert!(!user.is_staked());
        user.amount = 1;
        assert!(user.is_staked());
    }
}
