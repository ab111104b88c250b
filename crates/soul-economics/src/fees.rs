// crates/soul-economics/src/fees.rs
//
// Withdrawal fee schedule keyed to deposit age.
//
// Rates are percentages scaled by 1e18 (14% = 14 * 10^18). For every pool
// except the staking pool (pool 0) the fee starts at `start_rate` and drops
// by `daily_decay_rate` per full day held:
//
//   day  0 -> 14%
//   day  1 -> 13%
//   day  7 ->  7%
//   day 14 ->  0%   (and every day after)
//
// The rate never goes below zero and is exactly zero from the end of the
// pool's `fee_days` window onward. Collected fees are routed to the dao.

use serde::{Deserialize, Serialize};
use soul_core::{mul_div, Amount, SoulError, Timestamp};

use crate::emission::SECONDS_PER_DAY;
use crate::pool::STAKING_POOL_ID;

/// Scale of one percentage point.
pub const PERCENT: Amount = 1_000_000_000_000_000_000;

/// Denominator for applying a scaled rate: 100%.
pub const FEE_DENOMINATOR: Amount = 100 * PERCENT;

/// Default starting fee: 14%.
pub const DEFAULT_START_RATE: u128 = 14;

/// Default decay: one percentage point per day.
pub const DEFAULT_DAILY_DECAY_RATE: u128 = 1;

/// Default fee window: 14 days.
pub const DEFAULT_FEE_DAYS: u64 = 14;

/// Compute the withdrawal fee rate for a pool.
///
/// Pure function of its arguments. Pool 0 always returns 0.
///
/// # Arguments
/// - `pid`: Pool id.
/// - `elapsed`: Seconds since the position's fee-clock anchor.
/// - `start_rate`: Scaled rate at day 0.
/// - `daily_decay_rate`: Scaled rate removed per full day.
/// - `fee_days`: Window length; the rate is 0 at and beyond it.
pub fn fee_rate(
    pid: usize,
    elapsed: Timestamp,
    start_rate: Amount,
    daily_decay_rate: Amount,
    fee_days: u64,
) -> Amount {
    if pid == STAKING_POOL_ID {
        return 0;
    }
    let days = elapsed / SECONDS_PER_DAY;
    if days >= fee_days {
        return 0;
    }
    // Floor at zero: an aggressive decay may cross zero inside the window.
    match daily_decay_rate.checked_mul(days as Amount) {
        Some(decay) => start_rate.saturating_sub(decay),
        None => 0,
    }
}

/// Split `amount` into `(net, fee)` at a scaled `rate`.
///
/// # Errors
/// Returns `SoulError::InvalidParameter` if `rate` exceeds 100%.
pub fn apply_fee(amount: Amount, rate: Amount) -> Result<(Amount, Amount), SoulError> {
    if rate > FEE_DENOMINATOR {
        return Err(SoulError::InvalidParameter(format!(
            "fee rate {} exceeds 100%",
            rate
        )));
    }
    // rate <= FEE_DENOMINATOR, so fee <= amount.
    let fee = mul_div(amount, rate, FEE_DENOMINATOR, "fee")?;
    Ok((amount - fee, fee))
}

/// Governance-tunable fee parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Scaled rate at day 0.
    start_rate: Amount,
    /// Scaled rate removed per full day.
    daily_decay_rate: Amount,
}

impl FeeSchedule {
    /// Build a schedule from whole percentages (e.g. `14`, `1`).
    ///
    /// # Errors
    /// Returns `SoulError::InvalidParameter` if either percentage exceeds 100.
    pub fn from_percent(start_rate: u128, daily_decay_rate: u128) -> Result<Self, SoulError> {
        Ok(Self {
            start_rate: percent(start_rate)?,
            daily_decay_rate: percent(daily_decay_rate)?,
        })
    }

    /// Rate for `pid` after `elapsed` seconds in a `fee_days` window.
    pub fn rate(&self, pid: usize, elapsed: Timestamp, fee_days: u64) -> Amount {
        fee_rate(pid, elapsed, self.start_rate, self.daily_decay_rate, fee_days)
    }

    /// Replace the starting rate, given in whole percent.
    pub fn set_start_rate(&mut self, start_rate: u128) -> Result<(), SoulError> {
        self.start_rate = percent(start_rate)?;
        Ok(())
    }

    pub fn start_rate(&self) -> Amount {
        self.start_rate
    }

    pub fn daily_decay_rate(&self) -> Amount {
        self.daily_decay_rate
    }
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            start_rate: DEFAULT_START_RATE * PERCENT,
            daily_decay_rate: DEFAULT_DAILY_DECAY_RATE * PERCENT,
        }
    }
}

fn percent(whole: u128) -> Result<Amount, SoulError> {
    if whole > 100 {
        return Err(SoulError::InvalidParameter(format!(
            "rate {}% exceeds 100%",
            whole
        )));
    }
    Ok(whole * PERCENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::to_wei;

    const ONE_DAY: Timestamp = 86_400;

    fn schedule() -> FeeSchedule {
        FeeSchedule::default()
    }

    #[test]
    fn test_staking_pool_is_fee_free() {
        for elapsed in [0, ONE_DAY, 7 * ONE_DAY, 30 * ONE_DAY] {
            assert_eq!(schedule().rate(0, elapsed, DEFAULT_FEE_DAYS), 0);
        }
    }

    #[test]
    fn test_start_rate_at_zero() {
        assert_eq!(schedule().rate(1, 0, DEFAULT_FEE_DAYS), 14 * PERCENT);
    }

    #[test]
    fn test_day_one_is_13_percent() {
        assert_eq!(schedule().rate(1, ONE_DAY, DEFAULT_FEE_DAYS), 13 * PERCENT);
        // Partial days do not count.
        assert_eq!(schedule().rate(1, ONE_DAY - 1, DEFAULT_FEE_DAYS), 14 * PERCENT);
    }

    #[test]
    fn test_day_seven_is_7_percent() {
        assert_eq!(schedule().rate(2, 7 * ONE_DAY, DEFAULT_FEE_DAYS), 7 * PERCENT);
    }

    #[test]
    fn test_window_boundary_is_exactly_zero() {
        assert_eq!(schedule().rate(1, 14 * ONE_DAY, DEFAULT_FEE_DAYS), 0);
        assert_eq!(schedule().rate(1, 14 * ONE_DAY - 1, DEFAULT_FEE_DAYS), PERCENT);
        assert_eq!(schedule().rate(1, 400 * ONE_DAY, DEFAULT_FEE_DAYS), 0);
    }

    #[test]
    fn test_short_window_cuts_off_early() {
        assert_eq!(schedule().rate(1, 3 * ONE_DAY, 3), 0);
        assert_eq!(schedule().rate(1, 2 * ONE_DAY, 3), 12 * PERCENT);
    }

    #[test]
    fn test_rate_floors_at_zero() {
        let fees = FeeSchedule::from_percent(7, 1).unwrap();
        assert_eq!(fees.rate(1, 10 * ONE_DAY, DEFAULT_FEE_DAYS), 0);
    }

    #[test]
    fn test_apply_fee_day_one() {
        let (net, fee) = apply_fee(to_wei(100_000), 13 * PERCENT).unwrap();
        assert_eq!(net, to_wei(87_000));
        assert_eq!(fee, to_wei(13_000));
    }

    #[test]
    fn test_apply_fee_at_full_start_rate_on_large_amounts() {
        let (net, fee) = apply_fee(to_wei(10_000_000), 14 * PERCENT).unwrap();
        assert_eq!(fee, to_wei(1_400_000));
        assert_eq!(net + fee, to_wei(10_000_000));

        let (net, fee) = apply_fee(to_wei(25), 14 * PERCENT).unwrap();
        assert_eq!(fee, to_wei(25) * 14 / 100);
        assert_eq!(net, to_wei(25) - fee);
    }

    #[test]
    fn test_apply_fee_full_rate_takes_everything() {
        let (net, fee) = apply_fee(to_wei(500), FEE_DENOMINATOR).unwrap();
        assert_eq!((net, fee), (0, to_wei(500)));
    }

    #[test]
    fn test_apply_fee_zero_rate() {
        let (net, fee) = apply_fee(12_345, 0).unwrap();
        assert_eq!((net, fee), (12_345, 0));
    }

    #[test]
    fn test_apply_fee_rejects_over_100_percent() {
        assert!(apply_fee(100, FEE_DENOMINATOR + 1).is_err());
    }

    #[test]
    fn test_update_start_rate() {
        let mut fees = schedule();
        fees.set_start_rate(7).unwrap();
        assert_eq!(fees.start_rate(), 7 * PERCENT);
        assert!(fees.set_start_rate(101).is_err());
        assert_eq!(fees.start_rate(), 7 * PERCENT);
    }
}
