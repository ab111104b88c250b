// crates/soul-economics/src/emission.rs
//
// Reward emission rate derived from a governance weight pair.
//
// The Summoner emits a base daily reward (250,000 SOUL) scaled by
// `weight / total_weight`:
//   daily_reward      = BASE_DAILY_REWARD * weight / total_weight
//   reward_per_second = daily_reward / SECONDS_PER_DAY   (floor)
//
// Governance halves emission with `update(500, 1000)`, restores it with
// `update(1000, 1000)`, and so on. The per-pool share of each second's
// emission is `alloc_point / total_alloc_point` (see rewards.rs).

use serde::Serialize;
use soul_core::{Amount, SoulError};

use crate::token::WEI_PER_TOKEN;

/// Seconds in one day.
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Emission per day at full weight: 250,000 SOUL.
pub const BASE_DAILY_REWARD: Amount = 250_000 * WEI_PER_TOKEN;

/// Upper bound on `total_weight`, keeping `base * weight` inside u128.
pub const MAX_TOTAL_WEIGHT: u128 = 1_000_000;

/// Current emission parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmissionSchedule {
    /// Daily emission when `weight == total_weight`, in wei.
    base_daily_reward: Amount,
    weight: u128,
    total_weight: u128,
}

impl EmissionSchedule {
    /// Create a schedule.
    ///
    /// # Errors
    /// Returns `SoulError::InvalidParameter` if `total_weight` is zero or above
    /// `MAX_TOTAL_WEIGHT`, or `weight > total_weight`; `SoulError::Arithmetic`
    /// if the base reward is too large to scale.
    pub fn new(base_daily_reward: Amount, weight: u128, total_weight: u128) -> Result<Self, SoulError> {
        validate_weights(weight, total_weight)?;
        if base_daily_reward.checked_mul(MAX_TOTAL_WEIGHT).is_none() {
            return Err(SoulError::overflow("base daily reward"));
        }
        Ok(Self {
            base_daily_reward,
            weight,
            total_weight,
        })
    }

    /// Replace the weight pair. Callers settle every pool first.
    pub fn update(&mut self, weight: u128, total_weight: u128) -> Result<(), SoulError> {
        validate_weights(weight, total_weight)?;
        self.weight = weight;
        self.total_weight = total_weight;
        Ok(())
    }

    /// Daily emission in wei.
    pub fn daily_reward(&self) -> Amount {
        // weight <= total_weight <= MAX_TOTAL_WEIGHT, checked at construction.
        self.base_daily_reward * self.weight / self.total_weight
    }

    /// Emission per second in wei (floor of `daily_reward / 86_400`).
    pub fn reward_per_second(&self) -> Amount {
        self.daily_reward() / SECONDS_PER_DAY as Amount
    }

    pub fn weight(&self) -> u128 {
        self.weight
    }

    pub fn total_weight(&self) -> u128 {
        self.total_weight
    }

    pub fn base_daily_reward(&self) -> Amount {
        self.base_daily_reward
    }
}

impl Default for EmissionSchedule {
    fn default() -> Self {
        Self {
            base_daily_reward: BASE_DAILY_REWARD,
            weight: 1_000,
            total_weight: 1_000,
        }
    }
}

fn validate_weights(weight: u128, total_weight: u128) -> Result<(), SoulError> {
    if total_weight == 0 || total_weight > MAX_TOTAL_WEIGHT {
        return Err(SoulError::InvalidParameter(format!(
            "total weight must be in 1..={}, got {}",
            MAX_TOTAL_WEIGHT, total_weight
        )));
    }
    if weight > total_weight {
        return Err(SoulError::InvalidParameter(format!(
            "weight {} exceeds total weight {}",
            weight, total_weight
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::to_wei;

    #[test]
    fn test_full_weight_daily_reward() {
        let schedule = EmissionSchedule::default();
        assert_eq!(schedule.daily_reward(), to_wei(250_000));
    }

    #[test]
    fn test_halved_daily_reward() {
        let mut schedule = EmissionSchedule::default();
        schedule.update(500, 1_000).unwrap();
        assert_eq!(schedule.daily_reward(), to_wei(125_000));
    }

    #[test]
    fn test_halved_reward_per_second() {
        let mut schedule = EmissionSchedule::default();
        let before = schedule.reward_per_second();
        schedule.update(500, 1_000).unwrap();
        assert_eq!(schedule.reward_per_second(), before / 2);
    }

    #[test]
    fn test_reward_per_second_floors() {
        let schedule = EmissionSchedule::default();
        let rps = schedule.reward_per_second();
        assert!(rps * SECONDS_PER_DAY as Amount <= schedule.daily_reward());
        assert!(schedule.daily_reward() - rps * (SECONDS_PER_DAY as Amount) < SECONDS_PER_DAY as Amount);
    }

    #[test]
    fn test_zero_weight_stops_emission() {
        let schedule = EmissionSchedule::new(BASE_DAILY_REWARD, 0, 1_000).unwrap();
        assert_eq!(schedule.reward_per_second(), 0);
    }

    #[test]
    fn test_invalid_weights() {
        assert!(EmissionSchedule::new(BASE_DAILY_REWARD, 1, 0).is_err());
        assert!(EmissionSchedule::new(BASE_DAILY_REWARD, 1_001, 1_000).is_err());
        assert!(EmissionSchedule::new(BASE_DAILY_REWARD, 1, MAX_TOTAL_WEIGHT + 1).is_err());
        assert!(EmissionSchedule::new(u128::MAX, 1, 1_000).is_err());

        let mut schedule = EmissionSchedule::default();
        assert!(schedule.update(2_000, 1_000).is_err());
        assert_eq!(schedule.weight(), 1_000);
    }
}
