// crates/soul-economics/src/config.rs
//
// Ledger configuration, loaded from a TOML file or populated with defaults.
//
// Every field is optional in the file; missing fields take the values the
// Summoner and vault ship with.

use std::fs;

use serde::{Deserialize, Serialize};
use soul_core::SoulError;

use crate::emission::{EmissionSchedule, BASE_DAILY_REWARD};
use crate::fees::{FeeSchedule, DEFAULT_DAILY_DECAY_RATE, DEFAULT_FEE_DAYS, DEFAULT_START_RATE};
use crate::token::WEI_PER_TOKEN;
use crate::vault::{
    MAX_CALL_FEE, MAX_PERFORMANCE_FEE, MAX_WITHDRAW_FEE, MAX_WITHDRAW_FEE_PERIOD,
};

/// When a top-up deposit moves a position's fee-clock anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeClockPolicy {
    /// The anchor is set only when a position goes from empty to non-empty.
    #[default]
    PreserveOnTopUp,
    /// Every deposit restarts the fee clock for the whole position.
    ResetOnTopUp,
}

/// Top-level configuration.
///
/// Integer fields use TOML-native widths and are widened to `u128` when the
/// schedules are built.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    #[serde(default)]
    pub summoner: SummonerConfig,

    #[serde(default)]
    pub vault: VaultConfig,
}

/// Emission, fee, and pool-0 parameters of the Summoner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummonerConfig {
    /// Daily emission at full weight, in whole tokens.
    #[serde(default = "default_base_daily_reward")]
    pub base_daily_reward: u64,

    #[serde(default = "default_weight")]
    pub weight: u64,

    #[serde(default = "default_weight")]
    pub total_weight: u64,

    /// Allocation points of the staking pool created at startup.
    #[serde(default = "default_staking_alloc_point")]
    pub staking_alloc_point: u64,

    /// Withdrawal fee at day 0, whole percent.
    #[serde(default = "default_start_fee_rate")]
    pub start_fee_rate: u64,

    /// Percentage points removed from the fee per full day held.
    #[serde(default = "default_daily_decay_rate")]
    pub daily_decay_rate: u64,

    /// Fee window for pools added without an explicit one.
    #[serde(default = "default_fee_days")]
    pub default_fee_days: u64,

    #[serde(default)]
    pub fee_clock_policy: FeeClockPolicy,

    /// Whether deposits are open at startup.
    #[serde(default = "default_true")]
    pub start_active: bool,
}

/// Fees of the compounding vault, in basis points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    #[serde(default = "default_performance_fee")]
    pub performance_fee: u64,

    #[serde(default = "default_call_fee")]
    pub call_fee: u64,

    #[serde(default = "default_withdraw_fee")]
    pub withdraw_fee: u64,

    /// Seconds after a deposit during which the withdraw fee applies.
    #[serde(default = "default_withdraw_fee_period")]
    pub withdraw_fee_period: u64,
}

fn default_base_daily_reward() -> u64 {
    (BASE_DAILY_REWARD / WEI_PER_TOKEN) as u64
}

fn default_weight() -> u64 {
    1_000
}

fn default_staking_alloc_point() -> u64 {
    1_000
}

fn default_start_fee_rate() -> u64 {
    DEFAULT_START_RATE as u64
}

fn default_daily_decay_rate() -> u64 {
    DEFAULT_DAILY_DECAY_RATE as u64
}

fn default_fee_days() -> u64 {
    DEFAULT_FEE_DAYS
}

fn default_true() -> bool {
    true
}

fn default_performance_fee() -> u64 {
    200
}

fn default_call_fee() -> u64 {
    25
}

fn default_withdraw_fee() -> u64 {
    10
}

fn default_withdraw_fee_period() -> u64 {
    72 * 3_600
}

impl Default for SummonerConfig {
    fn default() -> Self {
        Self {
            base_daily_reward: default_base_daily_reward(),
            weight: default_weight(),
            total_weight: default_weight(),
            staking_alloc_point: default_staking_alloc_point(),
            start_fee_rate: default_start_fee_rate(),
            daily_decay_rate: default_daily_decay_rate(),
            default_fee_days: default_fee_days(),
            fee_clock_policy: FeeClockPolicy::default(),
            start_active: default_true(),
        }
    }
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            performance_fee: default_performance_fee(),
            call_fee: default_call_fee(),
            withdraw_fee: default_withdraw_fee(),
            withdraw_fee_period: default_withdraw_fee_period(),
        }
    }
}

impl SummonerConfig {
    /// Emission schedule described by this config.
    pub fn emission_schedule(&self) -> Result<EmissionSchedule, SoulError> {
        let base = u128::from(self.base_daily_reward)
            .checked_mul(WEI_PER_TOKEN)
            .ok_or_else(|| SoulError::overflow("base daily reward"))?;
        EmissionSchedule::new(base, self.weight.into(), self.total_weight.into())
    }

    /// Fee schedule described by this config.
    pub fn fee_schedule(&self) -> Result<FeeSchedule, SoulError> {
        FeeSchedule::from_percent(self.start_fee_rate.into(), self.daily_decay_rate.into())
    }
}

impl VaultConfig {
    pub fn validate(&self) -> Result<(), SoulError> {
        check_cap("performance_fee", self.performance_fee.into(), MAX_PERFORMANCE_FEE)?;
        check_cap("call_fee", self.call_fee.into(), MAX_CALL_FEE)?;
        check_cap("withdraw_fee", self.withdraw_fee.into(), MAX_WITHDRAW_FEE)?;
        if self.withdraw_fee_period > MAX_WITHDRAW_FEE_PERIOD {
            return Err(SoulError::Config(format!(
                "withdraw_fee_period {}s exceeds {}s",
                self.withdraw_fee_period, MAX_WITHDRAW_FEE_PERIOD
            )));
        }
        Ok(())
    }
}

impl LedgerConfig {
    /// Load configuration from a TOML file at the given path.
    ///
    /// Returns `SoulError::Config` if the file cannot be read, parsed, or
    /// fails validation.
    pub fn load(path: &str) -> Result<Self, SoulError> {
        let contents = fs::read_to_string(path)
            .map_err(|e| SoulError::Config(format!("cannot read {}: {}", path, e)))?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, SoulError> {
        let config: LedgerConfig =
            toml::from_str(contents).map_err(|e| SoulError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter against the ranges the ledger accepts.
    pub fn validate(&self) -> Result<(), SoulError> {
        self.summoner
            .emission_schedule()
            .map_err(|e| SoulError::Config(e.to_string()))?;
        self.summoner
            .fee_schedule()
            .map_err(|e| SoulError::Config(e.to_string()))?;
        self.vault.validate()
    }
}

fn check_cap(name: &str, value: u128, cap: u128) -> Result<(), SoulError> {
    if value > cap {
        Err(SoulError::Config(format!(
            "{} {} exceeds cap {}",
            name, value, cap
        )))
    } else {
        Ok(())
    }
}
