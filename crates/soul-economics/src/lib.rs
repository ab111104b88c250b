// crates/soul-economics/src/lib.rs
//
// soul-economics: SOUL emission, reward pools, withdrawal fee decay, the
// Summoner reward ledger, and the auto-compounding vault.
//
// All monetary values are tracked in wei (the smallest unit of SOUL).
// 1 SOUL = 1,000,000,000,000,000,000 wei (10^18).

pub mod config;
pub mod emission;
pub mod events;
pub mod fees;
pub mod governance;
pub mod pool;
pub mod rewards;
pub mod summoner;
pub mod token;
pub mod vault;

// Re-export key types for ergonomic access from downstream crates.
pub use config::{FeeClockPolicy, LedgerConfig, SummonerConfig, VaultConfig};
pub use emission::{EmissionSchedule, BASE_DAILY_REWARD, SECONDS_PER_DAY};
pub use events::{EventLog, LedgerEvent};
pub use fees::{apply_fee, fee_rate, FeeSchedule, FEE_DENOMINATOR, PERCENT};
pub use governance::GovernanceState;
pub use pool::{PoolInfo, PoolRegistry, STAKING_POOL_ID};
pub use rewards::{split_reward, RewardSplit, UserInfo, ACC_PRECISION};
pub use summoner::{Settlement, SummonerLedger};
pub use token::{to_wei, TokenLedger, WEI_PER_TOKEN};
pub use vault::{CompoundingVault, HarvestOutcome, VaultUser};
