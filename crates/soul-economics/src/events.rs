// crates/soul-economics/src/events.rs
//
// Side effects reported to callers. The Summoner and the vault append one
// event per state change; callers drain and forward them.

use serde::{Deserialize, Serialize};
use soul_core::{Address, Amount, SoulError, Timestamp};

/// A state change recorded by the Summoner or the vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum LedgerEvent {
    PoolAdded {
        pid: usize,
        deposit_token: Address,
        alloc_point: u128,
        fee_days: u64,
    },
    AllocPointUpdated {
        pid: usize,
        alloc_point: u128,
    },
    WeightsUpdated {
        weight: u128,
        total_weight: u128,
        daily_reward: Amount,
    },
    Deposit {
        user: Address,
        pid: usize,
        amount: Amount,
        at: Timestamp,
    },
    Withdraw {
        user: Address,
        pid: usize,
        amount: Amount,
        fee: Amount,
        at: Timestamp,
    },
    EmergencyWithdraw {
        user: Address,
        pid: usize,
        amount: Amount,
        fee: Amount,
    },
    Harvest {
        user: Address,
        pid: usize,
        user_amount: Amount,
        dao_amount: Amount,
        team_amount: Amount,
    },
    AccountsUpdated {
        dao: Address,
        team: Address,
    },
    TeamUpdated {
        team: Address,
    },
    StartRateUpdated {
        start_rate: u128,
    },
    ActiveToggled {
        active: bool,
    },
    VaultDeposit {
        user: Address,
        amount: Amount,
        shares: Amount,
        at: Timestamp,
    },
    VaultWithdraw {
        user: Address,
        amount: Amount,
        shares: Amount,
        fee: Amount,
        at: Timestamp,
    },
    VaultHarvest {
        caller: Address,
        performance_fee: Amount,
        call_fee: Amount,
        at: Timestamp,
    },
    VaultPaused {
        paused: bool,
    },
}

/// Append-only event buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }

    /// Events recorded since the last drain.
    pub fn pending(&self) -> &[LedgerEvent] {
        &self.events
    }

    /// Take every recorded event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<LedgerEvent> {
        std::mem::take(&mut self.events)
    }

    /// Serialize the pending events as a JSON array.
    pub fn to_json(&self) -> Result<String, SoulError> {
        Ok(serde_json::to_string(&self.events)?)
    }
}
