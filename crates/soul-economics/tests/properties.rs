// crates/soul-economics/tests/properties.rs
//
// Property tests: random operation sequences against the Summoner, checking
// conservation and accumulator monotonicity after every step.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;
use soul_core::{Address, Amount, Authority, FungibleToken, Role, SoulError, Timestamp};
use soul_economics::{split_reward, to_wei, SummonerConfig, SummonerLedger, TokenLedger};

const T0: Timestamp = 10_000;
const USERS: usize = 3;

#[derive(Debug, Clone)]
enum Op {
    Deposit(usize, Amount),
    Withdraw(usize, u8),
    Stake(usize, Amount),
    Unstake(usize, u8),
    Harvest(usize),
    Emergency(usize, bool),
    Advance(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..USERS, 0..to_wei(60_000)).prop_map(|(u, a)| Op::Deposit(u, a)),
        (0..USERS, 0u8..=100).prop_map(|(u, p)| Op::Withdraw(u, p)),
        (0..USERS, 0..to_wei(60_000)).prop_map(|(u, a)| Op::Stake(u, a)),
        (0..USERS, 0u8..=100).prop_map(|(u, p)| Op::Unstake(u, p)),
        (0..USERS).prop_map(Op::Harvest),
        (0..USERS, any::<bool>()).prop_map(|(u, staking)| Op::Emergency(u, staking)),
        (0u64..3 * 86_400).prop_map(Op::Advance),
    ]
}

struct Model {
    ledger: SummonerLedger,
    soul: Rc<RefCell<TokenLedger>>,
    seance: Rc<RefCell<TokenLedger>>,
    lp: Rc<RefCell<TokenLedger>>,
    users: Vec<Address>,
    initial_soul_supply: Amount,
}

fn admin() -> Address {
    Address::derive("admin")
}

fn model() -> Model {
    let soul = Rc::new(RefCell::new(TokenLedger::reward_token(admin())));
    let seance = Rc::new(RefCell::new(TokenLedger::receipt_token(admin())));
    let lp = Rc::new(RefCell::new(TokenLedger::with_supply("LP", admin(), to_wei(1_000_000))));
    let mut ledger = SummonerLedger::new(
        admin(),
        Address::derive("dao"),
        Address::derive("team"),
        soul.clone(),
        seance.clone(),
        &SummonerConfig::default(),
        T0,
    )
    .unwrap();
    let summoner = ledger.address();
    soul.borrow_mut()
        .grant_role(&admin(), Role::Minter, &summoner)
        .unwrap();
    seance
        .borrow_mut()
        .grant_role(&admin(), Role::Operator, &summoner)
        .unwrap();
    ledger
        .add_pool(&admin(), 3_000, lp.clone(), false, Some(14), T0)
        .unwrap();

    let users: Vec<Address> = (0..USERS)
        .map(|i| Address::derive(&format!("user{}", i)))
        .collect();
    for user in &users {
        let mut soul = soul.borrow_mut();
        soul.mint(&admin(), user, to_wei(100_000)).unwrap();
        soul.approve(user, &summoner, u128::MAX).unwrap();
        let mut lp = lp.borrow_mut();
        lp.transfer(&admin(), user, to_wei(100_000)).unwrap();
        lp.approve(user, &summoner, u128::MAX).unwrap();
    }
    let initial_soul_supply = soul.borrow().total_supply();

    Model {
        ledger,
        soul,
        seance,
        lp,
        users,
        initial_soul_supply,
    }
}

/// A random history may run a user out of tokens; nothing else may fail.
fn expect_ok_or_short<T>(op: &Op, result: Result<T, SoulError>) {
    match result {
        Ok(_) => {}
        Err(SoulError::InsufficientBalance { .. }) => {
            assert!(
                matches!(op, Op::Deposit(..) | Op::Stake(..)),
                "{:?} ran short of balance",
                op
            );
        }
        Err(e) => panic!("{:?} failed: {}", op, e),
    }
}

impl Model {
    fn apply(&mut self, op: &Op, now: &mut Timestamp) {
        match *op {
            Op::Deposit(u, amount) => {
                let result = self.ledger.deposit(&self.users[u], 1, amount, *now);
                expect_ok_or_short(op, result);
            }
            Op::Withdraw(u, pct) => {
                let staked = self.ledger.user_info(1, &self.users[u]).amount;
                let result = self
                    .ledger
                    .withdraw(&self.users[u], 1, staked * pct as Amount / 100, *now);
                expect_ok_or_short(op, result);
            }
            Op::Stake(u, amount) => {
                let result = self.ledger.enter_staking(&self.users[u], amount, *now);
                expect_ok_or_short(op, result);
            }
            Op::Unstake(u, pct) => {
                let staked = self.ledger.user_info(0, &self.users[u]).amount;
                let result = self
                    .ledger
                    .leave_staking(&self.users[u], staked * pct as Amount / 100, *now);
                expect_ok_or_short(op, result);
            }
            Op::Harvest(u) => {
                let result = self.ledger.withdraw(&self.users[u], 1, 0, *now);
                expect_ok_or_short(op, result);
            }
            Op::Emergency(u, staking) => {
                let pid = if staking { 0 } else { 1 };
                let result = self.ledger.emergency_withdraw(&self.users[u], pid, *now);
                expect_ok_or_short(op, result);
            }
            Op::Advance(secs) => *now += secs,
        }
    }

    fn check_conservation(&self) {
        let ledger_account = self.ledger.address();
        for pid in 0..self.ledger.pool_length() {
            let positions: Amount = self
                .users
                .iter()
                .map(|u| self.ledger.user_info(pid, u).amount)
                .sum();
            assert_eq!(self.ledger.pool(pid).unwrap().total_staked, positions);
        }

        let staked_lp = self.ledger.pool(1).unwrap().total_staked;
        let staked_soul = self.ledger.pool(0).unwrap().total_staked;
        assert_eq!(self.lp.borrow().balance_of(&ledger_account), staked_lp);
        assert_eq!(self.soul.borrow().balance_of(&ledger_account), staked_soul);
        assert_eq!(self.seance.borrow().total_supply(), staked_soul);

        let minted = self.soul.borrow().total_supply() - self.initial_soul_supply;
        let harvested: Amount = (0..self.ledger.pool_length())
            .flat_map(|pid| self.users.iter().map(move |u| (pid, u)))
            .map(|(pid, u)| self.ledger.user_info(pid, u).total_harvested)
            .sum();
        assert_eq!(minted, harvested);

        let emitted: Amount = (0..self.ledger.pool_length())
            .map(|pid| self.ledger.pool(pid).unwrap().accrued_reward)
            .sum();
        assert!(minted <= emitted);
    }
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        .. ProptestConfig::default()
    })]

    /// Supply and positions stay consistent over arbitrary histories,
    /// including rejected operations.
    #[test]
    fn pbt_summoner_conserves_tokens(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut m = model();
        let mut now = T0;
        for op in &ops {
            m.apply(op, &mut now);
            m.check_conservation();
        }
    }

    /// Pool accumulators never decrease and `last_reward_time` never moves back.
    #[test]
    fn pbt_accumulator_is_monotonic(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let mut m = model();
        let mut now = T0;
        let mut last: Vec<(Amount, Timestamp)> = (0..m.ledger.pool_length())
            .map(|pid| {
                let p = m.ledger.pool(pid).unwrap();
                (p.acc_reward_per_share, p.last_reward_time)
            })
            .collect();
        for op in &ops {
            m.apply(op, &mut now);
            for pid in 0..m.ledger.pool_length() {
                let p = m.ledger.pool(pid).unwrap();
                prop_assert!(p.acc_reward_per_share >= last[pid].0);
                prop_assert!(p.last_reward_time >= last[pid].1);
                last[pid] = (p.acc_reward_per_share, p.last_reward_time);
            }
        }
    }

    /// A harvest pays exactly what the read-only view promised, split
    /// 750/125/125 with nothing lost.
    #[test]
    fn pbt_harvest_matches_pending_view(
        amount in 1..to_wei(50_000),
        elapsed in 1u64..30 * 86_400,
    ) {
        let mut m = model();
        let user = m.users[0];
        m.ledger.deposit(&user, 1, amount, T0).unwrap();
        let view = m.ledger.pending_reward(1, &user, T0 + elapsed).unwrap();
        let settlement = m.ledger.withdraw(&user, 1, 0, T0 + elapsed).unwrap();
        prop_assert_eq!(settlement.reward.total(), view);
        prop_assert_eq!(settlement.reward, split_reward(view).unwrap());
    }
}
