// crates/soul-economics/tests/vault_flow.rs
//
// Compounding vault driven over several days with two depositors.

use std::cell::RefCell;
use std::rc::Rc;

use soul_core::{Address, Authority, FungibleToken, Role, Timestamp};
use soul_economics::{
    to_wei, CompoundingVault, LedgerConfig, SummonerLedger, TokenLedger, SECONDS_PER_DAY,
    STAKING_POOL_ID, WEI_PER_TOKEN,
};

const T0: Timestamp = 1_650_000_000;
const DAY: Timestamp = SECONDS_PER_DAY;

struct Setup {
    ledger: SummonerLedger,
    vault: CompoundingVault,
    soul: Rc<RefCell<TokenLedger>>,
}

fn admin() -> Address {
    Address::derive("admin")
}

fn treasury() -> Address {
    Address::derive("treasury")
}

fn setup(config: &LedgerConfig, users: &[Address]) -> Setup {
    let soul = Rc::new(RefCell::new(TokenLedger::reward_token(admin())));
    let seance = Rc::new(RefCell::new(TokenLedger::receipt_token(admin())));
    let ledger = SummonerLedger::new(
        admin(),
        Address::derive("dao"),
        Address::derive("team"),
        soul.clone(),
        seance.clone(),
        &config.summoner,
        T0,
    )
    .unwrap();
    soul.borrow_mut()
        .grant_role(&admin(), Role::Minter, &ledger.address())
        .unwrap();
    seance
        .borrow_mut()
        .grant_role(&admin(), Role::Operator, &ledger.address())
        .unwrap();

    let vault = CompoundingVault::new(admin(), treasury(), &ledger, &config.vault).unwrap();
    for user in users {
        let mut soul = soul.borrow_mut();
        soul.mint(&admin(), user, to_wei(50_000)).unwrap();
        soul.approve(user, &vault.address(), u128::MAX).unwrap();
    }
    Setup { ledger, vault, soul }
}

#[test]
fn test_compounding_rewards_late_depositor_with_fewer_shares() {
    let alice = Address::derive("alice");
    let bob = Address::derive("bob");
    let keeper = Address::derive("keeper");
    let mut s = setup(&LedgerConfig::default(), &[alice, bob]);

    let alice_shares = s.vault.deposit(&mut s.ledger, &alice, to_wei(1_000), T0).unwrap();
    assert_eq!(alice_shares, to_wei(1_000));

    let outcome = s.vault.harvest(&mut s.ledger, &keeper, T0 + DAY).unwrap();
    assert!(outcome.collected > 0);
    assert_eq!(s.soul.borrow().balance_of(&keeper), outcome.call_fee);
    let price = s.vault.price_per_full_share(&s.ledger).unwrap();
    assert!(price > WEI_PER_TOKEN);

    let bob_shares = s.vault.deposit(&mut s.ledger, &bob, to_wei(1_000), T0 + DAY).unwrap();
    assert!(bob_shares < alice_shares);
    // Bob's shares are worth what he put in, less share rounding (at most
    // one share's worth of wei).
    let bob_value = s.vault.underlying_of(&s.ledger, &bob).unwrap();
    assert!(bob_value <= to_wei(1_000));
    assert!(to_wei(1_000) - bob_value <= price / WEI_PER_TOKEN + 2);

    for day in 2..=4 {
        s.vault.harvest(&mut s.ledger, &keeper, T0 + day * DAY).unwrap();
    }

    let exit = T0 + 5 * DAY;
    let alice_paid = s.vault.withdraw_all(&mut s.ledger, &alice, exit).unwrap();
    let bob_paid = s.vault.withdraw_all(&mut s.ledger, &bob, exit).unwrap();
    assert!(alice_paid > bob_paid);
    assert!(bob_paid > to_wei(1_000));

    assert_eq!(s.vault.total_shares(), 0);
    assert_eq!(
        s.ledger.user_info(STAKING_POOL_ID, &s.vault.address()).amount,
        0
    );
    assert!(s.soul.borrow().balance_of(&treasury()) > 0);
}

#[test]
fn test_share_price_tracks_restaked_rewards() {
    let alice = Address::derive("alice");
    let mut s = setup(&LedgerConfig::default(), &[alice]);
    s.vault.deposit(&mut s.ledger, &alice, to_wei(10_000), T0).unwrap();

    let outcome = s.vault.harvest(&mut s.ledger, &alice, T0 + DAY).unwrap();
    let staked = s.ledger.user_info(STAKING_POOL_ID, &s.vault.address()).amount;
    assert_eq!(staked, to_wei(10_000) + outcome.restaked);
    assert_eq!(
        s.vault.price_per_full_share(&s.ledger).unwrap(),
        staked * WEI_PER_TOKEN / to_wei(10_000)
    );
    assert_eq!(s.vault.balance_of(&s.ledger).unwrap(), staked);
}

#[test]
fn test_configured_fees_apply() {
    let config = LedgerConfig::from_toml_str(
        r#"
        [vault]
        performance_fee = 500
        call_fee = 100
        withdraw_fee = 100
        withdraw_fee_period = 3600
        "#,
    )
    .unwrap();
    let alice = Address::derive("alice");
    let mut s = setup(&config, &[alice]);
    s.vault.deposit(&mut s.ledger, &alice, to_wei(1_000), T0).unwrap();

    let outcome = s.vault.harvest(&mut s.ledger, &alice, T0 + 1_800).unwrap();
    assert_eq!(outcome.performance_fee, outcome.collected * 5 / 100);
    assert_eq!(outcome.call_fee, outcome.collected / 100);

    // Window is one hour from the deposit.
    let shares = s.vault.user_info(&alice).shares;
    let before = s.vault.underlying_of(&s.ledger, &alice).unwrap();
    let paid = s.vault.withdraw(&mut s.ledger, &alice, shares / 2, T0 + 1_800).unwrap();
    assert_eq!(paid, before / 2 - (before / 2) / 100);

    let paid = s.vault.withdraw_all(&mut s.ledger, &alice, T0 + 3_600).unwrap();
    assert!(paid >= before / 2);
}
