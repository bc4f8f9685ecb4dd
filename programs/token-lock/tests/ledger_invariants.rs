use anchor_lang::prelude::Pubkey;
use proptest::prelude::*;

use token_lock::error::VestingError;
use token_lock::state::{LedgerState, Registry};

const T0: i64 = 1_700_000_000;

/// A recipient schedule: up to 6 (delay, amount) pairs.
fn schedule() -> impl Strategy<Value = Vec<(u64, u64)>> {
    prop::collection::vec((0u64..1_000, 0u64..1_000_000), 0..6)
}

#[derive(Clone, Debug)]
enum Op {
    Advance(i64),
    Withdraw { who: usize, amount: u64 },
    WithdrawAll,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..400).prop_map(Op::Advance),
        (0usize..4, 0u64..2_000_000).prop_map(|(who, amount)| Op::Withdraw { who, amount }),
        Just(Op::WithdrawAll),
    ]
}

struct Ledger {
    st: LedgerState,
    registry: Registry,
    admin: Pubkey,
    wallets: Vec<Pubkey>,
    custody: u64,
    now: i64,
}

impl Ledger {
    fn funded(schedules: &[Vec<(u64, u64)>], surplus: u64) -> Self {
        let admin = Pubkey::new_unique();
        let mut st = LedgerState::new(admin, Pubkey::new_unique(), Pubkey::new_unique(), 255, 254);
        let mut registry = Registry::new(Pubkey::new_unique());
        let cap = st.admin_capability(&admin).unwrap();
        let mut wallets = Vec::new();
        for s in schedules {
            let wallet = Pubkey::new_unique();
            let delays: Vec<u64> = s.iter().map(|(d, _)| *d).collect();
            let amounts: Vec<u64> = s.iter().map(|(_, a)| *a).collect();
            registry
                .register_schedule(&mut st, &cap, wallet, &delays, &amounts)
                .unwrap();
            wallets.push(wallet);
        }
        let custody = st.total_outstanding + surplus;
        let digest = registry.schedule_digest();
        st.activate(&cap, custody, T0, digest).unwrap();
        Self {
            st,
            registry,
            admin,
            wallets,
            custody,
            now: T0,
        }
    }

    fn check(&self) {
        assert_eq!(self.registry.total_remaining().unwrap(), self.st.total_outstanding);
        for r in self.registry.recipients.iter() {
            assert_eq!(r.allocated().unwrap(), r.remaining_balance + r.withdrawn_total);
        }
        assert!(self.custody >= self.st.total_outstanding);
    }
}

proptest! {
    #[test]
    fn balances_stay_consistent_and_solvent(
        schedules in prop::collection::vec(schedule(), 1..4),
        surplus in 0u64..1_000,
        ops in prop::collection::vec(op(), 0..40),
    ) {
        let mut l = Ledger::funded(&schedules, surplus);
        l.check();

        for op in ops {
            let before: Vec<u64> = l.wallets.iter().map(|w| l.registry.withdrawn_total(w)).collect();
            match op {
                Op::Advance(dt) => l.now += dt,
                Op::Withdraw { who, amount } => {
                    let wallet = l.wallets[who % l.wallets.len()];
                    let withdrawable = l.registry.withdrawable(&l.st, &wallet, l.now).unwrap();
                    match l.registry.withdraw(&mut l.st, wallet, amount, wallet, l.custody, l.now) {
                        Ok(s) => {
                            prop_assert!(s.amount <= withdrawable);
                            l.custody -= s.amount;
                        }
                        Err(e) => prop_assert!(matches!(
                            e,
                            VestingError::ExceedsUnlockedBalance
                                | VestingError::InsufficientAllocation
                                | VestingError::InsufficientCustodyBalance
                        )),
                    }
                }
                Op::WithdrawAll => {
                    let cap = l.st.admin_capability(&l.admin).unwrap();
                    let out = l
                        .registry
                        .withdraw_all_matured(&mut l.st, &cap, l.custody, l.now)
                        .unwrap();
                    l.custody -= out.iter().map(|s| s.amount).sum::<u64>();
                    for w in l.wallets.iter() {
                        prop_assert_eq!(l.registry.withdrawable(&l.st, w, l.now).unwrap(), 0);
                    }
                }
            }
            l.check();
            for (w, prev) in l.wallets.iter().zip(before) {
                prop_assert!(l.registry.withdrawn_total(w) >= prev);
            }
        }
    }

    #[test]
    fn unlocked_balance_is_monotonic_in_time(
        entries in schedule(),
        t1 in 0i64..2_000,
        dt in 0i64..2_000,
    ) {
        let l = Ledger::funded(&[entries], 0);
        let w = l.wallets[0];
        let a = l.registry.unlocked_balance(&l.st, &w, T0 + t1).unwrap();
        let b = l.registry.unlocked_balance(&l.st, &w, T0 + t1 + dt).unwrap();
        prop_assert!(a <= b);
        // everything is matured once the largest delay elapses
        let total = l.registry.remaining_balance(&w);
        prop_assert_eq!(l.registry.unlocked_balance(&l.st, &w, T0 + 1_000).unwrap(), total);
    }

    #[test]
    fn second_batch_settlement_is_a_no_op(
        schedules in prop::collection::vec(schedule(), 1..4),
        elapsed in 0i64..1_500,
    ) {
        let mut l = Ledger::funded(&schedules, 0);
        l.now += elapsed;
        let cap = l.st.admin_capability(&l.admin).unwrap();
        let first = l.registry.withdraw_all_matured(&mut l.st, &cap, l.custody, l.now).unwrap();
        l.custody -= first.iter().map(|s| s.amount).sum::<u64>();
        let second = l.registry.withdraw_all_matured(&mut l.st, &cap, l.custody, l.now).unwrap();
        prop_assert!(second.is_empty());
        prop_assert!(first.iter().all(|s| s.amount > 0));
        l.check();
    }

    #[test]
    fn excess_reclaim_never_touches_obligations(
        schedules in prop::collection::vec(schedule(), 1..4),
        surplus in 0u64..1_000,
        amount in 0u64..2_000,
    ) {
        let l = Ledger::funded(&schedules, surplus);
        let cap = l.st.admin_capability(&l.admin).unwrap();
        let r = l.st.check_excess_reclaim(&cap, l.custody, amount);
        if amount <= surplus {
            prop_assert!(r.is_ok());
            prop_assert!(l.custody - amount >= l.st.total_outstanding);
        } else {
            prop_assert!(matches!(r, Err(VestingError::ExceedsExcessBalance)));
        }
    }
}
