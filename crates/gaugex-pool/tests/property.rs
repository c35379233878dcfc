//! Property tests: randomized operation sequences against the accounting
//! invariants. Every position is activated (settled into the denominator)
//! at the window start, so debt baselines are aligned and the conservation
//! bound is exact up to truncation dust.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};

use common::{acct, admin, custody, funding, setup};
use gaugex_core::types::Amount;
use proptest::prelude::*;

static CASE: AtomicUsize = AtomicUsize::new(0);

#[derive(Clone, Debug)]
enum Op {
    Advance(i64),
    Claim(usize),
    Withdraw(usize),
    SetRate(u128),
}

fn op_strategy(slots: usize) -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..10_000).prop_map(Op::Advance),
        (0..slots).prop_map(Op::Claim),
        (0..slots).prop_map(Op::Withdraw),
        (1u128..100).prop_map(Op::SetRate),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn accounting_invariants_hold_across_operation_sequences(
        amounts in prop::collection::vec(1u128..10_000, 1..8),
        rate in 1u128..100,
        ops in prop::collection::vec(op_strategy(8), 0..24),
    ) {
        let case = CASE.fetch_add(1, Ordering::Relaxed);
        let mut g = setup(&format!("prop_{case}"), rate, 0, 1_000_000_000);

        let total_principal: Amount = amounts.iter().sum();
        g.vault.credit(&custody(), total_principal);
        g.vault.credit(&funding(), u128::from(u64::MAX));

        // All positions enter at t=0 and settle immediately, so every debt
        // baseline equals the (zero) accumulator.
        let mut ids = Vec::new();
        for (i, &amount) in amounts.iter().enumerate() {
            let owner = acct(1 + (i % 3) as u8);
            let id = g.controller.deposit(&owner, &owner, amount, 0).unwrap();
            g.controller.claim_rewards(id, 0).unwrap();
            ids.push((id, owner, amount));
        }

        let mut now = 0i64;
        let mut live: Vec<bool> = vec![true; ids.len()];
        let mut paid_total: Amount = 0;
        let mut reward_budget: u128 = 0;
        let mut last_rps: u128 = 0;

        for op in ops {
            match op {
                Op::Advance(dt) => {
                    let rate_now = g.controller.query().reward_state().unwrap().reward_rate;
                    now += dt;
                    reward_budget += rate_now * dt as u128;
                }
                Op::Claim(slot) => {
                    let Some(&(id, _, _)) = ids.get(slot) else { continue };
                    if !live[slot] {
                        continue;
                    }
                    paid_total += g.controller.claim_rewards(id, now).unwrap();
                }
                Op::Withdraw(slot) => {
                    let Some(&(id, owner, _)) = ids.get(slot) else { continue };
                    if !live[slot] {
                        continue;
                    }
                    // Claim first so the exit settlement has nothing left to
                    // strand in the erased ledger.
                    paid_total += g.controller.claim_rewards(id, now).unwrap();
                    g.controller.withdraw(&owner, id, &owner, now).unwrap();
                    live[slot] = false;
                }
                Op::SetRate(new_rate) => {
                    g.controller.set_reward_rate(&admin(), new_rate, now).unwrap();
                }
            }

            let query = g.controller.query();
            let state = query.reward_state().unwrap();

            // totalShares / totalLocked mirror the live position set.
            let mut sum_shares = 0u128;
            let mut sum_locked = 0u128;
            for (slot, &(id, _, amount)) in ids.iter().enumerate() {
                if live[slot] {
                    sum_shares += query.position(id).unwrap().shares;
                    sum_locked += amount;
                }
            }
            prop_assert_eq!(state.total_shares, sum_shares);
            prop_assert_eq!(state.total_locked, sum_locked);

            // The accumulator never decreases.
            prop_assert!(state.reward_per_share_stored >= last_rps);
            last_rps = state.reward_per_share_stored;

            // earned() is stable between settlements.
            for (slot, &(id, _, _)) in ids.iter().enumerate() {
                if live[slot] {
                    let a = query.earned(id, now).unwrap();
                    let b = query.earned(id, now).unwrap();
                    prop_assert_eq!(a, b);
                }
            }
        }

        // Conservation: everything paid out plus everything still owed stays
        // within the reward budget streamed so far.
        let query = g.controller.query();
        let mut outstanding = 0u128;
        for (slot, &(id, _, _)) in ids.iter().enumerate() {
            if live[slot] {
                outstanding += query.earned(id, now).unwrap();
            }
        }
        prop_assert!(paid_total + outstanding <= reward_budget);
    }
}
