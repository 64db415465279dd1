//! Property-based tests for the ledger invariants:
//! - Inputs of pending transactions are pairwise disjoint, and the pool's
//!   reserved set is exactly their union.
//! - The first transaction to claim an output wins, independent of fees.
//! - An accepted transaction's fee is exactly inputs minus outputs.
//! - Mining conserves the total supply; the reward equals the settled fees.

use proptest::prelude::*;
use std::collections::HashSet;
use tallycoin_lib::{
    Address, Amount, Miner, OutPoint, OutputIndex, Transaction, TransactionId, TransactionInput,
    TransactionOutput, TransactionPool, UtxoSet,
};

const SEED_TRANSACTION_ID: &str = "seed";
const SEED_OUTPUT_COUNT: usize = 8;
const OWNERS: [&str; 4] = ["Alice", "Bob", "Charlie", "Dora"];

fn seed_outpoint(index: usize) -> OutPoint {
    OutPoint::new(
        TransactionId::from(SEED_TRANSACTION_ID),
        OutputIndex::new(index as u32),
    )
}

fn seeded_utxo_set(amount_units: &[i64]) -> UtxoSet {
    let mut utxos = UtxoSet::new();
    for (index, units) in amount_units.iter().enumerate() {
        utxos.put(
            seed_outpoint(index),
            Amount::new(*units, 3),
            Address::from(OWNERS[index % OWNERS.len()]),
        );
    }
    utxos
}

/// A candidate payment spending one seeded output: the output it claims,
/// the whole-percent share paid to the recipient, and the whole-percent
/// share left unclaimed as fee.
fn payment_strategy() -> impl Strategy<Value = (usize, i64, i64)> {
    (0..SEED_OUTPUT_COUNT, 0i64..=90, 0i64..=10)
}

fn amount_units_strategy() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(1i64..1_000_000, SEED_OUTPUT_COUNT)
}

// Splits `value_units` (scale 3) exactly: shares are whole percents, so
// everything is representable at scale 5 with no rounding.
fn payment(
    id: usize,
    spend_index: usize,
    value_units: i64,
    pay_pct: i64,
    fee_pct: i64,
) -> (Transaction, Amount) {
    let owner = Address::from(OWNERS[spend_index % OWNERS.len()]);
    let recipient = Address::from(OWNERS[(spend_index + 1) % OWNERS.len()]);
    let paid = Amount::new(value_units * pay_pct, 5);
    let fee = Amount::new(value_units * fee_pct, 5);
    let change = Amount::new(value_units, 3) - paid - fee;
    let transaction = Transaction::new(
        TransactionId::from(format!("tx-{}", id)),
        vec![TransactionInput::new(seed_outpoint(spend_index), owner.clone())],
        vec![
            TransactionOutput::new(recipient, paid),
            TransactionOutput::new(owner, change),
        ],
    );
    (transaction, fee)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn pending_inputs_stay_disjoint(
        amount_units in amount_units_strategy(),
        payments in prop::collection::vec(payment_strategy(), 0..24),
    ) {
        let utxos = seeded_utxo_set(&amount_units);
        let mut pool = TransactionPool::new(100);

        for (id, (spend_index, pay_pct, fee_pct)) in payments.into_iter().enumerate() {
            let (transaction, _) =
                payment(id, spend_index, amount_units[spend_index], pay_pct, fee_pct);
            let _ = pool.add_transaction(transaction, &utxos);
        }

        let union: HashSet<OutPoint> = pool
            .transactions()
            .iter()
            .flat_map(|tx| tx.inputs().iter().map(|input| input.outpoint().clone()))
            .collect();
        let total_inputs: usize = pool.transactions().iter().map(|tx| tx.inputs().len()).sum();

        // No outpoint is claimed twice, and the reserved set is exactly the
        // union of the pool's inputs.
        prop_assert_eq!(union.len(), total_inputs);
        prop_assert_eq!(&union, pool.spent_outpoints());
    }

    #[test]
    fn first_claim_of_an_output_wins(
        amount_units in amount_units_strategy(),
        payments in prop::collection::vec(payment_strategy(), 0..24),
    ) {
        let utxos = seeded_utxo_set(&amount_units);
        let mut pool = TransactionPool::new(100);
        let mut claimed = HashSet::new();

        for (id, (spend_index, pay_pct, fee_pct)) in payments.into_iter().enumerate() {
            let (transaction, _) =
                payment(id, spend_index, amount_units[spend_index], pay_pct, fee_pct);
            let accepted = pool.add_transaction(transaction, &utxos).is_ok();
            prop_assert_eq!(accepted, claimed.insert(spend_index));
        }
    }

    #[test]
    fn fees_are_exact_and_mining_conserves_supply(
        amount_units in amount_units_strategy(),
        payments in prop::collection::vec(payment_strategy(), 0..24),
    ) {
        let mut utxos = seeded_utxo_set(&amount_units);
        let mut pool = TransactionPool::new(100);
        let mut expected_fees = Vec::new();

        for (id, (spend_index, pay_pct, fee_pct)) in payments.into_iter().enumerate() {
            let (transaction, fee) =
                payment(id, spend_index, amount_units[spend_index], pay_pct, fee_pct);
            if pool.add_transaction(transaction, &utxos).is_ok() {
                expected_fees.push(fee);
            }
        }

        // The validator assigned each accepted transaction its exact
        // input/output delta.
        prop_assert_eq!(pool.len(), expected_fees.len());
        for (transaction, expected_fee) in pool.transactions().iter().zip(expected_fees.iter()) {
            prop_assert_eq!(transaction.fee(), *expected_fee);
        }

        let total_fees: Amount = expected_fees.into_iter().sum();
        let total_before = utxos.total_amount();
        let settled = pool.len();
        let miner = Address::from("Miner");

        let summary = Miner::mine_block(&miner, &mut pool, &mut utxos, settled);

        prop_assert_eq!(summary.transaction_count, settled);
        prop_assert_eq!(summary.total_fees, total_fees);
        prop_assert_eq!(utxos.balance_of(&miner), total_fees);
        prop_assert!(pool.is_empty());
        // Fees move to the miner rather than disappear.
        prop_assert_eq!(utxos.total_amount(), total_before);
    }
}
