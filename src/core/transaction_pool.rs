use crate::core::{
    OutPoint, Transaction, TransactionId, TransactionValidator, UtxoSet, ValidationError,
};
use std::collections::HashSet;

/// Pending transactions that passed validation but are not yet part of a
/// mined block, kept in admission order, together with the set of unspent
/// outputs they reserve.
///
/// Every outpoint in the reserved set belongs to exactly one pending
/// transaction; the set is always the union of the pool members' inputs.
pub struct TransactionPool {
    transactions: Vec<Transaction>,
    spent_outpoints: HashSet<OutPoint>,
    max_size: usize,
}

impl TransactionPool {
    pub const DEFAULT_MAX_SIZE: usize = 50;

    pub fn new(max_size: usize) -> Self {
        Self {
            transactions: Vec::new(),
            spent_outpoints: HashSet::new(),
            max_size,
        }
    }

    /// Validates the transaction and, if it passes, reserves its inputs and
    /// appends it. A rejected transaction leaves the pool untouched.
    ///
    /// When the pool is full, the oldest admitted transaction is evicted
    /// first, regardless of its fee.
    pub fn add_transaction(
        &mut self,
        mut transaction: Transaction,
        utxos: &UtxoSet,
    ) -> Result<(), ValidationError> {
        TransactionValidator::validate(&mut transaction, utxos, self)?;

        if !self.transactions.is_empty() && self.transactions.len() >= self.max_size {
            let oldest = self.transactions.remove(0);
            for input in oldest.inputs() {
                self.spent_outpoints.remove(input.outpoint());
            }
            tracing::debug!("pool at capacity, evicted oldest transaction {}", oldest.id());
        }

        for input in transaction.inputs() {
            self.spent_outpoints.insert(input.outpoint().clone());
        }
        tracing::debug!(
            "admitted transaction {} with fee {}",
            transaction.id(),
            transaction.fee()
        );
        self.transactions.push(transaction);
        Ok(())
    }

    /// Removes the transaction and releases its reserved outputs. Unknown
    /// identifiers are ignored.
    pub fn remove_transaction(&mut self, id: &TransactionId) {
        if let Some(index) = self.transactions.iter().position(|tx| tx.id() == id) {
            let removed = self.transactions.remove(index);
            for input in removed.inputs() {
                self.spent_outpoints.remove(input.outpoint());
            }
        }
    }

    /// Up to `n` pending transactions by descending fee. Equal fees keep
    /// admission order.
    pub fn top_by_fee(&self, n: usize) -> Vec<Transaction> {
        let mut transactions = self.transactions.clone();
        transactions.sort_by(|a, b| b.fee().cmp(&a.fee()));
        transactions.truncate(n);
        transactions
    }

    pub fn clear(&mut self) {
        self.transactions.clear();
        self.spent_outpoints.clear();
    }

    pub fn is_outpoint_spent(&self, outpoint: &OutPoint) -> bool {
        self.spent_outpoints.contains(outpoint)
    }

    pub fn spent_outpoints(&self) -> &HashSet<OutPoint> {
        &self.spent_outpoints
    }

    pub fn transactions(&self) -> &Vec<Transaction> {
        &self.transactions
    }

    pub fn contains(&self, id: &TransactionId) -> bool {
        self.transactions.iter().any(|tx| tx.id() == id)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl Default for TransactionPool {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{
        Address, Amount, OutputIndex, TransactionInput, TransactionOutput, GENESIS_TRANSACTION_ID,
    };

    fn outpoint(id: &str, index: u32) -> OutPoint {
        OutPoint::new(TransactionId::from(id), OutputIndex::new(index))
    }

    // Spends one genesis output in full, minus the requested fee.
    fn spend_genesis(id: &str, index: u32, owner: &str, fee: Amount) -> Transaction {
        let utxos = UtxoSet::with_genesis();
        let value = utxos.amount_of(&outpoint(GENESIS_TRANSACTION_ID, index)).unwrap();
        Transaction::new(
            TransactionId::from(id),
            vec![TransactionInput::new(
                outpoint(GENESIS_TRANSACTION_ID, index),
                Address::from(owner),
            )],
            vec![TransactionOutput::new(Address::from("Recipient"), value - fee)],
        )
    }

    #[test]
    fn admission_reserves_inputs() {
        let utxos = UtxoSet::with_genesis();
        let mut pool = TransactionPool::default();

        pool.add_transaction(spend_genesis("t1", 0, "Alice", Amount::zero()), &utxos)
            .unwrap();

        assert_eq!(pool.len(), 1);
        assert!(pool.contains(&TransactionId::from("t1")));
        assert!(pool.is_outpoint_spent(&outpoint(GENESIS_TRANSACTION_ID, 0)));
    }

    #[test]
    fn rejection_leaves_pool_unchanged() {
        let utxos = UtxoSet::with_genesis();
        let mut pool = TransactionPool::default();
        pool.add_transaction(spend_genesis("t1", 0, "Alice", Amount::zero()), &utxos)
            .unwrap();

        let conflicting = spend_genesis("t2", 0, "Alice", Amount::zero());
        assert!(pool.add_transaction(conflicting, &utxos).is_err());

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.spent_outpoints().len(), 1);
        assert!(!pool.contains(&TransactionId::from("t2")));
    }

    #[test]
    fn removal_releases_reserved_inputs() {
        let utxos = UtxoSet::with_genesis();
        let mut pool = TransactionPool::default();
        pool.add_transaction(spend_genesis("t1", 0, "Alice", Amount::zero()), &utxos)
            .unwrap();

        pool.remove_transaction(&TransactionId::from("t1"));

        assert!(pool.is_empty());
        assert!(!pool.is_outpoint_spent(&outpoint(GENESIS_TRANSACTION_ID, 0)));

        // The released output is spendable again.
        pool.add_transaction(spend_genesis("t2", 0, "Alice", Amount::zero()), &utxos)
            .unwrap();
        assert_eq!(pool.len(), 1);
    }

    #[test]
    fn removing_unknown_id_is_a_noop() {
        let utxos = UtxoSet::with_genesis();
        let mut pool = TransactionPool::default();
        pool.add_transaction(spend_genesis("t1", 0, "Alice", Amount::zero()), &utxos)
            .unwrap();

        pool.remove_transaction(&TransactionId::from("unknown"));

        assert_eq!(pool.len(), 1);
        assert_eq!(pool.spent_outpoints().len(), 1);
    }

    #[test]
    fn capacity_eviction_drops_oldest_regardless_of_fee() {
        let utxos = UtxoSet::with_genesis();
        let mut pool = TransactionPool::new(2);

        // The oldest transaction carries the highest fee and is still the
        // one evicted.
        pool.add_transaction(spend_genesis("t1", 0, "Alice", Amount::from(1)), &utxos)
            .unwrap();
        pool.add_transaction(spend_genesis("t2", 1, "Bob", Amount::new(1, 2)), &utxos)
            .unwrap();
        pool.add_transaction(spend_genesis("t3", 2, "Charlie", Amount::new(1, 2)), &utxos)
            .unwrap();

        assert_eq!(pool.len(), 2);
        assert!(!pool.contains(&TransactionId::from("t1")));
        assert!(pool.contains(&TransactionId::from("t2")));
        assert!(pool.contains(&TransactionId::from("t3")));
        assert!(!pool.is_outpoint_spent(&outpoint(GENESIS_TRANSACTION_ID, 0)));

        // The evicted transaction's input is free to spend again.
        pool.add_transaction(spend_genesis("t4", 0, "Alice", Amount::zero()), &utxos)
            .unwrap();
        assert!(!pool.contains(&TransactionId::from("t2")));
    }

    #[test]
    fn top_by_fee_orders_by_fee_then_admission() {
        let utxos = UtxoSet::with_genesis();
        let mut pool = TransactionPool::default();
        pool.add_transaction(spend_genesis("t1", 0, "Alice", Amount::new(5, 3)), &utxos)
            .unwrap();
        pool.add_transaction(spend_genesis("t2", 1, "Bob", Amount::new(1, 2)), &utxos)
            .unwrap();
        pool.add_transaction(spend_genesis("t3", 2, "Charlie", Amount::new(5, 3)), &utxos)
            .unwrap();

        let top = pool.top_by_fee(5);
        let ids: Vec<&str> = top.iter().map(|tx| tx.id().as_str()).collect();
        assert_eq!(ids, vec!["t2", "t1", "t3"]);

        assert_eq!(pool.top_by_fee(2).len(), 2);
        // Selection does not mutate the pool.
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn clear_empties_pool_and_reservations() {
        let utxos = UtxoSet::with_genesis();
        let mut pool = TransactionPool::default();
        pool.add_transaction(spend_genesis("t1", 0, "Alice", Amount::zero()), &utxos)
            .unwrap();
        pool.add_transaction(spend_genesis("t2", 1, "Bob", Amount::zero()), &utxos)
            .unwrap();

        pool.clear();

        assert!(pool.is_empty());
        assert!(pool.spent_outpoints().is_empty());
    }
}
