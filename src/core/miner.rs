use crate::core::{Address, Amount, OutPoint, OutputIndex, TransactionId, TransactionPool, UtxoSet};
use chrono::Utc;
use std::fmt::{Display, Formatter};

/// What mining a single block did to the ledger.
#[derive(Debug, Clone)]
pub struct BlockSummary {
    pub transaction_count: usize,
    pub total_fees: Amount,
    pub reward_outpoint: Option<OutPoint>,
}

impl BlockSummary {
    fn empty() -> Self {
        Self {
            transaction_count: 0,
            total_fees: Amount::zero(),
            reward_outpoint: None,
        }
    }
}

impl Display for BlockSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.transaction_count == 0 {
            write!(f, "no transactions were mined")
        } else {
            write!(
                f,
                "mined {} transactions, collected {} in fees",
                self.transaction_count, self.total_fees
            )?;
            if let Some(reward_outpoint) = &self.reward_outpoint {
                write!(f, ", reward minted at {}", reward_outpoint)?;
            }
            Ok(())
        }
    }
}

pub struct Miner {}

impl Miner {
    /// Applies up to `max_transactions` of the highest-fee pending
    /// transactions to the unspent output set: inputs are deleted, outputs
    /// are inserted under the producing transaction's identifier, and the
    /// collected fees are minted to `miner` as a single new output. The
    /// reward carries no subsidy beyond the fees, so a fee-free block mints
    /// nothing.
    pub fn mine_block(
        miner: &Address,
        pool: &mut TransactionPool,
        utxos: &mut UtxoSet,
        max_transactions: usize,
    ) -> BlockSummary {
        let selected = pool.top_by_fee(max_transactions);
        if selected.is_empty() {
            tracing::info!("no pending transactions to mine");
            return BlockSummary::empty();
        }

        let mut total_fees = Amount::zero();
        for transaction in &selected {
            for input in transaction.inputs() {
                // The selection came from the live pool, so its inputs must
                // still be unspent. A missing entry means the pool and the
                // unspent output set are out of sync.
                assert!(
                    utxos.exists(input.outpoint()),
                    "pending transaction {} spends missing output {}",
                    transaction.id(),
                    input.outpoint()
                );
                utxos.remove(input.outpoint());
            }
            for (index, output) in transaction.outputs().iter().enumerate() {
                let outpoint =
                    OutPoint::new(transaction.id().clone(), OutputIndex::new(index as u32));
                utxos.put(outpoint, output.amount(), output.to().clone());
            }
            total_fees = total_fees + transaction.fee();
            pool.remove_transaction(transaction.id());
        }

        let reward_outpoint = if total_fees > Amount::zero() {
            let outpoint = Self::reward_outpoint(miner);
            utxos.put(outpoint.clone(), total_fees, miner.clone());
            Some(outpoint)
        } else {
            None
        };

        tracing::info!(
            "mined block: {} transactions, {} in fees for {}",
            selected.len(),
            total_fees,
            miner
        );

        BlockSummary {
            transaction_count: selected.len(),
            total_fees,
            reward_outpoint,
        }
    }

    // The reward is not produced by any transaction, so it gets its own
    // identifier namespace, salted with the mining time to keep repeated
    // rewards to the same miner distinct.
    fn reward_outpoint(miner: &Address) -> OutPoint {
        let id = format!("coinbase_{}_{}", miner, Utc::now().timestamp_nanos());
        OutPoint::new(TransactionId::from(id), OutputIndex::new(0))
    }
}
