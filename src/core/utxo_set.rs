use crate::core::{Address, Amount, OutPoint, OutputIndex, TransactionId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Identifier under which the starting outputs are seeded.
pub const GENESIS_TRANSACTION_ID: &str = "genesis";

#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum UtxoError {
    #[error("unspent output {0} not found")]
    NotFound(OutPoint),
}

/// A single unspent transaction output. Its amount is fixed at creation;
/// updates go through remove-then-put, never in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnspentOutput {
    owner: Address,
    amount: Amount,
}

impl UnspentOutput {
    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

/// The set of unspent transaction outputs, indexed by the transaction that
/// produced them and their index within it.
///
/// This is a plain key-value store with owner-based lookups. It performs no
/// validation; admission rules live in the validator.
pub struct UtxoSet {
    utxos: HashMap<OutPoint, UnspentOutput>,
}

impl UtxoSet {
    pub fn new() -> Self {
        Self {
            utxos: HashMap::new(),
        }
    }

    /// A set seeded with the fixed starting outputs the simulation begins
    /// with.
    pub fn with_genesis() -> Self {
        let genesis: [(&str, i64); 5] = [
            ("Alice", 50),
            ("Bob", 30),
            ("Charlie", 20),
            ("David", 10),
            ("Eve", 5),
        ];
        let mut utxos = Self::new();
        for (index, (owner, amount)) in genesis.iter().enumerate() {
            utxos.put(
                OutPoint::new(
                    TransactionId::from(GENESIS_TRANSACTION_ID),
                    OutputIndex::new(index as u32),
                ),
                Amount::from(*amount),
                Address::from(*owner),
            );
        }
        utxos
    }

    /// Inserts the entry at `outpoint`, replacing any previous entry. Key
    /// collisions are the caller's responsibility.
    pub fn put(&mut self, outpoint: OutPoint, amount: Amount, owner: Address) {
        tracing::debug!("created unspent output {} for {} with {}", outpoint, owner, amount);
        self.utxos.insert(outpoint, UnspentOutput { owner, amount });
    }

    /// Deletes the entry if present. Removing an absent key is not an error;
    /// callers that rely on existence check `exists` first.
    pub fn remove(&mut self, outpoint: &OutPoint) {
        if self.utxos.remove(outpoint).is_none() {
            tracing::warn!("attempted to remove non-existent unspent output {}", outpoint);
        }
    }

    pub fn exists(&self, outpoint: &OutPoint) -> bool {
        self.utxos.contains_key(outpoint)
    }

    pub fn amount_of(&self, outpoint: &OutPoint) -> Result<Amount, UtxoError> {
        self.utxos
            .get(outpoint)
            .map(|utxo| utxo.amount)
            .ok_or_else(|| UtxoError::NotFound(outpoint.clone()))
    }

    pub fn balance_of(&self, owner: &Address) -> Amount {
        self.utxos
            .values()
            .filter(|utxo| utxo.owner == *owner)
            .map(|utxo| utxo.amount)
            .sum()
    }

    /// An unordered snapshot of the owner's unspent outputs.
    pub fn utxos_of(&self, owner: &Address) -> Vec<(OutPoint, Amount)> {
        self.utxos
            .iter()
            .filter(|(_, utxo)| utxo.owner == *owner)
            .map(|(outpoint, utxo)| (outpoint.clone(), utxo.amount))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&OutPoint, &UnspentOutput)> {
        self.utxos.iter()
    }

    pub fn total_amount(&self) -> Amount {
        self.utxos.values().map(|utxo| utxo.amount).sum()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }
}
