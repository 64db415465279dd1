pub mod address;
pub mod amount;
pub mod miner;
pub mod transaction;
pub mod transaction_pool;
pub mod utxo_set;
pub mod validation;

pub use self::{
    address::Address,
    amount::Amount,
    miner::{BlockSummary, Miner},
    transaction::{
        OutPoint, OutputIndex, Transaction, TransactionId, TransactionInput, TransactionOutput,
    },
    transaction_pool::TransactionPool,
    utxo_set::{UnspentOutput, UtxoError, UtxoSet, GENESIS_TRANSACTION_ID},
    validation::{TransactionValidator, ValidationError},
};
