use crate::core::{Amount, OutPoint, Transaction, TransactionPool, UtxoError, UtxoSet};
use std::collections::HashSet;
use thiserror::Error;

/// Why a transaction was refused admission to the pending pool.
#[derive(Error, Debug, Clone, Eq, PartialEq)]
pub enum ValidationError {
    #[error("unspent output {0} does not exist")]
    UnknownInput(OutPoint),
    #[error("unspent output {0} is spent more than once within the transaction")]
    DuplicateInput(OutPoint),
    #[error("unspent output {0} is already spent by a pending transaction")]
    PoolConflict(OutPoint),
    #[error("output amount {0} is negative")]
    NegativeOutput(Amount),
    #[error("inputs total {inputs} does not cover outputs total {outputs}")]
    InsufficientFunds { inputs: Amount, outputs: Amount },
}

impl From<UtxoError> for ValidationError {
    fn from(error: UtxoError) -> Self {
        match error {
            UtxoError::NotFound(outpoint) => ValidationError::UnknownInput(outpoint),
        }
    }
}

// Responsible for the admission rules a transaction must pass before it
// enters the pending pool. The rules run in a fixed order, so a given
// transaction is always refused for the same reason.
pub struct TransactionValidator {}

impl TransactionValidator {
    /// Checks the transaction against the unspent output set and the pending
    /// pool. On success the exact fee, i.e. the input/output delta, is
    /// written onto the transaction. Neither store is modified.
    pub fn validate(
        transaction: &mut Transaction,
        utxos: &UtxoSet,
        pool: &TransactionPool,
    ) -> Result<(), ValidationError> {
        Self::validate_inputs_exist(transaction, utxos)?;
        Self::validate_no_duplicate_inputs(transaction)?;
        Self::validate_no_pool_conflicts(transaction, pool)?;
        Self::validate_outputs_non_negative(transaction)?;
        let fee = Self::validate_balance(transaction, utxos)?;
        transaction.set_fee(fee);
        Ok(())
    }

    fn validate_inputs_exist(
        transaction: &Transaction,
        utxos: &UtxoSet,
    ) -> Result<(), ValidationError> {
        for input in transaction.inputs() {
            if !utxos.exists(input.outpoint()) {
                return Err(ValidationError::UnknownInput(input.outpoint().clone()));
            }
        }
        Ok(())
    }

    fn validate_no_duplicate_inputs(transaction: &Transaction) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for input in transaction.inputs() {
            if !seen.insert(input.outpoint()) {
                return Err(ValidationError::DuplicateInput(input.outpoint().clone()));
            }
        }
        Ok(())
    }

    fn validate_no_pool_conflicts(
        transaction: &Transaction,
        pool: &TransactionPool,
    ) -> Result<(), ValidationError> {
        for input in transaction.inputs() {
            if pool.is_outpoint_spent(input.outpoint()) {
                return Err(ValidationError::PoolConflict(input.outpoint().clone()));
            }
        }
        Ok(())
    }

    fn validate_outputs_non_negative(transaction: &Transaction) -> Result<(), ValidationError> {
        for output in transaction.outputs() {
            if output.amount().is_negative() {
                return Err(ValidationError::NegativeOutput(output.amount()));
            }
        }
        Ok(())
    }

    fn validate_balance(
        transaction: &Transaction,
        utxos: &UtxoSet,
    ) -> Result<Amount, ValidationError> {
        let mut inputs_total = Amount::zero();
        for input in transaction.inputs() {
            inputs_total = inputs_total + utxos.amount_of(input.outpoint())?;
        }
        let outputs_total = transaction.output_total();
        if inputs_total < outputs_total {
            return Err(ValidationError::InsufficientFunds {
                inputs: inputs_total,
                outputs: outputs_total,
            });
        }
        Ok(inputs_total - outputs_total)
    }
}
