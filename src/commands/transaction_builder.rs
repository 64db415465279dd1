use crate::core::{
    Address, Amount, Transaction, TransactionId, TransactionInput, TransactionOutput, UtxoSet,
};
use chrono::Utc;
use sha2::{Digest, Sha256};

// The builder always plans for two outputs: the payment and the change.
const BUILT_OUTPUT_COUNT: usize = 2;

/// Assembles a fully-formed transaction from the sender's unspent outputs:
/// picks inputs largest-first, budgets the fee from the fee rate and the
/// estimated size, and returns any surplus to the sender as change.
pub struct TransactionBuilder {}

impl TransactionBuilder {
    pub fn build(
        sender: &Address,
        recipient: &Address,
        amount: Amount,
        fee_rate: Amount,
        utxos: &UtxoSet,
    ) -> Result<Transaction, String> {
        if amount.is_negative() || amount.is_zero() {
            return Err(format!("amount to send must be positive, got {}", amount));
        }

        let mut available = utxos.utxos_of(sender);
        available.sort_by(|a, b| b.1.cmp(&a.1));

        let mut selected = Vec::new();
        let mut inputs_total = Amount::zero();
        let mut fee = Self::fee_estimate(fee_rate, 1);
        for (outpoint, value) in available {
            if !selected.is_empty() && inputs_total >= amount + fee {
                break;
            }
            inputs_total = inputs_total + value;
            selected.push(outpoint);
            fee = Self::fee_estimate(fee_rate, selected.len());
        }
        if selected.is_empty() || inputs_total < amount + fee {
            return Err(format!(
                "{} cannot cover {} plus a {} fee with a balance of {}",
                sender,
                amount,
                fee,
                utxos.balance_of(sender)
            ));
        }

        let change = inputs_total - amount - fee;
        let inputs = selected
            .into_iter()
            .map(|outpoint| TransactionInput::new(outpoint, sender.clone()))
            .collect::<Vec<TransactionInput>>();
        let mut outputs = vec![TransactionOutput::new(recipient.clone(), amount)];
        if change > Amount::zero() {
            outputs.push(TransactionOutput::new(sender.clone(), change));
        }

        let id = Self::generate_id(&inputs, &outputs);
        let mut transaction = Transaction::new(id, inputs, outputs);
        transaction.set_fee_rate(fee_rate);
        Ok(transaction)
    }

    fn fee_estimate(fee_rate: Amount, input_count: usize) -> Amount {
        fee_rate * Transaction::estimated_size(input_count, BUILT_OUTPUT_COUNT)
    }

    // Identifiers name a submission rather than the transaction content, so
    // the hashed data is salted with the build time to keep repeated
    // identical payments distinct.
    fn generate_id(inputs: &[TransactionInput], outputs: &[TransactionOutput]) -> TransactionId {
        let mut data = String::new();
        for input in inputs {
            data.push_str(&input.outpoint().to_string());
        }
        for output in outputs {
            data.push_str(&format!("{}:{}", output.to(), output.amount()));
        }
        data.push_str(&Utc::now().timestamp_nanos().to_string());
        let first_hash = Sha256::digest(data.as_bytes());
        let second_hash = Sha256::digest(first_hash.as_slice());
        TransactionId::from(hex::encode(second_hash.as_slice()))
    }
}
