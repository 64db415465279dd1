use crate::core::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

// Classic per-field byte estimates: a signed input, an output, and the fixed
// transaction overhead.
const INPUT_SIZE_BYTES: u64 = 148;
const OUTPUT_SIZE_BYTES: u64 = 34;
const OVERHEAD_SIZE_BYTES: u64 = 10;

/// A caller-chosen identifier of the transaction. The caller is responsible
/// for keeping identifiers unique.
#[derive(Debug, Clone, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
pub struct TransactionId(String);

impl TransactionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TransactionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TransactionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for TransactionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The index of the transaction output, the first one is 0.
#[derive(Debug, Copy, Clone, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
pub struct OutputIndex(u32);

impl OutputIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl Display for OutputIndex {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A pointer to one output of one transaction.
#[derive(Debug, Clone, Hash, Ord, PartialOrd, Eq, PartialEq, Serialize, Deserialize)]
pub struct OutPoint {
    transaction_id: TransactionId,
    output_index: OutputIndex,
}

impl OutPoint {
    pub fn new(transaction_id: TransactionId, output_index: OutputIndex) -> Self {
        Self {
            transaction_id,
            output_index,
        }
    }

    pub fn transaction_id(&self) -> &TransactionId {
        &self.transaction_id
    }

    pub fn output_index(&self) -> &OutputIndex {
        &self.output_index
    }
}

impl Display for OutPoint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.transaction_id, self.output_index)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    // A pointer to the unspent output to be spent.
    outpoint: OutPoint,
    // The claimed owner of the referenced output. The claim is not verified
    // against any signature.
    owner: Address,
}

impl TransactionInput {
    pub fn new(outpoint: OutPoint, owner: Address) -> Self {
        Self { outpoint, owner }
    }

    pub fn outpoint(&self) -> &OutPoint {
        &self.outpoint
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }
}

impl Display for TransactionInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.outpoint)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionOutput {
    to: Address,
    amount: Amount,
}

impl TransactionOutput {
    pub fn new(to: Address, amount: Amount) -> Self {
        Self { to, amount }
    }

    pub fn to(&self) -> &Address {
        &self.to
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    id: TransactionId,
    inputs: Vec<TransactionInput>,
    outputs: Vec<TransactionOutput>,
    // The exact fee is known only once validation has looked up the input
    // amounts. Until then this holds at most a provisional estimate.
    fee: Amount,
    size: u64,
    fee_rate: Amount,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        inputs: Vec<TransactionInput>,
        outputs: Vec<TransactionOutput>,
    ) -> Self {
        let size = Self::estimated_size(inputs.len(), outputs.len());
        Self {
            id,
            inputs,
            outputs,
            fee: Amount::zero(),
            size,
            fee_rate: Amount::zero(),
        }
    }

    /// A byte estimate of the serialized transaction.
    pub fn estimated_size(input_count: usize, output_count: usize) -> u64 {
        INPUT_SIZE_BYTES * input_count as u64
            + OUTPUT_SIZE_BYTES * output_count as u64
            + OVERHEAD_SIZE_BYTES
    }

    pub fn id(&self) -> &TransactionId {
        &self.id
    }

    pub fn inputs(&self) -> &Vec<TransactionInput> {
        &self.inputs
    }

    pub fn outputs(&self) -> &Vec<TransactionOutput> {
        &self.outputs
    }

    pub fn fee(&self) -> Amount {
        self.fee
    }

    pub fn set_fee(&mut self, fee: Amount) {
        self.fee = fee;
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn fee_rate(&self) -> Amount {
        self.fee_rate
    }

    /// Records the fee rate (value per byte) and pre-sets a provisional fee
    /// from it. Validation overwrites the fee with the exact input/output
    /// delta.
    pub fn set_fee_rate(&mut self, fee_rate: Amount) {
        self.fee_rate = fee_rate;
        self.fee = fee_rate * self.size;
    }

    pub fn output_total(&self) -> Amount {
        self.outputs.iter().map(TransactionOutput::amount).sum()
    }
}
