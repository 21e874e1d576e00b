use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

/// 1-based, sequential transaction id. `0` is never assigned.
pub type TransactionId = u64;

/// What a transaction asks the destination to do with the forwarded value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Plain native-value transfer (empty call data).
    Transfer,
    /// Call with destination-defined bytes, forwarded verbatim.
    Call(Vec<u8>),
}

impl Payload {
    pub fn from_data(data: Vec<u8>) -> Self {
        if data.is_empty() {
            Payload::Transfer
        } else {
            Payload::Call(data)
        }
    }

    /// Raw call data as sent on the wire.
    pub fn calldata(&self) -> &[u8] {
        match self {
            Payload::Transfer => &[],
            Payload::Call(data) => data,
        }
    }
}

/// A ledger entry as returned by lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub destination: Address,
    pub value: U256,
    pub data: Vec<u8>,
    pub executed: bool,
    pub confirmations_counter: u64,
}

impl Transaction {
    /// A freshly submitted entry: not executed, no votes.
    pub fn new(destination: Address, value: U256, data: Vec<u8>) -> Self {
        Self {
            destination,
            value,
            data,
            executed: false,
            confirmations_counter: 0,
        }
    }

    pub fn payload(&self) -> Payload {
        Payload::from_data(self.data.clone())
    }
}
