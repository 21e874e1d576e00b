use alloy_primitives::{Address, U256};

use crate::transaction::TransactionId;

/// Audit records, appended in call order and never revised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    Submission {
        transaction_id: TransactionId,
        submitter: Address,
    },
    Confirmation {
        transaction_id: TransactionId,
        confirmer: Address,
    },
    /// Emitted once per transaction; `executor` is the owner whose vote reached the threshold.
    Execution {
        transaction_id: TransactionId,
        executor: Address,
    },
    /// Follows `Execution` when the forwarded call failed.
    ExecutionFailure { transaction_id: TransactionId },
    Withdrawal { sender: Address, amount: U256 },
    TokenAdded {
        token_address: Address,
        master_key: Address,
    },
    Deposit { sender: Address, value: U256 },
}
