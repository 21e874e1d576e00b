use core::fmt;

use alloy_primitives::{Address, U256};

use crate::{access::Role, transaction::TransactionId};

/// Errors returned by wallet operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Caller does not hold the role the operation requires.
    Unauthorized { caller: Address, required: Role },
    /// No transaction with this id has been submitted.
    NotFound { id: TransactionId },
    /// The owner already confirmed this transaction.
    AlreadyConfirmed { id: TransactionId, owner: Address },
    /// The transaction has already been executed.
    AlreadyExecuted { id: TransactionId },
    /// Withdrawal exceeds the wallet's native balance.
    InsufficientBalance { requested: U256, available: U256 },
    /// The forwarded call of an executed transaction did not succeed.
    ///
    /// State written before the forward (the vote, `executed = true`, the audit records)
    /// is kept.
    ForwardingFailed { id: TransactionId },
    /// The native transfer to the master key did not succeed.
    WithdrawalFailed { amount: U256 },
    /// The token ledger rejected the allowance grant.
    ApprovalFailed { token: Address },
}

impl WalletError {
    /// Whether the failing operation left committed state behind.
    pub fn is_committed(&self) -> bool {
        matches!(self, WalletError::ForwardingFailed { .. })
    }
}

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletError::Unauthorized { caller, required } => {
                write!(f, "{caller} is not authorized: requires {required}")
            }
            WalletError::NotFound { id } => write!(f, "transaction {id} does not exist"),
            WalletError::AlreadyConfirmed { id, owner } => {
                write!(f, "transaction {id} already confirmed by {owner}")
            }
            WalletError::AlreadyExecuted { id } => write!(f, "transaction {id} already executed"),
            WalletError::InsufficientBalance {
                requested,
                available,
            } => write!(
                f,
                "insufficient balance: requested {requested}, available {available}"
            ),
            WalletError::ForwardingFailed { id } => {
                write!(f, "forwarding of transaction {id} failed")
            }
            WalletError::WithdrawalFailed { amount } => write!(f, "withdrawal of {amount} failed"),
            WalletError::ApprovalFailed { token } => {
                write!(f, "token {token} rejected the allowance grant")
            }
        }
    }
}

/// Failures reported by a [`crate::WalletHost`] when talking to the outside world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostError {
    /// The external call reverted or could not be made.
    CallReverted,
    /// The token answered an `approve` with `false` or undecodable data.
    ApprovalRejected,
}
