//! Append-only transaction ledger: submission and read-only lookups.

use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

use crate::{
    access::require_owner,
    confirmation,
    errors::WalletError,
    events::WalletEvent,
    store::{WalletHost, WalletStore},
    transaction::{Transaction, TransactionId},
};

/// Submit a new transaction and count it as the submitter's first vote.
///
/// Returns the new id even when the submitter's vote alone reaches the threshold and the
/// forward then fails; that outcome is visible through `ExecutionFailure` and the stored entry.
pub fn submit<W: WalletStore + WalletHost + ?Sized>(
    wallet: &mut W,
    caller: Address,
    destination: Address,
    value: U256,
    data: Vec<u8>,
) -> Result<TransactionId, WalletError> {
    require_owner(wallet, caller)?;

    let id = wallet.append_transaction(Transaction::new(destination, value, data));
    wallet.emit(WalletEvent::Submission {
        transaction_id: id,
        submitter: caller,
    });

    match confirmation::record(wallet, caller, id) {
        Err(err) if !err.is_committed() => Err(err),
        _ => Ok(id),
    }
}

/// Look up a ledger entry.
pub fn transaction<S: WalletStore + ?Sized>(
    store: &S,
    id: TransactionId,
) -> Result<Transaction, WalletError> {
    store.transaction(id).ok_or(WalletError::NotFound { id })
}

/// Owners who confirmed `id`, in founding order.
pub fn confirmations<S: WalletStore + ?Sized>(
    store: &S,
    id: TransactionId,
) -> Result<Vec<Address>, WalletError> {
    if !store.transaction_exists(id) {
        return Err(WalletError::NotFound { id });
    }
    Ok(store
        .owners()
        .into_iter()
        .filter(|owner| store.is_confirmed_by(id, *owner))
        .collect())
}

/// Which entries a range query returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransactionFilter {
    pub pending: bool,
    pub executed: bool,
}

impl TransactionFilter {
    pub const ALL: Self = Self {
        pending: true,
        executed: true,
    };

    pub fn matches(&self, transaction: &Transaction) -> bool {
        (self.pending && !transaction.executed) || (self.executed && transaction.executed)
    }
}

/// Ids in `[from, to)` that pass `filter`. Bounds are clamped to the ledger.
pub fn transaction_ids<S: WalletStore + ?Sized>(
    store: &S,
    filter: TransactionFilter,
    from: TransactionId,
    to: TransactionId,
) -> Vec<TransactionId> {
    let from = from.max(1);
    let to = to.min(store.transaction_count().saturating_add(1));
    (from..to)
        .filter(|id| {
            store
                .transaction(*id)
                .map_or(false, |transaction| filter.matches(&transaction))
        })
        .collect()
}

/// Number of entries passing `filter`.
pub fn count<S: WalletStore + ?Sized>(store: &S, filter: TransactionFilter) -> u64 {
    transaction_ids(store, filter, 1, u64::MAX).len() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::WalletConfig, memory::MemoryWallet};
    use alloc::vec;
    use alloy_primitives::address;

    const A: Address = address!("16f1b1cb43c0744f85b52104f6a7c3cc60cd3c49");
    const B: Address = address!("f204b4b3b0a4656e8e818d6c051679162f426999");
    const MASTER: Address = address!("8493484940139e84aa386999c603ad6eb5515eda");
    const DEST: Address = address!("000000000000000000000000000000000000d00d");

    fn wallet(required: u64) -> MemoryWallet {
        let config = WalletConfig::new(vec![A, B], MASTER, A, 2, required).unwrap();
        MemoryWallet::new(config).with_balance(U256::from(1_000u64))
    }

    #[test]
    fn test_ids_are_sequential_from_one() {
        let mut wallet = wallet(2);
        for expected in 1..=3u64 {
            let id = submit(&mut wallet, A, DEST, U256::ZERO, Vec::new()).unwrap();
            assert_eq!(id, expected);
        }
        assert_eq!(wallet.transaction_count(), 3);
    }

    #[test]
    fn test_submission_is_first_vote() {
        let mut wallet = wallet(2);
        let id = submit(&mut wallet, B, DEST, U256::from(5u64), vec![1, 2, 3]).unwrap();

        let entry = transaction(&wallet, id).unwrap();
        assert_eq!(entry.destination, DEST);
        assert_eq!(entry.value, U256::from(5u64));
        assert_eq!(entry.data, vec![1, 2, 3]);
        assert_eq!(entry.confirmations_counter, 1);
        assert!(!entry.executed);
        assert_eq!(confirmations(&wallet, id).unwrap(), vec![B]);
        assert_eq!(
            wallet.events(),
            &[
                WalletEvent::Submission {
                    transaction_id: 1,
                    submitter: B
                },
                WalletEvent::Confirmation {
                    transaction_id: 1,
                    confirmer: B
                },
            ]
        );
    }

    #[test]
    fn test_non_owner_cannot_submit() {
        let mut wallet = wallet(2);
        let err = submit(&mut wallet, MASTER, DEST, U256::ZERO, Vec::new()).unwrap_err();
        assert!(matches!(err, WalletError::Unauthorized { caller, .. } if caller == MASTER));
        assert_eq!(wallet.transaction_count(), 0);
        assert!(wallet.events().is_empty());
    }

    #[test]
    fn test_unknown_id_lookups() {
        let wallet = wallet(2);
        assert_eq!(transaction(&wallet, 0), Err(WalletError::NotFound { id: 0 }));
        assert_eq!(confirmations(&wallet, 1), Err(WalletError::NotFound { id: 1 }));
    }

    #[test]
    fn test_filtered_ranges() {
        let mut wallet = wallet(1);
        // Threshold 1: every submission executes immediately.
        submit(&mut wallet, A, DEST, U256::ZERO, Vec::new()).unwrap();
        submit(&mut wallet, A, DEST, U256::ZERO, Vec::new()).unwrap();

        let mut wallet2 = self::wallet(2);
        submit(&mut wallet2, A, DEST, U256::ZERO, Vec::new()).unwrap();
        submit(&mut wallet2, A, DEST, U256::ZERO, Vec::new()).unwrap();
        crate::confirmation::confirm(&mut wallet2, B, 2).unwrap();

        let pending = TransactionFilter {
            pending: true,
            executed: false,
        };
        let executed = TransactionFilter {
            pending: false,
            executed: true,
        };
        assert_eq!(count(&wallet, executed), 2);
        assert_eq!(count(&wallet, pending), 0);
        assert_eq!(transaction_ids(&wallet2, pending, 1, 10), vec![1]);
        assert_eq!(transaction_ids(&wallet2, executed, 0, 10), vec![2]);
        assert_eq!(transaction_ids(&wallet2, TransactionFilter::ALL, 2, 3), vec![2]);
        assert!(transaction_ids(&wallet2, TransactionFilter::ALL, 3, 1).is_empty());
    }
}
