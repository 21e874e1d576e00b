//! Per-owner votes and threshold detection.

use alloy_primitives::Address;

use crate::{
    access::require_owner,
    errors::WalletError,
    events::WalletEvent,
    execution,
    store::{WalletHost, WalletStore},
    transaction::TransactionId,
};

/// Result of a successful vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Vote recorded; threshold not reached yet.
    Pending { confirmations: u64, required: u64 },
    /// This vote reached the threshold and the transaction was forwarded.
    Executed,
}

/// Confirm transaction `id` as `caller`, executing it if this vote reaches the threshold.
///
/// Checks, in order: the id exists, the caller is an owner, the entry is not executed, the
/// caller has not voted yet. A failed forward returns [`WalletError::ForwardingFailed`] with
/// the vote kept.
pub fn confirm<W: WalletStore + WalletHost + ?Sized>(
    wallet: &mut W,
    caller: Address,
    id: TransactionId,
) -> Result<ConfirmOutcome, WalletError> {
    let transaction = wallet.transaction(id).ok_or(WalletError::NotFound { id })?;
    require_owner(wallet, caller)?;
    if transaction.executed {
        return Err(WalletError::AlreadyExecuted { id });
    }
    if wallet.is_confirmed_by(id, caller) {
        return Err(WalletError::AlreadyConfirmed { id, owner: caller });
    }

    record(wallet, caller, id)
}

/// Record a vote whose preconditions already hold, then run the threshold check.
pub(crate) fn record<W: WalletStore + WalletHost + ?Sized>(
    wallet: &mut W,
    caller: Address,
    id: TransactionId,
) -> Result<ConfirmOutcome, WalletError> {
    let confirmations = wallet.add_confirmation(id, caller);
    wallet.emit(WalletEvent::Confirmation {
        transaction_id: id,
        confirmer: caller,
    });

    let required = wallet.required();
    if confirmations == required {
        execution::execute(wallet, id, caller)?;
        return Ok(ConfirmOutcome::Executed);
    }

    Ok(ConfirmOutcome::Pending {
        confirmations,
        required,
    })
}

/// Whether `id` has gathered at least the required number of votes.
pub fn is_confirmed<S: WalletStore + ?Sized>(
    store: &S,
    id: TransactionId,
) -> Result<bool, WalletError> {
    let transaction = store.transaction(id).ok_or(WalletError::NotFound { id })?;
    Ok(transaction.confirmations_counter >= store.required())
}

/// Votes still missing before `id` executes (zero once reached).
pub fn remaining_confirmations<S: WalletStore + ?Sized>(
    store: &S,
    id: TransactionId,
) -> Result<u64, WalletError> {
    let transaction = store.transaction(id).ok_or(WalletError::NotFound { id })?;
    Ok(store
        .required()
        .saturating_sub(transaction.confirmations_counter))
}
