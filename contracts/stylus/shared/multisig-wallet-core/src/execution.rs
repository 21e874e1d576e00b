//! At-most-once forwarding of confirmed transactions, and master-key withdrawals.

use alloy_primitives::{Address, U256};

use crate::{
    access::require_master_key,
    errors::WalletError,
    events::WalletEvent,
    store::{WalletHost, WalletStore},
    transaction::TransactionId,
};

/// Forward a transaction that just reached its threshold.
///
/// `executed` is committed before the external call, so a destination calling back into the
/// wallet sees the entry as final. A failed forward keeps `executed = true`.
pub(crate) fn execute<W: WalletStore + WalletHost + ?Sized>(
    wallet: &mut W,
    id: TransactionId,
    executor: Address,
) -> Result<(), WalletError> {
    let transaction = wallet.transaction(id).ok_or(WalletError::NotFound { id })?;
    if transaction.executed {
        return Err(WalletError::AlreadyExecuted { id });
    }
    debug_assert!(transaction.confirmations_counter >= wallet.required());

    wallet.mark_executed(id);
    let forwarded = wallet.forward(
        transaction.destination,
        transaction.value,
        &transaction.payload(),
    );

    wallet.emit(WalletEvent::Execution {
        transaction_id: id,
        executor,
    });
    if forwarded.is_err() {
        wallet.emit(WalletEvent::ExecutionFailure { transaction_id: id });
        return Err(WalletError::ForwardingFailed { id });
    }
    Ok(())
}

/// Move `amount` of native balance to the master key. No quorum involved.
pub fn withdraw<W: WalletStore + WalletHost + ?Sized>(
    wallet: &mut W,
    caller: Address,
    amount: U256,
) -> Result<(), WalletError> {
    require_master_key(wallet, caller)?;

    let available = wallet.balance();
    if amount > available {
        return Err(WalletError::InsufficientBalance {
            requested: amount,
            available,
        });
    }

    wallet
        .send_native(caller, amount)
        .map_err(|_| WalletError::WithdrawalFailed { amount })?;
    wallet.emit(WalletEvent::Withdrawal {
        sender: caller,
        amount,
    });
    Ok(())
}

/// Record native value received by the wallet. Crediting the balance is the host's job.
pub fn deposit<H: WalletHost + ?Sized>(wallet: &mut H, sender: Address, value: U256) {
    if !value.is_zero() {
        wallet.emit(WalletEvent::Deposit { sender, value });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::WalletConfig,
        confirmation::confirm,
        ledger::submit,
        memory::{Effect, MemoryWallet},
    };
    use alloc::{vec, vec::Vec};
    use alloy_primitives::address;

    const A: Address = address!("16f1b1cb43c0744f85b52104f6a7c3cc60cd3c49");
    const B: Address = address!("f204b4b3b0a4656e8e818d6c051679162f426999");
    const MASTER: Address = address!("8493484940139e84aa386999c603ad6eb5515eda");
    const DEST: Address = address!("000000000000000000000000000000000000d00d");

    fn wallet(required: u64) -> MemoryWallet {
        let config = WalletConfig::new(vec![A, B], MASTER, A, 2, required).unwrap();
        MemoryWallet::new(config).with_balance(U256::from(100u64))
    }

    #[test]
    fn test_executed_is_set_before_forwarding() {
        let mut wallet = wallet(2);
        submit(&mut wallet, A, DEST, U256::from(10u64), vec![0xde, 0xad]).unwrap();
        confirm(&mut wallet, B, 1).unwrap();

        assert_eq!(
            wallet.effects(),
            &[Effect::Forwarded {
                destination: DEST,
                value: U256::from(10u64),
                data: vec![0xde, 0xad],
                executed_at_call: true,
            }]
        );
    }

    #[test]
    fn test_failed_forward_keeps_vote_and_flag() {
        let mut wallet = wallet(2).reject_calls_to(DEST);
        submit(&mut wallet, A, DEST, U256::from(10u64), Vec::new()).unwrap();

        assert_eq!(
            confirm(&mut wallet, B, 1),
            Err(WalletError::ForwardingFailed { id: 1 })
        );
        let entry = wallet.transaction(1).unwrap();
        assert!(entry.executed);
        assert_eq!(entry.confirmations_counter, 2);
        assert!(wallet.is_confirmed_by(1, B));
        assert_eq!(wallet.balance(), U256::from(100u64));
        assert_eq!(
            &wallet.events()[wallet.events().len() - 2..],
            &[
                WalletEvent::Execution {
                    transaction_id: 1,
                    executor: B
                },
                WalletEvent::ExecutionFailure { transaction_id: 1 },
            ]
        );

        // No second attempt through a further vote.
        assert_eq!(
            confirm(&mut wallet, A, 1),
            Err(WalletError::AlreadyExecuted { id: 1 })
        );
    }

    #[test]
    fn test_forward_exceeding_balance_fails() {
        let mut wallet = wallet(1);
        let id = submit(&mut wallet, A, DEST, U256::from(101u64), Vec::new()).unwrap();
        assert!(wallet.transaction(id).unwrap().executed);
        assert_eq!(wallet.balance(), U256::from(100u64));
        assert_eq!(
            wallet.events().last(),
            Some(&WalletEvent::ExecutionFailure { transaction_id: id })
        );
    }

    #[test]
    fn test_withdraw_rules() {
        let mut wallet = wallet(2);

        assert!(matches!(
            withdraw(&mut wallet, A, U256::from(1u64)),
            Err(WalletError::Unauthorized { .. })
        ));
        assert_eq!(
            withdraw(&mut wallet, MASTER, U256::from(101u64)),
            Err(WalletError::InsufficientBalance {
                requested: U256::from(101u64),
                available: U256::from(100u64)
            })
        );
        assert_eq!(wallet.balance(), U256::from(100u64));
        assert!(wallet.events().is_empty());

        withdraw(&mut wallet, MASTER, U256::from(100u64)).unwrap();
        assert_eq!(wallet.balance(), U256::ZERO);
        assert_eq!(wallet.native_balance_of(MASTER), U256::from(100u64));
    }

    #[test]
    fn test_rejected_withdrawal_emits_nothing() {
        let mut wallet = wallet(2).reject_calls_to(MASTER);
        assert_eq!(
            withdraw(&mut wallet, MASTER, U256::from(1u64)),
            Err(WalletError::WithdrawalFailed {
                amount: U256::from(1u64)
            })
        );
        assert_eq!(wallet.balance(), U256::from(100u64));
        assert!(wallet.events().is_empty());
    }
}
