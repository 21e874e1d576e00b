//! Stylus entrypoint for the multisig wallet.
//!
//! Design notes:
//! - Owners submit and confirm; the confirmation that reaches the threshold forwards the call
//!   in the same transaction. The master key withdraws native funds without a quorum; the
//!   administrator (deployment origin) grants the master key a token allowance.
//! - All rules run in `multisig-wallet-core`. This type only provides storage, external calls
//!   and logs through the `WalletStore` / `WalletHost` seams.
//! - A failed forward does not revert: reverting would erase the vote and the `executed` flag
//!   that must stay committed. The failure is reported by an `ExecutionFailure` log.

use alloc::vec::Vec;

use alloy_sol_types::SolCall;
use stylus_sdk::{
    abi::Bytes,
    alloy_primitives::{Address, U256},
    call::RawCall,
    prelude::*,
    stylus_core::log,
};

use multisig_wallet_core::{
    add_token, confirm, confirmations, deposit,
    ledger::{self, TransactionFilter},
    remaining_confirmations, submit, withdraw, HostError, Payload, Transaction, TransactionId,
    WalletConfig, WalletError, WalletEvent, WalletHost, WalletStore,
};

use crate::{
    errors::{MultiSigError, NotFound},
    interfaces::{
        Confirmation, Deposit, Execution, ExecutionFailure, Submission, TokenAdded, Withdrawal,
        IERC20,
    },
};

sol_storage! {
    #[entrypoint]
    pub struct MultiSigWallet {
        /// Deployment origin; may grant token allowances to the master key.
        address admin;
        address master;

        /// Founding owners, in the order given at construction.
        address[] owner_list;
        mapping(address => bool) owner_set;

        /// Confirmations required before execution.
        uint256 threshold;

        /// Number of submitted transactions; ids run `1..=tx_count`.
        uint256 tx_count;
        mapping(uint256 => TransactionRecord) ledger;

        /// Votes: transaction id => owner => confirmed.
        mapping(uint256 => mapping(address => bool)) votes;
    }

    pub struct TransactionRecord {
        address destination;
        uint256 value;
        bytes data;
        bool executed;
        uint256 confirmations_counter;
    }
}

#[public]
impl MultiSigWallet {
    /// Founding owners, master key and threshold. `total_owners` must equal `owners.len()`.
    /// Any value sent along is kept as the wallet's initial balance; its `Deposit` names
    /// `msg.sender`, the account the value actually arrives from.
    #[constructor]
    #[payable]
    pub fn constructor(
        &mut self,
        owners: Vec<Address>,
        master_key: Address,
        total_owners: U256,
        required: U256,
    ) -> Result<(), MultiSigError> {
        // Deployed through the Stylus deployer contract, so `msg_sender` is not the deployer.
        let administrator = self.vm().tx_origin();
        self.initialize(owners, master_key, administrator, total_owners, required)?;

        let sender = self.vm().msg_sender();
        let value = self.vm().msg_value();
        deposit(self, sender, value);
        Ok(())
    }

    #[receive]
    #[payable]
    pub fn receive(&mut self) -> Result<(), Vec<u8>> {
        let sender = self.vm().msg_sender();
        let value = self.vm().msg_value();
        deposit(self, sender, value);
        Ok(())
    }

    /// Submit a call and count it as the caller's confirmation. Returns the new id.
    pub fn submit_transaction(
        &mut self,
        destination: Address,
        value: U256,
        data: Bytes,
    ) -> Result<U256, MultiSigError> {
        let caller = self.vm().msg_sender();
        // Committed forwarding failures are already folded into `Ok` by `submit`.
        let id = submit(self, caller, destination, value, data.0)?;
        Ok(U256::from(id))
    }

    /// Confirm a pending transaction; executes it when this vote reaches the threshold.
    pub fn confirm_transaction(&mut self, transaction_id: U256) -> Result<(), MultiSigError> {
        let caller = self.vm().msg_sender();
        let id = to_transaction_id(transaction_id)?;
        settle(confirm(self, caller, id).map(|_| ()))
    }

    /// Master key only: move `amount` of native balance to the caller.
    pub fn withdraw(&mut self, amount: U256) -> Result<(), MultiSigError> {
        let caller = self.vm().msg_sender();
        withdraw(self, caller, amount)?;
        Ok(())
    }

    /// Administrator only: approve the master key to spend `amount` of `token_address`.
    pub fn add_token(&mut self, token_address: Address, amount: U256) -> Result<(), MultiSigError> {
        let caller = self.vm().msg_sender();
        add_token(self, caller, token_address, amount)?;
        Ok(())
    }

    /// `(destination, value, data, executed, confirmationsCounter)` of a submitted transaction.
    pub fn transactions(
        &self,
        transaction_id: U256,
    ) -> Result<(Address, U256, Bytes, bool, U256), MultiSigError> {
        let transaction = ledger::transaction(self, to_transaction_id(transaction_id)?)?;
        Ok((
            transaction.destination,
            transaction.value,
            Bytes(transaction.data),
            transaction.executed,
            U256::from(transaction.confirmations_counter),
        ))
    }

    pub fn confirmed_by(&self, transaction_id: U256, owner: Address) -> bool {
        match to_transaction_id(transaction_id) {
            Ok(id) => WalletStore::is_confirmed_by(self, id, owner),
            Err(_) => false,
        }
    }

    pub fn get_confirmations(&self, transaction_id: U256) -> Result<Vec<Address>, MultiSigError> {
        Ok(confirmations(self, to_transaction_id(transaction_id)?)?)
    }

    pub fn get_confirmation_count(&self, transaction_id: U256) -> Result<U256, MultiSigError> {
        let transaction = ledger::transaction(self, to_transaction_id(transaction_id)?)?;
        Ok(U256::from(transaction.confirmations_counter))
    }

    pub fn is_confirmed(&self, transaction_id: U256) -> Result<bool, MultiSigError> {
        let remaining = remaining_confirmations(self, to_transaction_id(transaction_id)?)?;
        Ok(remaining == 0)
    }

    pub fn get_transaction_count(&self, pending: bool, executed: bool) -> U256 {
        U256::from(ledger::count(self, TransactionFilter { pending, executed }))
    }

    /// Ids in `[from, to)` matching the filter.
    pub fn get_transaction_ids(
        &self,
        from: U256,
        to: U256,
        pending: bool,
        executed: bool,
    ) -> Vec<U256> {
        ledger::transaction_ids(
            self,
            TransactionFilter { pending, executed },
            saturating_u64(from),
            saturating_u64(to),
        )
        .into_iter()
        .map(U256::from)
        .collect()
    }

    pub fn transaction_count(&self) -> U256 {
        self.tx_count.get()
    }

    pub fn required(&self) -> U256 {
        self.threshold.get()
    }

    pub fn get_owners(&self) -> Vec<Address> {
        WalletStore::owners(self)
    }

    pub fn is_owner(&self, account: Address) -> bool {
        self.owner_set.get(account)
    }

    pub fn master_key(&self) -> Address {
        self.master.get()
    }

    pub fn administrator(&self) -> Address {
        self.admin.get()
    }
}

impl MultiSigWallet {
    fn initialize(
        &mut self,
        owners: Vec<Address>,
        master_key: Address,
        administrator: Address,
        total_owners: U256,
        required: U256,
    ) -> Result<(), MultiSigError> {
        let config = WalletConfig::new(
            owners,
            master_key,
            administrator,
            saturating_u64(total_owners),
            saturating_u64(required),
        )?;

        for owner in &config.owners {
            self.owner_list.push(*owner);
            self.owner_set.insert(*owner, true);
        }
        self.master.set(config.master_key);
        self.admin.set(config.administrator);
        self.threshold.set(U256::from(config.required));
        Ok(())
    }
}

/// Ids outside `u64` were never assigned; the revert carries the id as passed.
fn to_transaction_id(id: U256) -> Result<TransactionId, MultiSigError> {
    u64::try_from(id).map_err(|_| MultiSigError::NotFound(NotFound { transactionId: id }))
}

/// Revert on rejected calls, but keep a committed outcome: reverting would erase the vote and
/// the `executed` flag of a transaction whose forward failed.
fn settle(result: Result<(), WalletError>) -> Result<(), MultiSigError> {
    match result {
        Err(err) if !err.is_committed() => Err(err.into()),
        _ => Ok(()),
    }
}

/// `approve` return data: empty (non-standard tokens) or an ABI `true`.
fn decode_approve(out: &[u8]) -> Result<(), HostError> {
    if out.is_empty() {
        return Ok(());
    }
    match IERC20::approveCall::abi_decode_returns(out, true) {
        Ok(ret) if ret.success => Ok(()),
        _ => Err(HostError::ApprovalRejected),
    }
}

fn saturating_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

impl WalletStore for MultiSigWallet {
    fn is_owner(&self, account: Address) -> bool {
        self.owner_set.get(account)
    }

    fn owners(&self) -> Vec<Address> {
        (0..self.owner_list.len())
            .filter_map(|i| self.owner_list.get(i))
            .collect()
    }

    fn master_key(&self) -> Address {
        self.master.get()
    }

    fn administrator(&self) -> Address {
        self.admin.get()
    }

    fn required(&self) -> u64 {
        saturating_u64(self.threshold.get())
    }

    fn transaction_count(&self) -> u64 {
        saturating_u64(self.tx_count.get())
    }

    fn transaction(&self, id: TransactionId) -> Option<Transaction> {
        if !self.transaction_exists(id) {
            return None;
        }
        let record = self.ledger.getter(U256::from(id));
        Some(Transaction {
            destination: record.destination.get(),
            value: record.value.get(),
            data: record.data.get_bytes(),
            executed: record.executed.get(),
            confirmations_counter: saturating_u64(record.confirmations_counter.get()),
        })
    }

    fn append_transaction(&mut self, transaction: Transaction) -> TransactionId {
        let id = WalletStore::transaction_count(self) + 1;
        let mut record = self.ledger.setter(U256::from(id));
        record.destination.set(transaction.destination);
        record.value.set(transaction.value);
        record.data.set_bytes(&transaction.data);
        record.executed.set(transaction.executed);
        record
            .confirmations_counter
            .set(U256::from(transaction.confirmations_counter));
        self.tx_count.set(U256::from(id));
        id
    }

    fn is_confirmed_by(&self, id: TransactionId, owner: Address) -> bool {
        self.votes.getter(U256::from(id)).get(owner)
    }

    fn add_confirmation(&mut self, id: TransactionId, owner: Address) -> u64 {
        let key = U256::from(id);
        self.votes.setter(key).insert(owner, true);

        let mut record = self.ledger.setter(key);
        let counter = record.confirmations_counter.get() + U256::from(1u64);
        record.confirmations_counter.set(counter);
        saturating_u64(counter)
    }

    fn mark_executed(&mut self, id: TransactionId) {
        let mut record = self.ledger.setter(U256::from(id));
        record.executed.set(true);
    }
}

impl WalletHost for MultiSigWallet {
    fn balance(&self) -> U256 {
        self.vm().balance(self.vm().contract_address())
    }

    fn forward(
        &mut self,
        destination: Address,
        value: U256,
        payload: &Payload,
    ) -> Result<(), HostError> {
        // Flushed so a callback into the wallet reads the entry as executed.
        let result = unsafe {
            RawCall::new_with_value(value)
                .flush_storage_cache()
                .call(destination, payload.calldata())
        };
        result.map(|_| ()).map_err(|_| HostError::CallReverted)
    }

    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), HostError> {
        let result = unsafe {
            RawCall::new_with_value(amount)
                .flush_storage_cache()
                .call(to, &[])
        };
        result.map(|_| ()).map_err(|_| HostError::CallReverted)
    }

    fn approve(
        &mut self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        let calldata = IERC20::approveCall { spender, amount }.abi_encode();
        let out = unsafe { RawCall::new().flush_storage_cache().call(token, &calldata) }
            .map_err(|_| HostError::CallReverted)?;
        decode_approve(&out)
    }

    fn emit(&mut self, event: WalletEvent) {
        let vm = self.vm();
        match event {
            WalletEvent::Submission {
                transaction_id,
                submitter,
            } => log(
                vm,
                Submission {
                    transactionId: U256::from(transaction_id),
                    submitter,
                },
            ),
            WalletEvent::Confirmation {
                transaction_id,
                confirmer,
            } => log(
                vm,
                Confirmation {
                    transactionId: U256::from(transaction_id),
                    confirmer,
                },
            ),
            WalletEvent::Execution {
                transaction_id,
                executor,
            } => log(
                vm,
                Execution {
                    transactionId: U256::from(transaction_id),
                    executor,
                },
            ),
            WalletEvent::ExecutionFailure { transaction_id } => log(
                vm,
                ExecutionFailure {
                    transactionId: U256::from(transaction_id),
                },
            ),
            WalletEvent::Withdrawal { sender, amount } => {
                log(vm, Withdrawal { sender, amount })
            }
            WalletEvent::TokenAdded {
                token_address,
                master_key,
            } => log(
                vm,
                TokenAdded {
                    tokenAddress: token_address,
                    masterKey: master_key,
                },
            ),
            WalletEvent::Deposit { sender, value } => log(vm, Deposit { sender, value }),
        }
    }
}
