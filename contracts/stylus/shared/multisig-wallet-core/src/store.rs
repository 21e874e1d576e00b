use alloc::vec::Vec;

use alloy_primitives::{Address, U256};

use crate::{
    errors::HostError,
    events::WalletEvent,
    transaction::{Payload, Transaction, TransactionId},
};

/// Persisted wallet state, implemented over contract storage on-chain and in memory off-chain.
///
/// Implementations only store what they are told; every rule lives in the engine functions.
pub trait WalletStore {
    fn is_owner(&self, account: Address) -> bool;

    /// Owners in founding order.
    fn owners(&self) -> Vec<Address>;

    fn master_key(&self) -> Address;

    fn administrator(&self) -> Address;

    /// Confirmations required before a transaction executes.
    fn required(&self) -> u64;

    /// Number of submitted transactions; also the highest assigned id.
    fn transaction_count(&self) -> u64;

    fn transaction(&self, id: TransactionId) -> Option<Transaction>;

    /// Append `transaction` under the next id and return that id.
    fn append_transaction(&mut self, transaction: Transaction) -> TransactionId;

    fn is_confirmed_by(&self, id: TransactionId, owner: Address) -> bool;

    /// Record `owner`'s vote and bump the counter in one step. Returns the new counter.
    fn add_confirmation(&mut self, id: TransactionId, owner: Address) -> u64;

    fn mark_executed(&mut self, id: TransactionId);

    fn transaction_exists(&self, id: TransactionId) -> bool {
        id >= 1 && id <= self.transaction_count()
    }
}

/// Everything outside the wallet's own storage.
pub trait WalletHost {
    /// Native balance held by the wallet account.
    fn balance(&self) -> U256;

    /// Send `value` with `payload` to `destination`.
    fn forward(
        &mut self,
        destination: Address,
        value: U256,
        payload: &Payload,
    ) -> Result<(), HostError>;

    /// Plain native transfer out of the wallet.
    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), HostError>;

    /// `token.approve(spender, amount)` issued by the wallet.
    fn approve(&mut self, token: Address, spender: Address, amount: U256)
        -> Result<(), HostError>;

    fn emit(&mut self, event: WalletEvent);
}
