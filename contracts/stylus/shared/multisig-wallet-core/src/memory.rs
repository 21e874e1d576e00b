//! In-process wallet and token ledger.
//!
//! `MemoryWallet` implements both engine seams over plain collections. It is what the scenario
//! tests run against and what off-chain tooling can use to dry-run a sequence of calls.
//! Host behaviour is scriptable: destinations can be made to reject calls, and forwarded
//! calls to a registered [`TokenLedger`] are dispatched to it.

use alloc::{
    collections::{BTreeMap, BTreeSet},
    vec::Vec,
};

use alloy_primitives::{address, Address, U256};

use crate::{
    config::WalletConfig,
    errors::HostError,
    events::WalletEvent,
    execution,
    store::{WalletHost, WalletStore},
    transaction::{Payload, Transaction, TransactionId},
};

/// Account the in-memory wallet lives at.
pub const WALLET_ACCOUNT: Address = address!("00000000000000000000000000000000000057a1");

// ERC-20 selectors understood by `TokenLedger::dispatch`.
pub const TRANSFER_SELECTOR: [u8; 4] = [0xa9, 0x05, 0x9c, 0xbb];
pub const APPROVE_SELECTOR: [u8; 4] = [0x09, 0x5e, 0xa7, 0xb3];
pub const TRANSFER_FROM_SELECTOR: [u8; 4] = [0x23, 0xb8, 0x72, 0xdd];

/// Host side effects, in the order the engine caused them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Forwarded {
        destination: Address,
        value: U256,
        data: Vec<u8>,
        /// Whether the entry being forwarded was already marked executed when the call went out.
        executed_at_call: bool,
    },
    NativeSent {
        to: Address,
        amount: U256,
    },
    Approved {
        token: Address,
        spender: Address,
        amount: U256,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryWallet {
    account: Address,
    config: WalletConfig,
    transactions: Vec<Transaction>,
    confirmed: BTreeSet<(TransactionId, Address)>,
    last_executed: Option<TransactionId>,
    balance: U256,
    native_balances: BTreeMap<Address, U256>,
    tokens: BTreeMap<Address, TokenLedger>,
    rejecting: BTreeSet<Address>,
    events: Vec<WalletEvent>,
    effects: Vec<Effect>,
}

impl MemoryWallet {
    pub fn new(config: WalletConfig) -> Self {
        Self {
            account: WALLET_ACCOUNT,
            config,
            transactions: Vec::new(),
            confirmed: BTreeSet::new(),
            last_executed: None,
            balance: U256::ZERO,
            native_balances: BTreeMap::new(),
            tokens: BTreeMap::new(),
            rejecting: BTreeSet::new(),
            events: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    /// Make every call, transfer or approval towards `account` fail.
    pub fn reject_calls_to(mut self, account: Address) -> Self {
        self.rejecting.insert(account);
        self
    }

    pub fn with_token(mut self, token: Address, ledger: TokenLedger) -> Self {
        self.tokens.insert(token, ledger);
        self
    }

    pub fn account(&self) -> Address {
        self.account
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn token(&self, token: Address) -> Option<&TokenLedger> {
        self.tokens.get(&token)
    }

    pub fn token_mut(&mut self, token: Address) -> Option<&mut TokenLedger> {
        self.tokens.get_mut(&token)
    }

    /// Native balance credited to an outside account by this wallet.
    pub fn native_balance_of(&self, account: Address) -> U256 {
        self.native_balances
            .get(&account)
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn events(&self) -> &[WalletEvent] {
        &self.events
    }

    pub fn effects(&self) -> &[Effect] {
        &self.effects
    }

    /// Native value arriving from `sender`.
    pub fn receive(&mut self, sender: Address, value: U256) {
        self.balance = self.balance.saturating_add(value);
        execution::deposit(self, sender, value);
    }

    fn pay_out(&mut self, to: Address, amount: U256) -> Result<(), HostError> {
        if self.rejecting.contains(&to) || amount > self.balance {
            return Err(HostError::CallReverted);
        }
        self.balance -= amount;
        let credited = self.native_balance_of(to).saturating_add(amount);
        self.native_balances.insert(to, credited);
        Ok(())
    }

    fn entry_mut(&mut self, id: TransactionId) -> Option<&mut Transaction> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.transactions.get_mut(index)
    }
}

impl WalletStore for MemoryWallet {
    fn is_owner(&self, account: Address) -> bool {
        self.config.owners.contains(&account)
    }

    fn owners(&self) -> Vec<Address> {
        self.config.owners.clone()
    }

    fn master_key(&self) -> Address {
        self.config.master_key
    }

    fn administrator(&self) -> Address {
        self.config.administrator
    }

    fn required(&self) -> u64 {
        self.config.required
    }

    fn transaction_count(&self) -> u64 {
        self.transactions.len() as u64
    }

    fn transaction(&self, id: TransactionId) -> Option<Transaction> {
        let index = usize::try_from(id).ok()?.checked_sub(1)?;
        self.transactions.get(index).cloned()
    }

    fn append_transaction(&mut self, transaction: Transaction) -> TransactionId {
        self.transactions.push(transaction);
        self.transactions.len() as TransactionId
    }

    fn is_confirmed_by(&self, id: TransactionId, owner: Address) -> bool {
        self.confirmed.contains(&(id, owner))
    }

    fn add_confirmation(&mut self, id: TransactionId, owner: Address) -> u64 {
        if !self.confirmed.insert((id, owner)) {
            return self.transaction(id).map_or(0, |t| t.confirmations_counter);
        }
        match self.entry_mut(id) {
            Some(entry) => {
                entry.confirmations_counter += 1;
                entry.confirmations_counter
            }
            None => 0,
        }
    }

    fn mark_executed(&mut self, id: TransactionId) {
        if let Some(entry) = self.entry_mut(id) {
            entry.executed = true;
            self.last_executed = Some(id);
        }
    }
}

impl WalletHost for MemoryWallet {
    fn balance(&self) -> U256 {
        self.balance
    }

    fn forward(
        &mut self,
        destination: Address,
        value: U256,
        payload: &Payload,
    ) -> Result<(), HostError> {
        let executed_at_call = self
            .last_executed
            .and_then(|id| self.transaction(id))
            .map_or(false, |t| {
                t.executed
                    && t.destination == destination
                    && t.value == value
                    && t.data == payload.calldata()
            });
        self.effects.push(Effect::Forwarded {
            destination,
            value,
            data: payload.calldata().to_vec(),
            executed_at_call,
        });

        if self.rejecting.contains(&destination) || value > self.balance {
            return Err(HostError::CallReverted);
        }
        let wallet = self.account;
        if let (Payload::Call(data), Some(token)) = (payload, self.tokens.get_mut(&destination)) {
            token
                .dispatch(wallet, data)
                .map_err(|_| HostError::CallReverted)?;
        }
        self.pay_out(destination, value)
    }

    fn send_native(&mut self, to: Address, amount: U256) -> Result<(), HostError> {
        self.pay_out(to, amount)?;
        self.effects.push(Effect::NativeSent { to, amount });
        Ok(())
    }

    fn approve(
        &mut self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), HostError> {
        if self.rejecting.contains(&token) {
            return Err(HostError::ApprovalRejected);
        }
        let wallet = self.account;
        let ledger = self.tokens.get_mut(&token).ok_or(HostError::CallReverted)?;
        ledger.approve(wallet, spender, amount);
        self.effects.push(Effect::Approved {
            token,
            spender,
            amount,
        });
        Ok(())
    }

    fn emit(&mut self, event: WalletEvent) {
        self.events.push(event);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    NotAdmin,
    InsufficientBalance,
    InsufficientAllowance,
    UnknownSelector,
    MalformedCall,
}

/// Minimal ERC-20 ledger: balances, allowances and an admin-only mint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenLedger {
    admin: Address,
    balances: BTreeMap<Address, U256>,
    allowances: BTreeMap<(Address, Address), U256>,
}

impl TokenLedger {
    pub fn new(admin: Address) -> Self {
        Self {
            admin,
            balances: BTreeMap::new(),
            allowances: BTreeMap::new(),
        }
    }

    pub fn mint(&mut self, caller: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        if caller != self.admin {
            return Err(TokenError::NotAdmin);
        }
        let balance = self.balance_of(to).saturating_add(amount);
        self.balances.insert(to, balance);
        Ok(())
    }

    pub fn balance_of(&self, owner: Address) -> U256 {
        self.balances.get(&owner).copied().unwrap_or(U256::ZERO)
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or(U256::ZERO)
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.allowances.insert((owner, spender), amount);
    }

    pub fn transfer(&mut self, from: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        let from_balance = self.balance_of(from);
        if amount > from_balance {
            return Err(TokenError::InsufficientBalance);
        }
        self.balances.insert(from, from_balance - amount);
        let to_balance = self.balance_of(to).saturating_add(amount);
        self.balances.insert(to, to_balance);
        Ok(())
    }

    pub fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let allowance = self.allowance(from, spender);
        if amount > allowance {
            return Err(TokenError::InsufficientAllowance);
        }
        self.transfer(from, to, amount)?;
        self.allowances.insert((from, spender), allowance - amount);
        Ok(())
    }

    /// Execute ABI-encoded `transfer`, `approve` or `transferFrom` call data sent by `caller`.
    pub fn dispatch(&mut self, caller: Address, data: &[u8]) -> Result<(), TokenError> {
        if data.len() < 4 {
            return Err(TokenError::MalformedCall);
        }
        let selector = [data[0], data[1], data[2], data[3]];
        let args = &data[4..];
        match selector {
            TRANSFER_SELECTOR => {
                let (to, amount) = (word_address(args, 0)?, word_u256(args, 1)?);
                self.transfer(caller, to, amount)
            }
            APPROVE_SELECTOR => {
                let (spender, amount) = (word_address(args, 0)?, word_u256(args, 1)?);
                self.approve(caller, spender, amount);
                Ok(())
            }
            TRANSFER_FROM_SELECTOR => {
                let from = word_address(args, 0)?;
                let to = word_address(args, 1)?;
                let amount = word_u256(args, 2)?;
                self.transfer_from(caller, from, to, amount)
            }
            _ => Err(TokenError::UnknownSelector),
        }
    }
}

fn word(args: &[u8], index: usize) -> Result<&[u8], TokenError> {
    args.get(index * 32..(index + 1) * 32)
        .ok_or(TokenError::MalformedCall)
}

fn word_address(args: &[u8], index: usize) -> Result<Address, TokenError> {
    Ok(Address::from_slice(&word(args, index)?[12..]))
}

fn word_u256(args: &[u8], index: usize) -> Result<U256, TokenError> {
    Ok(U256::from_be_slice(word(args, index)?))
}

/// ABI-encode a two-argument `(address, uint256)` token call.
pub fn encode_address_amount(selector: [u8; 4], account: Address, amount: U256) -> Vec<u8> {
    let mut data = Vec::with_capacity(4 + 64);
    data.extend_from_slice(&selector);
    data.extend_from_slice(&[0u8; 12]);
    data.extend_from_slice(account.as_slice());
    data.extend_from_slice(&amount.to_be_bytes::<32>());
    data
}
