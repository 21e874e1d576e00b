//! Transaction lifecycle engine for an M-of-N multisig wallet with a master key.
//!
//! The engine is written once against two seams:
//! - [`WalletStore`]: persisted wallet state (roles, threshold, ledger, confirmations);
//! - [`WalletHost`]: the outside world (native balance, forwarded calls, token approvals, logs).
//!
//! The Stylus contract implements both over contract storage; [`memory::MemoryWallet`]
//! implements both in-process for tests and off-chain simulation.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod access;
pub mod config;
pub mod confirmation;
pub mod delegation;
pub mod errors;
pub mod events;
pub mod execution;
pub mod ledger;
pub mod memory;
pub mod store;
pub mod transaction;


pub use access::{require_administrator, require_master_key, require_owner, roles_of, Role, Roles};
pub use config::{ConfigError, WalletConfig};
pub use confirmation::{confirm, is_confirmed, remaining_confirmations, ConfirmOutcome};
pub use delegation::add_token;
pub use errors::{HostError, WalletError};
pub use events::WalletEvent;
pub use execution::{deposit, withdraw};
pub use ledger::{confirmations, submit, transaction_ids, TransactionFilter};
pub use store::{WalletHost, WalletStore};
pub use transaction::{Payload, Transaction, TransactionId};
