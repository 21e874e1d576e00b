//! M-of-N multisig wallet with a master key, as an Arbitrum Stylus contract.
//!
//! The lifecycle rules live in `multisig-wallet-core`; this crate binds them to contract
//! storage, external calls and EVM logs.

#![cfg_attr(not(any(test, feature = "export-abi")), no_main)]

extern crate alloc;

pub mod errors;
pub mod interfaces;
pub mod wallet;

pub use wallet::MultiSigWallet;
