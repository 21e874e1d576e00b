//! Role checks gating every mutating operation.
//!
//! The three roles are independent: owning a seat grants no master-key rights and the
//! master key is not an owner unless it was also listed as one.

use core::fmt;

use alloy_primitives::Address;

use crate::{errors::WalletError, store::WalletStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Owner,
    MasterKey,
    Administrator,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Owner => "owner",
            Role::MasterKey => "master key",
            Role::Administrator => "administrator",
        };
        f.write_str(name)
    }
}

/// Roles held by a single account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Roles {
    pub owner: bool,
    pub master_key: bool,
    pub administrator: bool,
}

impl Roles {
    pub fn has(&self, role: Role) -> bool {
        match role {
            Role::Owner => self.owner,
            Role::MasterKey => self.master_key,
            Role::Administrator => self.administrator,
        }
    }
}

pub fn roles_of<S: WalletStore + ?Sized>(store: &S, account: Address) -> Roles {
    Roles {
        owner: store.is_owner(account),
        master_key: store.master_key() == account,
        administrator: store.administrator() == account,
    }
}

pub fn require_owner<S: WalletStore + ?Sized>(store: &S, caller: Address) -> Result<(), WalletError> {
    require(store.is_owner(caller), caller, Role::Owner)
}

pub fn require_master_key<S: WalletStore + ?Sized>(
    store: &S,
    caller: Address,
) -> Result<(), WalletError> {
    require(store.master_key() == caller, caller, Role::MasterKey)
}

pub fn require_administrator<S: WalletStore + ?Sized>(
    store: &S,
    caller: Address,
) -> Result<(), WalletError> {
    require(store.administrator() == caller, caller, Role::Administrator)
}

fn require(granted: bool, caller: Address, required: Role) -> Result<(), WalletError> {
    if granted {
        Ok(())
    } else {
        Err(WalletError::Unauthorized { caller, required })
    }
}
