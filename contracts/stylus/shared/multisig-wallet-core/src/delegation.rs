use alloy_primitives::{Address, U256};

use crate::{
    access::require_administrator,
    errors::WalletError,
    events::WalletEvent,
    store::{WalletHost, WalletStore},
};

/// Let the master key spend up to `amount` of the wallet's balance of `token`.
///
/// A single `approve` on the token; a later call replaces the allowance.
pub fn add_token<W: WalletStore + WalletHost + ?Sized>(
    wallet: &mut W,
    caller: Address,
    token: Address,
    amount: U256,
) -> Result<(), WalletError> {
    require_administrator(wallet, caller)?;

    let master_key = wallet.master_key();
    wallet
        .approve(token, master_key, amount)
        .map_err(|_| WalletError::ApprovalFailed { token })?;
    wallet.emit(WalletEvent::TokenAdded {
        token_address: token,
        master_key,
    });
    Ok(())
}
