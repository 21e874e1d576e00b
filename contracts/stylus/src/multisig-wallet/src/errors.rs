//! Revert data for every wallet failure.

use alloy_sol_types::sol;
use stylus_sdk::{alloy_primitives::U256, stylus_proc::SolidityError};

use multisig_wallet_core::{ConfigError, Role, WalletError};

sol! {
    #[derive(Debug, PartialEq, Eq)]
    error Unauthorized(address caller, uint8 requiredRole);
    #[derive(Debug, PartialEq, Eq)]
    error NotFound(uint256 transactionId);
    #[derive(Debug, PartialEq, Eq)]
    error AlreadyConfirmed(uint256 transactionId, address owner);
    #[derive(Debug, PartialEq, Eq)]
    error AlreadyExecuted(uint256 transactionId);
    #[derive(Debug, PartialEq, Eq)]
    error InsufficientBalance(uint256 requested, uint256 available);
    /// Part of the ABI for completeness; the wallet never reverts with it, since a failed
    /// forward is committed and reported through `ExecutionFailure` instead.
    #[derive(Debug, PartialEq, Eq)]
    error ForwardingFailed(uint256 transactionId);
    #[derive(Debug, PartialEq, Eq)]
    error WithdrawalFailed(uint256 amount);
    #[derive(Debug, PartialEq, Eq)]
    error ApprovalFailed(address token);

    // Construction.
    #[derive(Debug, PartialEq, Eq)]
    error NoOwners();
    #[derive(Debug, PartialEq, Eq)]
    error ZeroAddress();
    #[derive(Debug, PartialEq, Eq)]
    error DuplicateOwner(address owner);
    #[derive(Debug, PartialEq, Eq)]
    error OwnerCountMismatch(uint256 expected, uint256 actual);
    #[derive(Debug, PartialEq, Eq)]
    error InvalidRequirement(uint256 required, uint256 owners);
}

#[derive(SolidityError, Debug, PartialEq, Eq)]
pub enum MultiSigError {
    Unauthorized(Unauthorized),
    NotFound(NotFound),
    AlreadyConfirmed(AlreadyConfirmed),
    AlreadyExecuted(AlreadyExecuted),
    InsufficientBalance(InsufficientBalance),
    ForwardingFailed(ForwardingFailed),
    WithdrawalFailed(WithdrawalFailed),
    ApprovalFailed(ApprovalFailed),
    NoOwners(NoOwners),
    ZeroAddress(ZeroAddress),
    DuplicateOwner(DuplicateOwner),
    OwnerCountMismatch(OwnerCountMismatch),
    InvalidRequirement(InvalidRequirement),
}

/// ABI code of a role in `Unauthorized.requiredRole`.
pub fn role_code(role: Role) -> u8 {
    match role {
        Role::Owner => 0,
        Role::MasterKey => 1,
        Role::Administrator => 2,
    }
}

impl From<WalletError> for MultiSigError {
    fn from(err: WalletError) -> Self {
        match err {
            WalletError::Unauthorized { caller, required } => {
                MultiSigError::Unauthorized(Unauthorized {
                    caller,
                    requiredRole: role_code(required),
                })
            }
            WalletError::NotFound { id } => MultiSigError::NotFound(NotFound {
                transactionId: U256::from(id),
            }),
            WalletError::AlreadyConfirmed { id, owner } => {
                MultiSigError::AlreadyConfirmed(AlreadyConfirmed {
                    transactionId: U256::from(id),
                    owner,
                })
            }
            WalletError::AlreadyExecuted { id } => MultiSigError::AlreadyExecuted(AlreadyExecuted {
                transactionId: U256::from(id),
            }),
            WalletError::InsufficientBalance {
                requested,
                available,
            } => MultiSigError::InsufficientBalance(InsufficientBalance {
                requested,
                available,
            }),
            WalletError::ForwardingFailed { id } => {
                MultiSigError::ForwardingFailed(ForwardingFailed {
                    transactionId: U256::from(id),
                })
            }
            WalletError::WithdrawalFailed { amount } => {
                MultiSigError::WithdrawalFailed(WithdrawalFailed { amount })
            }
            WalletError::ApprovalFailed { token } => {
                MultiSigError::ApprovalFailed(ApprovalFailed { token })
            }
        }
    }
}

impl From<ConfigError> for MultiSigError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::NoOwners => MultiSigError::NoOwners(NoOwners {}),
            ConfigError::ZeroAddress => MultiSigError::ZeroAddress(ZeroAddress {}),
            ConfigError::DuplicateOwner(owner) => {
                MultiSigError::DuplicateOwner(DuplicateOwner { owner })
            }
            ConfigError::OwnerCountMismatch { expected, actual } => {
                MultiSigError::OwnerCountMismatch(OwnerCountMismatch {
                    expected: U256::from(expected),
                    actual: U256::from(actual),
                })
            }
            ConfigError::InvalidRequirement { required, owners } => {
                MultiSigError::InvalidRequirement(InvalidRequirement {
                    required: U256::from(required),
                    owners: U256::from(owners),
                })
            }
        }
    }
}
