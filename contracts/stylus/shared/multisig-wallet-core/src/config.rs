//! Construction parameters and their validation.

use alloc::vec::Vec;
use core::fmt;

use alloy_primitives::Address;

/// Validated founding configuration of a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletConfig {
    pub owners: Vec<Address>,
    pub master_key: Address,
    pub administrator: Address,
    pub required: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoOwners,
    /// Owners and the master key must be real accounts.
    ZeroAddress,
    DuplicateOwner(Address),
    /// `total_owners` disagrees with the supplied owner list.
    OwnerCountMismatch { expected: u64, actual: u64 },
    /// Threshold must lie in `1..=owners`.
    InvalidRequirement { required: u64, owners: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoOwners => f.write_str("owner list is empty"),
            ConfigError::ZeroAddress => f.write_str("zero address is not a valid owner or master key"),
            ConfigError::DuplicateOwner(owner) => write!(f, "owner {owner} listed twice"),
            ConfigError::OwnerCountMismatch { expected, actual } => write!(
                f,
                "expected {expected} owners, got {actual}"
            ),
            ConfigError::InvalidRequirement { required, owners } => write!(
                f,
                "cannot require {required} confirmations from {owners} owners"
            ),
        }
    }
}

impl WalletConfig {
    /// Validate founding parameters. The owner list is authoritative; `total_owners` only has
    /// to agree with it.
    pub fn new(
        owners: Vec<Address>,
        master_key: Address,
        administrator: Address,
        total_owners: u64,
        required: u64,
    ) -> Result<Self, ConfigError> {
        if owners.is_empty() {
            return Err(ConfigError::NoOwners);
        }
        if master_key == Address::ZERO {
            return Err(ConfigError::ZeroAddress);
        }
        for (i, owner) in owners.iter().enumerate() {
            if *owner == Address::ZERO {
                return Err(ConfigError::ZeroAddress);
            }
            if owners[..i].contains(owner) {
                return Err(ConfigError::DuplicateOwner(*owner));
            }
        }

        let actual = owners.len() as u64;
        if total_owners != actual {
            return Err(ConfigError::OwnerCountMismatch {
                expected: total_owners,
                actual,
            });
        }
        if required == 0 || required > actual {
            return Err(ConfigError::InvalidRequirement {
                required,
                owners: actual,
            });
        }

        Ok(Self {
            owners,
            master_key,
            administrator,
            required,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloy_primitives::address;

    const A: Address = address!("16f1b1cb43c0744f85b52104f6a7c3cc60cd3c49");
    const B: Address = address!("f204b4b3b0a4656e8e818d6c051679162f426999");
    const C: Address = address!("331dc60105e769c2323309dfd73f47228e8005f5");
    const MASTER: Address = address!("8493484940139e84aa386999c603ad6eb5515eda");

    #[test]
    fn test_accepts_founding_set() {
        let config = WalletConfig::new(vec![A, B, C], MASTER, A, 3, 2).unwrap();
        assert_eq!(config.owners, vec![A, B, C]);
        assert_eq!(config.required, 2);
    }

    #[test]
    fn test_rejects_empty_owner_list() {
        assert_eq!(
            WalletConfig::new(vec![], MASTER, A, 0, 1),
            Err(ConfigError::NoOwners)
        );
    }

    #[test]
    fn test_rejects_duplicates_and_zero_addresses() {
        assert_eq!(
            WalletConfig::new(vec![A, B, A], MASTER, A, 3, 2),
            Err(ConfigError::DuplicateOwner(A))
        );
        assert_eq!(
            WalletConfig::new(vec![A, Address::ZERO], MASTER, A, 2, 1),
            Err(ConfigError::ZeroAddress)
        );
        assert_eq!(
            WalletConfig::new(vec![A], Address::ZERO, A, 1, 1),
            Err(ConfigError::ZeroAddress)
        );
    }

    #[test]
    fn test_total_owners_must_match_list() {
        assert_eq!(
            WalletConfig::new(vec![A, B], MASTER, A, 3, 2),
            Err(ConfigError::OwnerCountMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_threshold_bounds() {
        assert_eq!(
            WalletConfig::new(vec![A, B], MASTER, A, 2, 0),
            Err(ConfigError::InvalidRequirement {
                required: 0,
                owners: 2
            })
        );
        assert_eq!(
            WalletConfig::new(vec![A, B], MASTER, A, 2, 3),
            Err(ConfigError::InvalidRequirement {
                required: 3,
                owners: 2
            })
        );
        assert!(WalletConfig::new(vec![A, B], MASTER, A, 2, 2).is_ok());
    }
}
