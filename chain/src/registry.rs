//! The six tracked contracts and their resolved addresses.
//!
//! All addresses are validated eagerly at construction so a partial or
//! broken configuration is caught at startup, not discovered mid-backfill.

use crate::error::ChainError;
use crate::events::EventKind;
use alloy_primitives::Address;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The contracts the mirror tracks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractKind {
    StableCoin,
    Payroll,
    TagRegistry,
    AssetRegistry,
    AirtimeConverter,
    SavingsLock,
}

impl ContractKind {
    pub const ALL: [ContractKind; 6] = [
        ContractKind::StableCoin,
        ContractKind::Payroll,
        ContractKind::TagRegistry,
        ContractKind::AssetRegistry,
        ContractKind::AirtimeConverter,
        ContractKind::SavingsLock,
    ];

    /// Stable snake_case name, used in config keys, cursor keys and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContractKind::StableCoin => "stable_coin",
            ContractKind::Payroll => "payroll",
            ContractKind::TagRegistry => "tag_registry",
            ContractKind::AssetRegistry => "asset_registry",
            ContractKind::AirtimeConverter => "airtime_converter",
            ContractKind::SavingsLock => "savings_lock",
        }
    }

    fn index(&self) -> usize {
        Self::ALL.iter().position(|k| k == self).unwrap_or(0)
    }
}

impl fmt::Display for ContractKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Contract addresses as configured (TOML `[contracts]` section).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ContractsConfig {
    pub stable_coin: String,
    pub payroll: String,
    pub tag_registry: String,
    pub asset_registry: String,
    pub airtime_converter: String,
    pub savings_lock: String,
}

impl ContractsConfig {
    fn entry(&self, kind: ContractKind) -> &str {
        match kind {
            ContractKind::StableCoin => &self.stable_coin,
            ContractKind::Payroll => &self.payroll,
            ContractKind::TagRegistry => &self.tag_registry,
            ContractKind::AssetRegistry => &self.asset_registry,
            ContractKind::AirtimeConverter => &self.airtime_converter,
            ContractKind::SavingsLock => &self.savings_lock,
        }
    }
}

/// Resolved handles for all six tracked contracts.
#[derive(Clone, Debug)]
pub struct ContractRegistry {
    addresses: [Address; 6],
}

impl ContractRegistry {
    /// Parse and validate every configured address.
    ///
    /// Fails with `ChainError::Config` naming the offending contract if an
    /// entry is empty or not a valid address.
    pub fn from_config(cfg: &ContractsConfig) -> Result<Self, ChainError> {
        let mut addresses = [Address::ZERO; 6];
        for kind in ContractKind::ALL {
            let raw = cfg.entry(kind).trim();
            if raw.is_empty() {
                return Err(ChainError::Config(format!(
                    "missing address for contract '{kind}'"
                )));
            }
            let parsed = Address::from_str(raw).map_err(|e| {
                ChainError::Config(format!("bad address for contract '{kind}': {e}"))
            })?;
            addresses[kind.index()] = parsed;
        }
        Ok(Self { addresses })
    }

    pub fn address_of(&self, kind: ContractKind) -> Address {
        self.addresses[kind.index()]
    }
}

/// Every (contract, event) pair the sync engines track.
pub fn tracked_pairs() -> impl Iterator<Item = (ContractKind, EventKind)> {
    ContractKind::ALL
        .into_iter()
        .flat_map(|kind| kind.events().iter().map(move |ev| (kind, *ev)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> ContractsConfig {
        ContractsConfig {
            stable_coin: "0x0000000000000000000000000000000000000001".into(),
            payroll: "0x0000000000000000000000000000000000000002".into(),
            tag_registry: "0x0000000000000000000000000000000000000003".into(),
            asset_registry: "0x0000000000000000000000000000000000000004".into(),
            airtime_converter: "0x0000000000000000000000000000000000000005".into(),
            savings_lock: "0x0000000000000000000000000000000000000006".into(),
        }
    }

    #[test]
    fn resolves_all_contracts() {
        let registry = ContractRegistry::from_config(&full_config()).unwrap();
        let a = registry.address_of(ContractKind::AirtimeConverter);
        assert_eq!(
            a,
            Address::from_str("0x0000000000000000000000000000000000000005").unwrap()
        );
    }

    #[test]
    fn empty_entry_fails_fast() {
        let mut cfg = full_config();
        cfg.tag_registry = String::new();
        let err = ContractRegistry::from_config(&cfg).unwrap_err();
        assert!(matches!(err, ChainError::Config(msg) if msg.contains("tag_registry")));
    }

    #[test]
    fn malformed_entry_fails_fast() {
        let mut cfg = full_config();
        cfg.payroll = "0x1234".into();
        assert!(ContractRegistry::from_config(&cfg).is_err());
    }

    #[test]
    fn tracked_pairs_cover_every_contract() {
        let pairs: Vec<_> = tracked_pairs().collect();
        assert_eq!(pairs.len(), 18);
        for kind in ContractKind::ALL {
            assert!(pairs.iter().any(|(k, _)| *k == kind));
        }
    }
}
