//! Event signatures for the tracked contracts.
//!
//! These declarations are the wire contract with the chain: event names and
//! field shapes must match the deployed ABIs exactly or decoding silently
//! no-ops on the mismatched topic hash.

use crate::registry::ContractKind;
use alloy_primitives::B256;
use alloy_sol_types::{sol, SolEvent};
use std::fmt;

sol! {
    // StableCoin
    #[derive(Debug)]
    event Transfer(address indexed from, address indexed to, uint256 value);
    #[derive(Debug)]
    event Mint(address indexed to, uint256 amount);
    #[derive(Debug)]
    event Burn(address indexed from, uint256 amount);

    // Payroll
    #[derive(Debug)]
    event EmployeeAdded(uint256 indexed employeeId, address indexed wallet, uint256 salary);
    #[derive(Debug)]
    event EmployeeUpdated(uint256 indexed employeeId, uint256 newSalary);
    #[derive(Debug)]
    event EmployeeDeactivated(uint256 indexed employeeId);
    #[derive(Debug)]
    event PaymentProcessed(uint256 indexed employeeId, address indexed wallet, uint256 amount, uint256 timestamp);

    // TagRegistry
    #[derive(Debug)]
    event TagRegistered(string name, address indexed owner, address resolved);
    #[derive(Debug)]
    event TagUpdated(string name, address newResolved);
    #[derive(Debug)]
    event TagTransferred(string name, address indexed newOwner);

    // AssetRegistry
    #[derive(Debug)]
    event AssetRegistered(uint256 indexed assetId, address indexed owner, string name, uint256 value, uint8 category);
    #[derive(Debug)]
    event AssetVerified(uint256 indexed assetId, address indexed verifier);
    #[derive(Debug)]
    event AssetTransferred(uint256 indexed assetId, address indexed from, address indexed to);

    // AirtimeConverter
    #[derive(Debug)]
    event NetworkAdded(uint256 indexed networkId, string name, uint256 rate);
    #[derive(Debug)]
    event NetworkUpdated(uint256 indexed networkId, uint256 newRate);
    #[derive(Debug)]
    event NetworkDeactivated(uint256 indexed networkId);
    #[derive(Debug)]
    event AirtimeConverted(address indexed user, uint256 indexed networkId, uint256 tokenAmount, uint256 airtimeAmount);

    // SavingsLock
    #[derive(Debug)]
    event LockWithdrawn(address indexed account, uint256 amount, uint256 timestamp);
}

/// Every event kind the sync engines track, across all contracts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Transfer,
    Mint,
    Burn,
    EmployeeAdded,
    EmployeeUpdated,
    EmployeeDeactivated,
    PaymentProcessed,
    TagRegistered,
    TagUpdated,
    TagTransferred,
    AssetRegistered,
    AssetVerified,
    AssetTransferred,
    NetworkAdded,
    NetworkUpdated,
    NetworkDeactivated,
    AirtimeConverted,
    LockWithdrawn,
}

impl EventKind {
    /// The solidity event name.
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Transfer => "Transfer",
            EventKind::Mint => "Mint",
            EventKind::Burn => "Burn",
            EventKind::EmployeeAdded => "EmployeeAdded",
            EventKind::EmployeeUpdated => "EmployeeUpdated",
            EventKind::EmployeeDeactivated => "EmployeeDeactivated",
            EventKind::PaymentProcessed => "PaymentProcessed",
            EventKind::TagRegistered => "TagRegistered",
            EventKind::TagUpdated => "TagUpdated",
            EventKind::TagTransferred => "TagTransferred",
            EventKind::AssetRegistered => "AssetRegistered",
            EventKind::AssetVerified => "AssetVerified",
            EventKind::AssetTransferred => "AssetTransferred",
            EventKind::NetworkAdded => "NetworkAdded",
            EventKind::NetworkUpdated => "NetworkUpdated",
            EventKind::NetworkDeactivated => "NetworkDeactivated",
            EventKind::AirtimeConverted => "AirtimeConverted",
            EventKind::LockWithdrawn => "LockWithdrawn",
        }
    }

    /// keccak256 of the event signature; topic0 on the wire.
    pub fn topic0(&self) -> B256 {
        match self {
            EventKind::Transfer => Transfer::SIGNATURE_HASH,
            EventKind::Mint => Mint::SIGNATURE_HASH,
            EventKind::Burn => Burn::SIGNATURE_HASH,
            EventKind::EmployeeAdded => EmployeeAdded::SIGNATURE_HASH,
            EventKind::EmployeeUpdated => EmployeeUpdated::SIGNATURE_HASH,
            EventKind::EmployeeDeactivated => EmployeeDeactivated::SIGNATURE_HASH,
            EventKind::PaymentProcessed => PaymentProcessed::SIGNATURE_HASH,
            EventKind::TagRegistered => TagRegistered::SIGNATURE_HASH,
            EventKind::TagUpdated => TagUpdated::SIGNATURE_HASH,
            EventKind::TagTransferred => TagTransferred::SIGNATURE_HASH,
            EventKind::AssetRegistered => AssetRegistered::SIGNATURE_HASH,
            EventKind::AssetVerified => AssetVerified::SIGNATURE_HASH,
            EventKind::AssetTransferred => AssetTransferred::SIGNATURE_HASH,
            EventKind::NetworkAdded => NetworkAdded::SIGNATURE_HASH,
            EventKind::NetworkUpdated => NetworkUpdated::SIGNATURE_HASH,
            EventKind::NetworkDeactivated => NetworkDeactivated::SIGNATURE_HASH,
            EventKind::AirtimeConverted => AirtimeConverted::SIGNATURE_HASH,
            EventKind::LockWithdrawn => LockWithdrawn::SIGNATURE_HASH,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl ContractKind {
    /// The events each contract emits, in declaration order.
    pub fn events(&self) -> &'static [EventKind] {
        match self {
            ContractKind::StableCoin => {
                &[EventKind::Transfer, EventKind::Mint, EventKind::Burn]
            }
            ContractKind::Payroll => &[
                EventKind::EmployeeAdded,
                EventKind::EmployeeUpdated,
                EventKind::EmployeeDeactivated,
                EventKind::PaymentProcessed,
            ],
            ContractKind::TagRegistry => &[
                EventKind::TagRegistered,
                EventKind::TagUpdated,
                EventKind::TagTransferred,
            ],
            ContractKind::AssetRegistry => &[
                EventKind::AssetRegistered,
                EventKind::AssetVerified,
                EventKind::AssetTransferred,
            ],
            ContractKind::AirtimeConverter => &[
                EventKind::NetworkAdded,
                EventKind::NetworkUpdated,
                EventKind::NetworkDeactivated,
                EventKind::AirtimeConverted,
            ],
            ContractKind::SavingsLock => &[EventKind::LockWithdrawn],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_topic_matches_canonical_erc20_hash() {
        // keccak256("Transfer(address,address,uint256)")
        let expected: B256 =
            "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
                .parse()
                .unwrap();
        assert_eq!(EventKind::Transfer.topic0(), expected);
    }

    #[test]
    fn topic_hashes_are_distinct() {
        let mut seen = std::collections::HashSet::new();
        for (_, event) in crate::registry::tracked_pairs() {
            assert!(seen.insert(event.topic0()), "duplicate topic for {event}");
        }
    }
}
