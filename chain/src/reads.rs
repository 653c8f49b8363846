//! Direct contract reads used by the state reconciler.
//!
//! These are the authoritative "current state" getters. The reconciler
//! overwrites drift-prone snapshot fields with these values after backfill,
//! correcting for anything the event stream alone could not recover.

use crate::decode::{format_amount, normalize, u256_to_u64};
use crate::error::ChainError;
use alloy_sol_types::{sol, SolCall};
use sable_types::EvmAddress;

sol! {
    function getEmployee(uint256 employeeId) external view returns (address wallet, uint256 salary, uint256 lastPayout, bool active);
    function getAsset(uint256 assetId) external view returns (address owner, uint256 value, bool verified, uint8 status);
    function getNetwork(uint256 networkId) external view returns (string name, uint256 rate, bool active);
}

/// Authoritative employee state as read from the Payroll contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EmployeeSnapshot {
    pub wallet: EvmAddress,
    pub salary: String,
    pub last_payout_time: u64,
    pub active: bool,
}

/// Authoritative asset state as read from the AssetRegistry contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetSnapshot {
    pub owner: EvmAddress,
    pub value: String,
    pub verified: bool,
    pub status: u8,
}

/// Authoritative network state as read from the AirtimeConverter contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NetworkSnapshot {
    pub name: String,
    pub rate: String,
    pub active: bool,
}

pub(crate) fn encode_get_employee(id: u64) -> Vec<u8> {
    getEmployeeCall {
        employeeId: alloy_primitives::U256::from(id),
    }
    .abi_encode()
}

pub(crate) fn decode_get_employee(data: &[u8]) -> Result<EmployeeSnapshot, ChainError> {
    let ret = getEmployeeCall::abi_decode_returns(data, true)
        .map_err(|e| ChainError::InvalidResponse(format!("getEmployee returns: {e}")))?;
    Ok(EmployeeSnapshot {
        wallet: normalize(ret.wallet),
        salary: format_amount(ret.salary),
        last_payout_time: u256_to_u64(ret.lastPayout),
        active: ret.active,
    })
}

pub(crate) fn encode_get_asset(id: u64) -> Vec<u8> {
    getAssetCall {
        assetId: alloy_primitives::U256::from(id),
    }
    .abi_encode()
}

pub(crate) fn decode_get_asset(data: &[u8]) -> Result<AssetSnapshot, ChainError> {
    let ret = getAssetCall::abi_decode_returns(data, true)
        .map_err(|e| ChainError::InvalidResponse(format!("getAsset returns: {e}")))?;
    Ok(AssetSnapshot {
        owner: normalize(ret.owner),
        value: format_amount(ret.value),
        verified: ret.verified,
        status: ret.status,
    })
}

pub(crate) fn encode_get_network(id: u64) -> Vec<u8> {
    getNetworkCall {
        networkId: alloy_primitives::U256::from(id),
    }
    .abi_encode()
}

pub(crate) fn decode_get_network(data: &[u8]) -> Result<NetworkSnapshot, ChainError> {
    let ret = getNetworkCall::abi_decode_returns(data, true)
        .map_err(|e| ChainError::InvalidResponse(format!("getNetwork returns: {e}")))?;
    Ok(NetworkSnapshot {
        name: ret.name,
        rate: format_amount(ret.rate),
        active: ret.active,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, U256};
    use alloy_sol_types::SolValue;

    #[test]
    fn employee_snapshot_round_trip() {
        let wallet = Address::repeat_byte(0xAA);
        // Return data is parameter-list encoded, not a single wrapped tuple.
        let encoded = (
            wallet,
            U256::from(10u64).pow(U256::from(18u64)),
            U256::from(1700000000u64),
            true,
        )
            .abi_encode_params();
        let snap = decode_get_employee(&encoded).unwrap();
        assert_eq!(snap.salary, "1.0");
        assert_eq!(snap.last_payout_time, 1700000000);
        assert!(snap.active);
        assert_eq!(snap.wallet.as_str(), "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa");
    }

    #[test]
    fn network_snapshot_round_trip() {
        let encoded = (
            "MTN".to_string(),
            U256::from(500_000_000_000_000_000u64),
            false,
        )
            .abi_encode_params();
        let snap = decode_get_network(&encoded).unwrap();
        assert_eq!(snap.name, "MTN");
        assert_eq!(snap.rate, "0.5");
        assert!(!snap.active);
    }

    #[test]
    fn calldata_starts_with_selector() {
        let data = encode_get_employee(1);
        assert_eq!(&data[..4], getEmployeeCall::SELECTOR.as_slice());
        assert_eq!(data.len(), 4 + 32);
    }
}
