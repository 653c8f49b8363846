//! Raw log → typed domain event.
//!
//! The decoder is a registry keyed by (contract, topic0). A log whose topic
//! does not match any event of its contract is "no match" (`Ok(None)`) —
//! blocks carry plenty of unrelated logs and those are skipped silently. A
//! matching topic with a payload that fails ABI decoding is a `DecodeError`,
//! which callers log and skip without aborting the batch.

use crate::error::DecodeError;
use crate::events::{self, EventKind};
use crate::log::RawLog;
use crate::registry::ContractKind;
use alloy_primitives::{utils::format_units, Address, B256, U256};
use alloy_sol_types::SolEvent;
use sable_types::EvmAddress;

/// Fixed-point convention for all monetary amounts on these contracts.
pub const AMOUNT_DECIMALS: u8 = 18;

/// A decoded, strongly-typed contract event.
#[derive(Clone, Debug)]
pub enum ChainEvent {
    Transfer(events::Transfer),
    Mint(events::Mint),
    Burn(events::Burn),
    EmployeeAdded(events::EmployeeAdded),
    EmployeeUpdated(events::EmployeeUpdated),
    EmployeeDeactivated(events::EmployeeDeactivated),
    PaymentProcessed(events::PaymentProcessed),
    TagRegistered(events::TagRegistered),
    TagUpdated(events::TagUpdated),
    TagTransferred(events::TagTransferred),
    AssetRegistered(events::AssetRegistered),
    AssetVerified(events::AssetVerified),
    AssetTransferred(events::AssetTransferred),
    NetworkAdded(events::NetworkAdded),
    NetworkUpdated(events::NetworkUpdated),
    NetworkDeactivated(events::NetworkDeactivated),
    AirtimeConverted(events::AirtimeConverted),
    LockWithdrawn(events::LockWithdrawn),
}

/// A decoded event together with its position on the chain.
#[derive(Clone, Debug)]
pub struct DecodedEvent {
    pub contract: ContractKind,
    pub kind: EventKind,
    pub tx_hash: B256,
    pub block_number: u64,
    pub log_index: u64,
    pub event: ChainEvent,
}

fn payload<E: SolEvent>(raw: &RawLog, name: &'static str) -> Result<E, DecodeError> {
    E::decode_raw_log(raw.topics.iter().copied(), &raw.data, true).map_err(|e| {
        DecodeError::Payload {
            event: name,
            reason: e.to_string(),
        }
    })
}

/// Decode one raw log against the known events of `contract`.
///
/// Returns `Ok(None)` when topic0 matches none of the contract's events.
pub fn decode_log(
    contract: ContractKind,
    raw: &RawLog,
) -> Result<Option<DecodedEvent>, DecodeError> {
    if raw.removed {
        return Ok(None);
    }
    let Some(topic0) = raw.topic0() else {
        return Ok(None);
    };
    let Some(kind) = contract
        .events()
        .iter()
        .copied()
        .find(|ev| ev.topic0() == topic0)
    else {
        return Ok(None);
    };

    let tx_hash = raw
        .transaction_hash
        .ok_or(DecodeError::MissingField("transactionHash"))?;
    let block_number = raw
        .block_number
        .ok_or(DecodeError::MissingField("blockNumber"))?;
    let log_index = raw.log_index.ok_or(DecodeError::MissingField("logIndex"))?;

    let event = match kind {
        EventKind::Transfer => ChainEvent::Transfer(payload(raw, "Transfer")?),
        EventKind::Mint => ChainEvent::Mint(payload(raw, "Mint")?),
        EventKind::Burn => ChainEvent::Burn(payload(raw, "Burn")?),
        EventKind::EmployeeAdded => ChainEvent::EmployeeAdded(payload(raw, "EmployeeAdded")?),
        EventKind::EmployeeUpdated => {
            ChainEvent::EmployeeUpdated(payload(raw, "EmployeeUpdated")?)
        }
        EventKind::EmployeeDeactivated => {
            ChainEvent::EmployeeDeactivated(payload(raw, "EmployeeDeactivated")?)
        }
        EventKind::PaymentProcessed => {
            ChainEvent::PaymentProcessed(payload(raw, "PaymentProcessed")?)
        }
        EventKind::TagRegistered => ChainEvent::TagRegistered(payload(raw, "TagRegistered")?),
        EventKind::TagUpdated => ChainEvent::TagUpdated(payload(raw, "TagUpdated")?),
        EventKind::TagTransferred => {
            ChainEvent::TagTransferred(payload(raw, "TagTransferred")?)
        }
        EventKind::AssetRegistered => {
            ChainEvent::AssetRegistered(payload(raw, "AssetRegistered")?)
        }
        EventKind::AssetVerified => ChainEvent::AssetVerified(payload(raw, "AssetVerified")?),
        EventKind::AssetTransferred => {
            ChainEvent::AssetTransferred(payload(raw, "AssetTransferred")?)
        }
        EventKind::NetworkAdded => ChainEvent::NetworkAdded(payload(raw, "NetworkAdded")?),
        EventKind::NetworkUpdated => {
            ChainEvent::NetworkUpdated(payload(raw, "NetworkUpdated")?)
        }
        EventKind::NetworkDeactivated => {
            ChainEvent::NetworkDeactivated(payload(raw, "NetworkDeactivated")?)
        }
        EventKind::AirtimeConverted => {
            ChainEvent::AirtimeConverted(payload(raw, "AirtimeConverted")?)
        }
        EventKind::LockWithdrawn => ChainEvent::LockWithdrawn(payload(raw, "LockWithdrawn")?),
    };

    Ok(Some(DecodedEvent {
        contract,
        kind,
        tx_hash,
        block_number,
        log_index,
        event,
    }))
}

/// Convert a raw `uint256` amount into an 18-decimal fixed-point decimal
/// string, with trailing zeros trimmed down to one fractional digit
/// (`1000000000000000000` → `"1.0"`). Never goes through floating point.
pub fn format_amount(value: U256) -> String {
    let formatted =
        format_units(value, AMOUNT_DECIMALS).unwrap_or_else(|_| value.to_string());
    match formatted.split_once('.') {
        Some((int, frac)) => {
            let frac = frac.trim_end_matches('0');
            if frac.is_empty() {
                format!("{int}.0")
            } else {
                format!("{int}.{frac}")
            }
        }
        None => formatted,
    }
}

/// Normalize an on-chain address into the mirror's lowercase form.
pub fn normalize(addr: Address) -> EvmAddress {
    EvmAddress::new(format!("{addr:#x}"))
}

/// Lowercase hex form of a 32-byte hash (tx hashes in the store).
pub fn format_hash(hash: B256) -> String {
    format!("{hash:#x}")
}

/// Saturating `U256` → `u64` for timestamps and counters that fit in
/// practice but are `uint256` on the wire.
pub fn u256_to_u64(value: U256) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EmployeeAdded, Transfer};
    use alloy_primitives::{Bytes, U256};
    use proptest::prelude::*;

    fn raw_from(contract_event: alloy_primitives::LogData, block: u64, index: u64) -> RawLog {
        RawLog {
            address: Address::ZERO,
            topics: contract_event.topics().to_vec(),
            data: contract_event.data.clone(),
            block_number: Some(block),
            transaction_hash: Some(B256::repeat_byte(0xab)),
            log_index: Some(index),
            removed: false,
        }
    }

    #[test]
    fn decodes_transfer() {
        let ev = Transfer {
            from: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            value: U256::from(10u64).pow(U256::from(18u64)),
        };
        let raw = raw_from(ev.encode_log_data(), 7, 0);
        let decoded = decode_log(ContractKind::StableCoin, &raw)
            .unwrap()
            .expect("must match");
        assert_eq!(decoded.kind, EventKind::Transfer);
        assert_eq!(decoded.block_number, 7);
        match decoded.event {
            ChainEvent::Transfer(t) => assert_eq!(t.value, ev.value),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn decodes_employee_added() {
        let ev = EmployeeAdded {
            employeeId: U256::from(1u64),
            wallet: Address::repeat_byte(0xaa),
            salary: U256::from(10u64).pow(U256::from(18u64)),
        };
        let raw = raw_from(ev.encode_log_data(), 10, 0);
        let decoded = decode_log(ContractKind::Payroll, &raw)
            .unwrap()
            .expect("must match");
        match decoded.event {
            ChainEvent::EmployeeAdded(e) => {
                assert_eq!(u256_to_u64(e.employeeId), 1);
                assert_eq!(format_amount(e.salary), "1.0");
            }
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn unknown_topic_is_no_match_not_error() {
        let ev = Transfer {
            from: Address::ZERO,
            to: Address::ZERO,
            value: U256::ZERO,
        };
        // A StableCoin event arriving on the Payroll contract's stream.
        let raw = raw_from(ev.encode_log_data(), 1, 0);
        assert!(decode_log(ContractKind::Payroll, &raw).unwrap().is_none());
    }

    #[test]
    fn reorged_log_is_skipped() {
        let ev = Transfer {
            from: Address::ZERO,
            to: Address::ZERO,
            value: U256::from(1u64),
        };
        let mut raw = raw_from(ev.encode_log_data(), 1, 0);
        raw.removed = true;
        assert!(decode_log(ContractKind::StableCoin, &raw).unwrap().is_none());
    }

    #[test]
    fn matching_topic_with_garbage_payload_is_decode_error() {
        let ev = Transfer {
            from: Address::ZERO,
            to: Address::ZERO,
            value: U256::from(5u64),
        };
        let mut raw = raw_from(ev.encode_log_data(), 1, 0);
        raw.data = Bytes::from(vec![0xde, 0xad]); // truncated body
        assert!(decode_log(ContractKind::StableCoin, &raw).is_err());
    }

    #[test]
    fn missing_block_number_is_decode_error() {
        let ev = Transfer {
            from: Address::ZERO,
            to: Address::ZERO,
            value: U256::ZERO,
        };
        let mut raw = raw_from(ev.encode_log_data(), 1, 0);
        raw.block_number = None;
        assert!(matches!(
            decode_log(ContractKind::StableCoin, &raw),
            Err(DecodeError::MissingField("blockNumber"))
        ));
    }

    #[test]
    fn amount_formatting_examples() {
        let one = U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(format_amount(one), "1.0");
        assert_eq!(format_amount(U256::ZERO), "0.0");
        assert_eq!(format_amount(U256::from(250_000_000_000_000_000u64)), "0.25");
        assert_eq!(format_amount(one * U256::from(1000u64)), "1000.0");
        assert_eq!(format_amount(U256::from(1u64)), "0.000000000000000001");
    }

    #[test]
    fn normalize_lowercases() {
        let addr = Address::repeat_byte(0xAB);
        assert_eq!(
            normalize(addr).as_str(),
            "0xabababababababababababababababababababab"
        );
    }

    proptest! {
        #[test]
        fn amount_never_ends_with_bare_dot_or_trailing_zero(raw in any::<u128>()) {
            let s = format_amount(U256::from(raw));
            prop_assert!(s.contains('.'));
            prop_assert!(!s.ends_with('.'));
            // a single "x.0" is the only permitted trailing zero
            if s.ends_with('0') {
                prop_assert!(s.ends_with(".0"));
            }
        }
    }
}
