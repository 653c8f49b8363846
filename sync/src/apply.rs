//! Apply one decoded event to the store.
//!
//! Both sync engines funnel every event through [`apply_event`]. The order
//! of operations matters: the duplicate check comes first (a redelivered
//! event must not touch entity state again), then the entity mutation, and
//! the transaction record is committed last. A failed entity mutation
//! therefore leaves no record behind, so the event is not consumed and the
//! engines can retry it — streams are polled independently, and an update
//! can arrive before the event that creates its entity.

use crate::error::SyncError;
use sable_chain::decode::{format_amount, format_hash, normalize, u256_to_u64};
use sable_chain::{ChainEvent, ContractRegistry, DecodedEvent};
use sable_store::merge::merge_transaction;
use sable_store::LedgerStore;
use sable_types::{
    AssetCategory, AssetRecord, AssetStatus, EmployeeRecord, EvmAddress, NetworkRecord,
    TagRecord, TransactionRecord, TxKind,
};

/// What applying an event did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The event was new; ledger and entity state were updated.
    Applied,
    /// The event had already been applied (duplicate delivery). No-op.
    Duplicate,
}

/// Apply one decoded event: derive its transaction record, mutate the
/// affected entity, then commit the record. Already-applied events are
/// detected up front and skipped.
///
/// `block_timestamp` is the timestamp of the event's block; events that
/// carry their own timestamp (payouts, lock withdrawals) use that instead.
pub fn apply_event<S>(
    store: &S,
    registry: &ContractRegistry,
    ev: &DecodedEvent,
    block_timestamp: u64,
) -> Result<ApplyOutcome, SyncError>
where
    S: LedgerStore + ?Sized,
{
    let contract_addr = normalize(registry.address_of(ev.contract));
    let hash = format_hash(ev.tx_hash);
    let block = ev.block_number;

    let record = match &ev.event {
        ChainEvent::Transfer(e) => TransactionRecord::completed(
            &hash,
            normalize(e.from),
            normalize(e.to),
            format_amount(e.value),
            TxKind::Transfer,
            block,
            block_timestamp,
        ),
        ChainEvent::Mint(e) => TransactionRecord::completed(
            &hash,
            EvmAddress::zero(),
            normalize(e.to),
            format_amount(e.amount),
            TxKind::Mint,
            block,
            block_timestamp,
        ),
        ChainEvent::Burn(e) => TransactionRecord::completed(
            &hash,
            normalize(e.from),
            EvmAddress::zero(),
            format_amount(e.amount),
            TxKind::Burn,
            block,
            block_timestamp,
        ),
        ChainEvent::EmployeeAdded(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            normalize(e.wallet),
            format_amount(e.salary),
            TxKind::EmployeeAdded,
            block,
            block_timestamp,
        )
        .with_meta("employeeId", u256_to_u64(e.employeeId).to_string()),
        ChainEvent::EmployeeUpdated(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            contract_addr.clone(),
            format_amount(e.newSalary),
            TxKind::EmployeeUpdate,
            block,
            block_timestamp,
        )
        .with_meta("employeeId", u256_to_u64(e.employeeId).to_string()),
        ChainEvent::EmployeeDeactivated(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            contract_addr.clone(),
            "0.0",
            TxKind::EmployeeDeactivation,
            block,
            block_timestamp,
        )
        .with_meta("employeeId", u256_to_u64(e.employeeId).to_string()),
        ChainEvent::PaymentProcessed(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            normalize(e.wallet),
            format_amount(e.amount),
            TxKind::Payroll,
            block,
            u256_to_u64(e.timestamp),
        )
        .with_meta("employeeId", u256_to_u64(e.employeeId).to_string()),
        ChainEvent::TagRegistered(e) => TransactionRecord::completed(
            &hash,
            normalize(e.owner),
            contract_addr.clone(),
            "0.0",
            TxKind::TagRegistration,
            block,
            block_timestamp,
        )
        .with_meta("tag", e.name.clone()),
        ChainEvent::TagUpdated(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            normalize(e.newResolved),
            "0.0",
            TxKind::TagUpdate,
            block,
            block_timestamp,
        )
        .with_meta("tag", e.name.clone()),
        ChainEvent::TagTransferred(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            normalize(e.newOwner),
            "0.0",
            TxKind::TagTransfer,
            block,
            block_timestamp,
        )
        .with_meta("tag", e.name.clone()),
        ChainEvent::AssetRegistered(e) => TransactionRecord::completed(
            &hash,
            normalize(e.owner),
            contract_addr.clone(),
            format_amount(e.value),
            TxKind::AssetRegistration,
            block,
            block_timestamp,
        )
        .with_meta("assetId", u256_to_u64(e.assetId).to_string())
        .with_meta("assetName", e.name.clone()),
        ChainEvent::AssetVerified(e) => TransactionRecord::completed(
            &hash,
            normalize(e.verifier),
            contract_addr.clone(),
            "0.0",
            TxKind::AssetVerification,
            block,
            block_timestamp,
        )
        .with_meta("assetId", u256_to_u64(e.assetId).to_string()),
        ChainEvent::AssetTransferred(e) => TransactionRecord::completed(
            &hash,
            normalize(e.from),
            normalize(e.to),
            "0.0",
            TxKind::AssetTransfer,
            block,
            block_timestamp,
        )
        .with_meta("assetId", u256_to_u64(e.assetId).to_string()),
        ChainEvent::NetworkAdded(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            contract_addr.clone(),
            "0.0",
            TxKind::NetworkAdded,
            block,
            block_timestamp,
        )
        .with_meta("networkId", u256_to_u64(e.networkId).to_string())
        .with_meta("networkName", e.name.clone()),
        ChainEvent::NetworkUpdated(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            contract_addr.clone(),
            "0.0",
            TxKind::NetworkUpdate,
            block,
            block_timestamp,
        )
        .with_meta("networkId", u256_to_u64(e.networkId).to_string()),
        ChainEvent::NetworkDeactivated(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            contract_addr.clone(),
            "0.0",
            TxKind::NetworkDeactivation,
            block,
            block_timestamp,
        )
        .with_meta("networkId", u256_to_u64(e.networkId).to_string()),
        ChainEvent::AirtimeConverted(e) => TransactionRecord::completed(
            &hash,
            normalize(e.user),
            contract_addr.clone(),
            format_amount(e.tokenAmount),
            TxKind::AirtimeConversion,
            block,
            block_timestamp,
        )
        .with_meta("networkId", u256_to_u64(e.networkId).to_string())
        .with_meta("airtimeAmount", format_amount(e.airtimeAmount)),
        ChainEvent::LockWithdrawn(e) => TransactionRecord::completed(
            &hash,
            contract_addr.clone(),
            normalize(e.account),
            format_amount(e.amount),
            TxKind::LockWithdrawal,
            block,
            u256_to_u64(e.timestamp),
        ),
    };

    if let Some(existing) = store.get_transaction(&record.tx_hash)? {
        if merge_transaction(&existing, &record).is_none() {
            return Ok(ApplyOutcome::Duplicate);
        }
    }

    // Entity first; the record only lands once the mutation took.
    apply_entity(store, ev, block_timestamp)?;
    store.upsert_transaction(&record)?;
    Ok(ApplyOutcome::Applied)
}

fn apply_entity<S>(store: &S, ev: &DecodedEvent, block_timestamp: u64) -> Result<(), SyncError>
where
    S: LedgerStore + ?Sized,
{
    match &ev.event {
        ChainEvent::EmployeeAdded(e) => {
            store.upsert_employee(&EmployeeRecord::new(
                u256_to_u64(e.employeeId),
                normalize(e.wallet),
                format_amount(e.salary),
            ))?;
        }
        ChainEvent::EmployeeUpdated(e) => {
            store.update_salary(u256_to_u64(e.employeeId), &format_amount(e.newSalary))?;
        }
        ChainEvent::EmployeeDeactivated(e) => {
            store.set_employee_active(u256_to_u64(e.employeeId), false)?;
        }
        ChainEvent::PaymentProcessed(e) => {
            store.set_last_payout(u256_to_u64(e.employeeId), u256_to_u64(e.timestamp))?;
        }
        ChainEvent::TagRegistered(e) => {
            store.upsert_tag(&TagRecord {
                name: e.name.clone(),
                owner: normalize(e.owner),
                resolved: normalize(e.resolved),
            })?;
        }
        ChainEvent::TagUpdated(e) => {
            store.update_tag_resolved(&e.name, &normalize(e.newResolved))?;
        }
        ChainEvent::TagTransferred(e) => {
            store.transfer_tag(&e.name, &normalize(e.newOwner))?;
        }
        ChainEvent::AssetRegistered(e) => {
            store.upsert_asset(&AssetRecord {
                id: u256_to_u64(e.assetId),
                name: e.name.clone(),
                description: String::new(),
                location: String::new(),
                metadata: String::new(),
                category: AssetCategory::try_from(e.category)?,
                status: AssetStatus::Registered,
                value: format_amount(e.value),
                owner: normalize(e.owner),
                verified: false,
                registered_at: block_timestamp,
                updated_at: block_timestamp,
            })?;
        }
        ChainEvent::AssetVerified(e) => {
            store.mark_asset_verified(u256_to_u64(e.assetId), block_timestamp)?;
        }
        ChainEvent::AssetTransferred(e) => {
            store.transfer_asset(u256_to_u64(e.assetId), &normalize(e.to), block_timestamp)?;
        }
        ChainEvent::NetworkAdded(e) => {
            store.upsert_network(&NetworkRecord {
                id: u256_to_u64(e.networkId),
                name: e.name.clone(),
                conversion_rate: format_amount(e.rate),
                active: true,
            })?;
        }
        ChainEvent::NetworkUpdated(e) => {
            store.update_network_rate(u256_to_u64(e.networkId), &format_amount(e.newRate))?;
        }
        ChainEvent::NetworkDeactivated(e) => {
            store.set_network_active(u256_to_u64(e.networkId), false)?;
        }
        // Pure ledger events; no entity collection to touch.
        ChainEvent::Transfer(_)
        | ChainEvent::Mint(_)
        | ChainEvent::Burn(_)
        | ChainEvent::AirtimeConverted(_)
        | ChainEvent::LockWithdrawn(_) => {}
    }
    Ok(())
}
