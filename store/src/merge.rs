//! Pure merge rules for transaction upserts.
//!
//! Kept separate from any backend so the idempotence and lifecycle rules
//! are testable without storage: pending → completed is the only allowed
//! transition, completed records never change, and metadata merges without
//! dropping keys the existing record already has.

use sable_types::{TransactionRecord, TxStatus};

/// Merge an incoming write into an existing record.
///
/// Returns `Some(merged)` when the store should be updated, `None` when the
/// incoming write carries nothing new (duplicate delivery).
pub fn merge_transaction(
    existing: &TransactionRecord,
    incoming: &TransactionRecord,
) -> Option<TransactionRecord> {
    // Completed and failed records are final.
    if existing.status != TxStatus::Pending {
        return None;
    }
    if incoming.status != TxStatus::Completed && incoming.status != TxStatus::Failed {
        return None;
    }

    let mut merged = existing.clone();
    merged.status = incoming.status;
    merged.block_number = incoming.block_number.or(existing.block_number);
    merged.timestamp = incoming.timestamp;
    for (k, v) in &incoming.metadata {
        merged.metadata.entry(k.clone()).or_insert_with(|| v.clone());
    }
    Some(merged)
}
