//! Transaction ledger storage trait.

use crate::StoreError;
use sable_types::{TransactionRecord, TxKind, TxStatus};

/// What an upsert did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No record with this key existed; it was created.
    Inserted,
    /// An existing record was merged (e.g. pending → completed).
    Updated,
    /// The record already held everything the write carried; no-op.
    Unchanged,
}

/// Filter for paged transaction queries (the REST layer's read surface).
#[derive(Clone, Debug, Default)]
pub struct TransactionFilter {
    /// Match either sender or recipient (lowercase address).
    pub address: Option<String>,
    pub kind: Option<TxKind>,
    pub status: Option<TxStatus>,
}

/// Trait for transaction ledger operations, keyed by transaction hash.
pub trait TransactionStore {
    /// Idempotent insert-or-merge by hash. Duplicate delivery of the same
    /// event (historic/live overlap, replays) must return `Unchanged`, not
    /// an error; the only permitted mutation is pending → completed.
    fn upsert_transaction(&self, record: &TransactionRecord)
        -> Result<UpsertOutcome, StoreError>;

    fn get_transaction(&self, tx_hash: &str) -> Result<Option<TransactionRecord>, StoreError>;

    fn contains_transaction(&self, tx_hash: &str) -> Result<bool, StoreError>;

    /// Highest block number across stored transactions, if any. Fallback
    /// backfill watermark for stores that predate per-pair cursors.
    fn max_block_number(&self) -> Result<Option<u64>, StoreError>;

    fn transaction_count(&self) -> Result<u64, StoreError>;

    /// Filtered, paged scan in insertion-key order.
    fn list_transactions(
        &self,
        filter: &TransactionFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, StoreError>;
}
