//! LMDB implementation of TransactionStore.

use crate::environment::MAX_BLOCK_KEY;
use crate::{LmdbError, LmdbStore};
use sable_store::merge::merge_transaction;
use sable_store::transaction::{TransactionFilter, TransactionStore, UpsertOutcome};
use sable_store::StoreError;
use sable_types::TransactionRecord;

impl TransactionStore for LmdbStore {
    fn upsert_transaction(
        &self,
        record: &TransactionRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let key = record.tx_hash.as_bytes();
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;

        let existing: Option<TransactionRecord> = self
            .transactions
            .get(&wtxn, key)
            .map_err(LmdbError::from)?
            .map(bincode::deserialize)
            .transpose()
            .map_err(LmdbError::from)?;

        let (outcome, to_write) = match existing {
            None => (UpsertOutcome::Inserted, Some(record.clone())),
            Some(ref current) => match merge_transaction(current, record) {
                Some(merged) => (UpsertOutcome::Updated, Some(merged)),
                None => (UpsertOutcome::Unchanged, None),
            },
        };

        if let Some(merged) = to_write {
            let bytes = bincode::serialize(&merged).map_err(LmdbError::from)?;
            self.transactions
                .put(&mut wtxn, key, &bytes)
                .map_err(LmdbError::from)?;

            // Keep the max-block watermark current in the same transaction.
            if let Some(block) = merged.block_number {
                let current = self
                    .meta
                    .get(&wtxn, MAX_BLOCK_KEY)
                    .map_err(LmdbError::from)?
                    .and_then(|b| b.try_into().ok().map(u64::from_be_bytes));
                if current.map_or(true, |c| block > c) {
                    self.meta
                        .put(&mut wtxn, MAX_BLOCK_KEY, &block.to_be_bytes())
                        .map_err(LmdbError::from)?;
                }
            }
        }

        wtxn.commit().map_err(LmdbError::from)?;
        Ok(outcome)
    }

    fn get_transaction(&self, tx_hash: &str) -> Result<Option<TransactionRecord>, StoreError> {
        Ok(self.get_record(self.transactions, tx_hash.as_bytes())?)
    }

    fn contains_transaction(&self, tx_hash: &str) -> Result<bool, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .transactions
            .get(&rtxn, tx_hash.as_bytes())
            .map_err(LmdbError::from)?
            .is_some())
    }

    fn max_block_number(&self) -> Result<Option<u64>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self
            .meta
            .get(&rtxn, MAX_BLOCK_KEY)
            .map_err(LmdbError::from)?
            .and_then(|b| b.try_into().ok().map(u64::from_be_bytes)))
    }

    fn transaction_count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        Ok(self.transactions.len(&rtxn).map_err(LmdbError::from)?)
    }

    fn list_transactions(
        &self,
        filter: &TransactionFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let all: Vec<TransactionRecord> = self.scan_records(self.transactions)?;
        Ok(all
            .into_iter()
            .filter(|t| {
                filter
                    .address
                    .as_deref()
                    .map_or(true, |a| t.from.as_str() == a || t.to.as_str() == a)
                    && filter.kind.map_or(true, |k| t.kind == k)
                    && filter.status.map_or(true, |s| t.status == s)
            })
            .skip(offset)
            .take(limit)
            .collect())
    }
}
