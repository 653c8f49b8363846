//! Thread-safe in-memory backend, used by tests and as the reference
//! implementation of the store semantics.

use crate::cursor::cursor_key;
use crate::merge::merge_transaction;
use crate::transaction::{TransactionFilter, UpsertOutcome};
use crate::{
    AssetStore, CursorStore, EmployeeStore, NetworkStore, StoreError, TagStore, TransactionStore,
};
use sable_types::{
    AssetRecord, AssetStatus, EmployeeRecord, EvmAddress, NetworkRecord, TagRecord, Timestamp,
    TransactionRecord,
};
use std::collections::BTreeMap;
use std::sync::RwLock;

#[derive(Default)]
struct Inner {
    transactions: BTreeMap<String, TransactionRecord>,
    employees: BTreeMap<u64, EmployeeRecord>,
    tags: BTreeMap<String, TagRecord>,
    assets: BTreeMap<u64, AssetRecord>,
    networks: BTreeMap<u64, NetworkRecord>,
    cursors: BTreeMap<String, u64>,
}

/// In-memory ledger store. Cheap to construct per test; safe to share
/// across tasks behind an `Arc`.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>, StoreError> {
        self.inner
            .read()
            .map_err(|_| StoreError::Backend("poisoned lock".into()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>, StoreError> {
        self.inner
            .write()
            .map_err(|_| StoreError::Backend("poisoned lock".into()))
    }
}

impl TransactionStore for MemoryStore {
    fn upsert_transaction(
        &self,
        record: &TransactionRecord,
    ) -> Result<UpsertOutcome, StoreError> {
        let mut inner = self.write()?;
        match inner.transactions.get(&record.tx_hash) {
            None => {
                inner
                    .transactions
                    .insert(record.tx_hash.clone(), record.clone());
                Ok(UpsertOutcome::Inserted)
            }
            Some(existing) => match merge_transaction(existing, record) {
                Some(merged) => {
                    inner.transactions.insert(record.tx_hash.clone(), merged);
                    Ok(UpsertOutcome::Updated)
                }
                None => Ok(UpsertOutcome::Unchanged),
            },
        }
    }

    fn get_transaction(&self, tx_hash: &str) -> Result<Option<TransactionRecord>, StoreError> {
        Ok(self.read()?.transactions.get(tx_hash).cloned())
    }

    fn contains_transaction(&self, tx_hash: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.transactions.contains_key(tx_hash))
    }

    fn max_block_number(&self) -> Result<Option<u64>, StoreError> {
        Ok(self
            .read()?
            .transactions
            .values()
            .filter_map(|t| t.block_number)
            .max())
    }

    fn transaction_count(&self) -> Result<u64, StoreError> {
        Ok(self.read()?.transactions.len() as u64)
    }

    fn list_transactions(
        &self,
        filter: &TransactionFilter,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<TransactionRecord>, StoreError> {
        let inner = self.read()?;
        Ok(inner
            .transactions
            .values()
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
            .cloned()
            .collect())
    }
}

impl EmployeeStore for MemoryStore {
    fn upsert_employee(&self, record: &EmployeeRecord) -> Result<(), StoreError> {
        self.write()?.employees.insert(record.id, record.clone());
        Ok(())
    }

    fn get_employee(&self, id: u64) -> Result<Option<EmployeeRecord>, StoreError> {
        Ok(self.read()?.employees.get(&id).cloned())
    }

    fn update_salary(&self, id: u64, salary: &str) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .employees
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("employee {id}")))?;
        rec.salary = salary.to_string();
        Ok(())
    }

    fn set_employee_active(&self, id: u64, active: bool) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .employees
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("employee {id}")))?;
        rec.active = active;
        Ok(())
    }

    fn set_last_payout(&self, id: u64, at: Timestamp) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .employees
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("employee {id}")))?;
        rec.last_payout_time = at;
        Ok(())
    }

    fn employee_ids(&self) -> Result<Vec<u64>, StoreError> {
        Ok(self.read()?.employees.keys().copied().collect())
    }

    fn iter_employees(&self) -> Result<Vec<EmployeeRecord>, StoreError> {
        Ok(self.read()?.employees.values().cloned().collect())
    }
}

impl TagStore for MemoryStore {
    fn upsert_tag(&self, record: &TagRecord) -> Result<(), StoreError> {
        self.write()?.tags.insert(record.name.clone(), record.clone());
        Ok(())
    }

    fn get_tag(&self, name: &str) -> Result<Option<TagRecord>, StoreError> {
        Ok(self.read()?.tags.get(name).cloned())
    }

    fn update_tag_resolved(&self, name: &str, resolved: &EvmAddress) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .tags
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(format!("tag {name}")))?;
        rec.resolved = resolved.clone();
        Ok(())
    }

    fn transfer_tag(&self, name: &str, owner: &EvmAddress) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .tags
            .get_mut(name)
            .ok_or_else(|| StoreError::NotFound(format!("tag {name}")))?;
        rec.owner = owner.clone();
        Ok(())
    }

    fn iter_tags(&self) -> Result<Vec<TagRecord>, StoreError> {
        Ok(self.read()?.tags.values().cloned().collect())
    }
}

impl AssetStore for MemoryStore {
    fn upsert_asset(&self, record: &AssetRecord) -> Result<(), StoreError> {
        self.write()?.assets.insert(record.id, record.clone());
        Ok(())
    }

    fn get_asset(&self, id: u64) -> Result<Option<AssetRecord>, StoreError> {
        Ok(self.read()?.assets.get(&id).cloned())
    }

    fn mark_asset_verified(&self, id: u64, at: Timestamp) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .assets
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("asset {id}")))?;
        rec.verified = true;
        rec.status = AssetStatus::Verified;
        rec.updated_at = at;
        Ok(())
    }

    fn transfer_asset(
        &self,
        id: u64,
        owner: &EvmAddress,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .assets
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("asset {id}")))?;
        rec.owner = owner.clone();
        rec.updated_at = at;
        Ok(())
    }

    fn reconcile_asset(
        &self,
        id: u64,
        owner: &EvmAddress,
        value: &str,
        verified: bool,
        status: AssetStatus,
    ) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .assets
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("asset {id}")))?;
        rec.owner = owner.clone();
        rec.value = value.to_string();
        rec.verified = verified;
        rec.status = status;
        Ok(())
    }

    fn asset_ids(&self) -> Result<Vec<u64>, StoreError> {
        Ok(self.read()?.assets.keys().copied().collect())
    }

    fn iter_assets(&self) -> Result<Vec<AssetRecord>, StoreError> {
        Ok(self.read()?.assets.values().cloned().collect())
    }
}

impl NetworkStore for MemoryStore {
    fn upsert_network(&self, record: &NetworkRecord) -> Result<(), StoreError> {
        self.write()?.networks.insert(record.id, record.clone());
        Ok(())
    }

    fn get_network(&self, id: u64) -> Result<Option<NetworkRecord>, StoreError> {
        Ok(self.read()?.networks.get(&id).cloned())
    }

    fn update_network_rate(&self, id: u64, rate: &str) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .networks
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("network {id}")))?;
        rec.conversion_rate = rate.to_string();
        Ok(())
    }

    fn set_network_active(&self, id: u64, active: bool) -> Result<(), StoreError> {
        let mut inner = self.write()?;
        let rec = inner
            .networks
            .get_mut(&id)
            .ok_or_else(|| StoreError::NotFound(format!("network {id}")))?;
        rec.active = active;
        Ok(())
    }

    fn network_ids(&self) -> Result<Vec<u64>, StoreError> {
        Ok(self.read()?.networks.keys().copied().collect())
    }

    fn iter_networks(&self) -> Result<Vec<NetworkRecord>, StoreError> {
        Ok(self.read()?.networks.values().cloned().collect())
    }
}

impl CursorStore for MemoryStore {
    fn get_cursor(&self, contract: &str, event: &str) -> Result<Option<u64>, StoreError> {
        Ok(self
            .read()?
            .cursors
            .get(&cursor_key(contract, event))
            .copied())
    }

    fn set_cursor(&self, contract: &str, event: &str, block: u64) -> Result<(), StoreError> {
        self.write()?.cursors.insert(cursor_key(contract, event), block);
        Ok(())
    }
}
