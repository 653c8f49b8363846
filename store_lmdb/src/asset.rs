//! LMDB implementation of AssetStore.

use crate::environment::id_key;
use crate::LmdbStore;
use sable_store::{AssetStore, StoreError};
use sable_types::{AssetRecord, AssetStatus, EvmAddress, Timestamp};

impl AssetStore for LmdbStore {
    fn upsert_asset(&self, record: &AssetRecord) -> Result<(), StoreError> {
        Ok(self.put_record(self.assets, &id_key(record.id), record)?)
    }

    fn get_asset(&self, id: u64) -> Result<Option<AssetRecord>, StoreError> {
        Ok(self.get_record(self.assets, &id_key(id))?)
    }

    fn mark_asset_verified(&self, id: u64, at: Timestamp) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.assets,
            &id_key(id),
            || format!("asset {id}"),
            |rec: &mut AssetRecord| {
                rec.verified = true;
                rec.status = AssetStatus::Verified;
                rec.updated_at = at;
            },
        )?)
    }

    fn transfer_asset(
        &self,
        id: u64,
        owner: &EvmAddress,
        at: Timestamp,
    ) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.assets,
            &id_key(id),
            || format!("asset {id}"),
            |rec: &mut AssetRecord| {
                rec.owner = owner.clone();
                rec.updated_at = at;
            },
        )?)
    }

    fn reconcile_asset(
        &self,
        id: u64,
        owner: &EvmAddress,
        value: &str,
        verified: bool,
        status: AssetStatus,
    ) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.assets,
            &id_key(id),
            || format!("asset {id}"),
            |rec: &mut AssetRecord| {
                rec.owner = owner.clone();
                rec.value = value.to_string();
                rec.verified = verified;
                rec.status = status;
            },
        )?)
    }

    fn asset_ids(&self) -> Result<Vec<u64>, StoreError> {
        Ok(self.scan_u64_keys(self.assets)?)
    }

    fn iter_assets(&self) -> Result<Vec<AssetRecord>, StoreError> {
        Ok(self.scan_records(self.assets)?)
    }
}
