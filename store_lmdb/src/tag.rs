//! LMDB implementation of TagStore.

use crate::LmdbStore;
use sable_store::{StoreError, TagStore};
use sable_types::{EvmAddress, TagRecord};

impl TagStore for LmdbStore {
    fn upsert_tag(&self, record: &TagRecord) -> Result<(), StoreError> {
        Ok(self.put_record(self.tags, record.name.as_bytes(), record)?)
    }

    fn get_tag(&self, name: &str) -> Result<Option<TagRecord>, StoreError> {
        Ok(self.get_record(self.tags, name.as_bytes())?)
    }

    fn update_tag_resolved(&self, name: &str, resolved: &EvmAddress) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.tags,
            name.as_bytes(),
            || format!("tag {name}"),
            |rec: &mut TagRecord| rec.resolved = resolved.clone(),
        )?)
    }

    fn transfer_tag(&self, name: &str, owner: &EvmAddress) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.tags,
            name.as_bytes(),
            || format!("tag {name}"),
            |rec: &mut TagRecord| rec.owner = owner.clone(),
        )?)
    }

    fn iter_tags(&self) -> Result<Vec<TagRecord>, StoreError> {
        Ok(self.scan_records(self.tags)?)
    }
}
