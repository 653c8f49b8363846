//! LMDB implementation of NetworkStore.

use crate::environment::id_key;
use crate::LmdbStore;
use sable_store::{NetworkStore, StoreError};
use sable_types::NetworkRecord;

impl NetworkStore for LmdbStore {
    fn upsert_network(&self, record: &NetworkRecord) -> Result<(), StoreError> {
        Ok(self.put_record(self.networks, &id_key(record.id), record)?)
    }

    fn get_network(&self, id: u64) -> Result<Option<NetworkRecord>, StoreError> {
        Ok(self.get_record(self.networks, &id_key(id))?)
    }

    fn update_network_rate(&self, id: u64, rate: &str) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.networks,
            &id_key(id),
            || format!("network {id}"),
            |rec: &mut NetworkRecord| rec.conversion_rate = rate.to_string(),
        )?)
    }

    fn set_network_active(&self, id: u64, active: bool) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.networks,
            &id_key(id),
            || format!("network {id}"),
            |rec: &mut NetworkRecord| rec.active = active,
        )?)
    }

    fn network_ids(&self) -> Result<Vec<u64>, StoreError> {
        Ok(self.scan_u64_keys(self.networks)?)
    }

    fn iter_networks(&self) -> Result<Vec<NetworkRecord>, StoreError> {
        Ok(self.scan_records(self.networks)?)
    }
}
