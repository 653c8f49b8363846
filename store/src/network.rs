//! Airtime network storage trait.

use crate::StoreError;
use sable_types::NetworkRecord;

/// Trait for airtime-network storage, keyed by on-chain network id.
pub trait NetworkStore {
    /// Insert or fully replace (NetworkAdded).
    fn upsert_network(&self, record: &NetworkRecord) -> Result<(), StoreError>;

    fn get_network(&self, id: u64) -> Result<Option<NetworkRecord>, StoreError>;

    /// NetworkUpdated: conversion rate only.
    fn update_network_rate(&self, id: u64, rate: &str) -> Result<(), StoreError>;

    /// NetworkDeactivated / reconciler: active flag only.
    fn set_network_active(&self, id: u64, active: bool) -> Result<(), StoreError>;

    /// All network ids in ascending order.
    fn network_ids(&self) -> Result<Vec<u64>, StoreError>;

    fn iter_networks(&self) -> Result<Vec<NetworkRecord>, StoreError>;
}
