//! Asset storage trait.

use crate::StoreError;
use sable_types::{AssetRecord, AssetStatus, EvmAddress, Timestamp};

/// Trait for asset storage, keyed by on-chain asset id.
pub trait AssetStore {
    /// Insert or fully replace (AssetRegistered).
    fn upsert_asset(&self, record: &AssetRecord) -> Result<(), StoreError>;

    fn get_asset(&self, id: u64) -> Result<Option<AssetRecord>, StoreError>;

    /// AssetVerified: verified flag, status and updated_at only.
    fn mark_asset_verified(&self, id: u64, at: Timestamp) -> Result<(), StoreError>;

    /// AssetTransferred: owner and updated_at only.
    fn transfer_asset(&self, id: u64, owner: &EvmAddress, at: Timestamp)
        -> Result<(), StoreError>;

    /// Reconciler overwrite of the drift-prone snapshot fields.
    fn reconcile_asset(
        &self,
        id: u64,
        owner: &EvmAddress,
        value: &str,
        verified: bool,
        status: AssetStatus,
    ) -> Result<(), StoreError>;

    /// All asset ids in ascending order.
    fn asset_ids(&self) -> Result<Vec<u64>, StoreError>;

    fn iter_assets(&self) -> Result<Vec<AssetRecord>, StoreError>;
}
