//! Tag storage trait.

use crate::StoreError;
use sable_types::{EvmAddress, TagRecord};

/// Trait for payment-tag storage, keyed by tag name.
pub trait TagStore {
    /// Insert or fully replace (TagRegistered).
    fn upsert_tag(&self, record: &TagRecord) -> Result<(), StoreError>;

    fn get_tag(&self, name: &str) -> Result<Option<TagRecord>, StoreError>;

    /// TagUpdated: resolved address only.
    fn update_tag_resolved(&self, name: &str, resolved: &EvmAddress) -> Result<(), StoreError>;

    /// TagTransferred: owner only.
    fn transfer_tag(&self, name: &str, owner: &EvmAddress) -> Result<(), StoreError>;

    fn iter_tags(&self) -> Result<Vec<TagRecord>, StoreError>;
}
