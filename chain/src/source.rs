//! The seam between the sync engines and the chain.
//!
//! Engines depend on this trait rather than on [`crate::ChainClient`]
//! directly, so tests can drive historic/live sync against a scripted
//! chain without a node.

use crate::error::ChainError;
use crate::events::EventKind;
use crate::log::RawLog;
use crate::reads::{AssetSnapshot, EmployeeSnapshot, NetworkSnapshot};
use crate::registry::ContractKind;

/// Read access to the chain, as the sync engines need it.
///
/// `logs` must return entries sorted ascending by (block number, log index).
#[async_trait::async_trait]
pub trait ChainSource: Send + Sync {
    /// Current chain head (block number).
    async fn head_block(&self) -> Result<u64, ChainError>;

    /// Timestamp of the given block; `BlockNotFound` if the node has pruned
    /// or never had it.
    async fn block_timestamp(&self, number: u64) -> Result<u64, ChainError>;

    /// All logs for one contract+event pair in `[from_block, to_block]`,
    /// both bounds inclusive.
    async fn logs(
        &self,
        contract: ContractKind,
        event: EventKind,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawLog>, ChainError>;

    /// Authoritative employee state (reconciler).
    async fn employee_snapshot(&self, id: u64) -> Result<EmployeeSnapshot, ChainError>;

    /// Authoritative asset state (reconciler).
    async fn asset_snapshot(&self, id: u64) -> Result<AssetSnapshot, ChainError>;

    /// Authoritative network state (reconciler).
    async fn network_snapshot(&self, id: u64) -> Result<NetworkSnapshot, ChainError>;
}

#[async_trait::async_trait]
impl<T: ChainSource + ?Sized> ChainSource for std::sync::Arc<T> {
    async fn head_block(&self) -> Result<u64, ChainError> {
        (**self).head_block().await
    }

    async fn block_timestamp(&self, number: u64) -> Result<u64, ChainError> {
        (**self).block_timestamp(number).await
    }

    async fn logs(
        &self,
        contract: ContractKind,
        event: EventKind,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<RawLog>, ChainError> {
        (**self).logs(contract, event, from_block, to_block).await
    }

    async fn employee_snapshot(&self, id: u64) -> Result<EmployeeSnapshot, ChainError> {
        (**self).employee_snapshot(id).await
    }

    async fn asset_snapshot(&self, id: u64) -> Result<AssetSnapshot, ChainError> {
        (**self).asset_snapshot(id).await
    }

    async fn network_snapshot(&self, id: u64) -> Result<NetworkSnapshot, ChainError> {
        (**self).network_snapshot(id).await
    }
}
