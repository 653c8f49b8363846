//! Abstract storage traits for the Sable mirror.
//!
//! Every storage backend (LMDB, in-memory for testing) implements these
//! traits; the sync engines and the REST layer depend only on them. The
//! sync engines are the sole writer of every collection here — the API
//! layer reads, never writes.
//!
//! Idempotent upsert by natural key is the core mechanism: re-applying the
//! same logical write is a no-op, which is what makes overlapping
//! historic/live windows and concurrent polling loops safe without locks.

pub mod asset;
pub mod cursor;
pub mod employee;
pub mod error;
pub mod memory;
pub mod merge;
pub mod network;
pub mod tag;
pub mod transaction;

pub use asset::AssetStore;
pub use cursor::CursorStore;
pub use employee::EmployeeStore;
pub use error::StoreError;
pub use memory::MemoryStore;
pub use network::NetworkStore;
pub use tag::TagStore;
pub use transaction::{TransactionFilter, TransactionStore, UpsertOutcome};

/// Umbrella trait for a complete ledger store backend.
pub trait LedgerStore:
    TransactionStore + EmployeeStore + TagStore + AssetStore + NetworkStore + CursorStore
{
}

impl<T> LedgerStore for T where
    T: TransactionStore + EmployeeStore + TagStore + AssetStore + NetworkStore + CursorStore
{
}
