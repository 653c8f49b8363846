//! Core domain types for the Sable off-chain mirror.
//!
//! This crate defines the entity records the sync engines write and the REST
//! layer reads: transactions, employees, tags, assets and airtime networks,
//! plus the shared address and timestamp types. It performs no I/O.

pub mod address;
pub mod asset;
pub mod employee;
pub mod network;
pub mod tag;
pub mod transaction;

pub use address::EvmAddress;
pub use asset::{AssetCategory, AssetRecord, AssetStatus, OutOfRange};
pub use employee::EmployeeRecord;
pub use network::NetworkRecord;
pub use tag::TagRecord;
pub use transaction::{TransactionRecord, TxKind, TxStatus};

/// UNIX timestamp in seconds, taken from block time for on-chain facts.
pub type Timestamp = u64;
