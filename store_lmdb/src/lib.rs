//! LMDB storage backend for the Sable mirror.
//!
//! Implements all storage traits from `sable-store` using the `heed` LMDB
//! bindings. One named database per collection inside a single environment;
//! values are bincode-encoded records, u64 keys are stored big-endian so
//! iteration order matches numeric order.

pub mod asset;
pub mod cursor;
pub mod employee;
pub mod environment;
pub mod error;
pub mod network;
pub mod tag;
pub mod transaction;

pub use environment::LmdbStore;
pub use error::LmdbError;
