//! Chain access for the Sable mirror.
//!
//! Everything that talks to the blockchain node lives here: the JSON-RPC
//! client with retry/backoff, the contract registry that resolves the six
//! tracked contracts, the event decoder that turns raw logs into typed
//! domain events, and the direct read calls the state reconciler uses.
//!
//! The sync engines depend only on the [`ChainSource`] trait so tests can
//! drive them with a scripted chain.

pub mod client;
pub mod decode;
pub mod error;
pub mod events;
pub mod log;
pub mod reads;
pub mod registry;
pub mod rpc;
pub mod source;

pub use client::{ChainClient, ChainConfig};
pub use decode::{decode_log, format_amount, ChainEvent, DecodedEvent};
pub use error::{ChainError, DecodeError};
pub use events::EventKind;
pub use log::RawLog;
pub use reads::{AssetSnapshot, EmployeeSnapshot, NetworkSnapshot};
pub use registry::{tracked_pairs, ContractKind, ContractRegistry, ContractsConfig};
pub use rpc::{RetryPolicy, RpcClient};
pub use source::ChainSource;
