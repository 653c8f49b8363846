use sable_chain::{ChainError, DecodeError};
use sable_store::StoreError;
use thiserror::Error;

/// Errors raised by the sync engines.
///
/// Engines distinguish per-event failures (logged and skipped) from
/// per-stream failures (the stream's cursor is not advanced) at the call
/// site; the variants themselves just say what layer failed.
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Range(#[from] sable_types::OutOfRange),
}

impl SyncError {
    /// Whether retrying the same event later could succeed.
    ///
    /// Chain and store trouble is transient (the node recovers, or an
    /// out-of-order update's entity arrives on its own stream); a payload
    /// that does not decode or carries an out-of-range value never will.
    pub fn is_transient(&self) -> bool {
        matches!(self, SyncError::Chain(_) | SyncError::Store(_))
    }
}
