use thiserror::Error;

/// Errors raised by chain access.
///
/// `Config` is fatal at startup; `Transport` is transient and already
/// retried by the RPC client before it reaches a caller; `Rpc` carries a
/// protocol-level error the node returned (never retried).
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("rpc transport error: {0}")]
    Transport(String),

    #[error("rpc error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("block {0} not found")]
    BlockNotFound(u64),

    #[error("unexpected rpc response: {0}")]
    InvalidResponse(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A single log failed to decode. Callers skip the log with a warning;
/// decode failures are never fatal to a sync loop.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("log is missing field {0}")]
    MissingField(&'static str),

    #[error("event {event}: {reason}")]
    Payload { event: &'static str, reason: String },

    #[error(transparent)]
    Range(#[from] sable_types::asset::OutOfRange),
}
