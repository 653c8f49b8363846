//! Synchronization engines for the Sable mirror.
//!
//! Three cooperating pieces keep the local ledger in step with the chain:
//!
//! * [`HistoricSync`] backfills every tracked (contract, event) stream from
//!   its persisted cursor up to the chain head, once, at startup.
//! * [`LiveSync`] then polls each stream forward from the head, one task per
//!   stream, until stopped.
//! * [`Reconciler`] reads authoritative contract state directly and
//!   overwrites the drift-prone fields the event streams alone cannot
//!   recover.
//!
//! All three write through the same idempotent [`apply::apply_event`] path,
//! so overlapping windows between historic and live never double-apply.

pub mod apply;
pub mod error;
pub mod historic;
pub mod live;
pub mod reconcile;

pub use apply::{apply_event, ApplyOutcome};
pub use error::SyncError;
pub use historic::{HistoricSummary, HistoricSync};
pub use live::{LiveSync, LiveSyncConfig, LiveSyncHandle};
pub use reconcile::{ReconcileSummary, Reconciler};
