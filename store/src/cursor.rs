//! Per-(contract, event) sync cursor storage.
//!
//! One watermark per event stream, not a single global cursor: with a
//! global watermark a crash between a dense stream's write and a sparse
//! stream's write silently skips part of the sparse stream's backfill
//! window. The keys are stable strings like `"payroll:EmployeeAdded"`.

use crate::StoreError;

/// Trait for sync cursor persistence.
pub trait CursorStore {
    /// Highest block fully processed for this stream, if any.
    fn get_cursor(&self, contract: &str, event: &str) -> Result<Option<u64>, StoreError>;

    /// Advance the stream's watermark. Engines only ever move it forward.
    fn set_cursor(&self, contract: &str, event: &str, block: u64) -> Result<(), StoreError>;
}

/// The stable key for one cursor entry.
pub fn cursor_key(contract: &str, event: &str) -> String {
    format!("{contract}:{event}")
}
