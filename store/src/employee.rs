//! Employee storage trait.

use crate::StoreError;
use sable_types::{EmployeeRecord, Timestamp};

/// Trait for employee storage, keyed by on-chain employee id.
///
/// The field-targeted mutators exist so each event touches exactly the
/// fields its semantics cover — an EmployeeUpdated must never clobber the
/// wallet or active flag.
pub trait EmployeeStore {
    /// Insert or fully replace an employee record (EmployeeAdded, and the
    /// reconciler's authoritative overwrite).
    fn upsert_employee(&self, record: &EmployeeRecord) -> Result<(), StoreError>;

    fn get_employee(&self, id: u64) -> Result<Option<EmployeeRecord>, StoreError>;

    /// EmployeeUpdated: salary only.
    fn update_salary(&self, id: u64, salary: &str) -> Result<(), StoreError>;

    /// EmployeeDeactivated / reconciler: active flag only.
    fn set_employee_active(&self, id: u64, active: bool) -> Result<(), StoreError>;

    /// PaymentProcessed: last payout time only.
    fn set_last_payout(&self, id: u64, at: Timestamp) -> Result<(), StoreError>;

    /// All employee ids in ascending order (reconciler iteration).
    fn employee_ids(&self) -> Result<Vec<u64>, StoreError>;

    fn iter_employees(&self) -> Result<Vec<EmployeeRecord>, StoreError>;
}
