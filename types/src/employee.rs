//! Payroll employee record.

use crate::{EvmAddress, Timestamp};
use serde::{Deserialize, Serialize};

/// One payroll employee, keyed by the contract-assigned employee id.
///
/// Employees are never hard-deleted by the sync engines; deactivation is
/// logical (`active = false`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    /// On-chain employee id, assigned monotonically by the Payroll contract.
    pub id: u64,
    pub wallet: EvmAddress,
    /// Salary as a decimal string (18-decimal fixed point).
    pub salary: String,
    /// Block timestamp of the last processed payout. 0 = never paid.
    pub last_payout_time: Timestamp,
    pub active: bool,
}

impl EmployeeRecord {
    /// A freshly added employee: active, never paid.
    pub fn new(id: u64, wallet: EvmAddress, salary: impl Into<String>) -> Self {
        Self {
            id,
            wallet,
            salary: salary.into(),
            last_payout_time: 0,
            active: true,
        }
    }
}
