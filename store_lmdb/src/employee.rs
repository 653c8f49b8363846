//! LMDB implementation of EmployeeStore.

use crate::environment::id_key;
use crate::LmdbStore;
use sable_store::{EmployeeStore, StoreError};
use sable_types::{EmployeeRecord, Timestamp};

impl EmployeeStore for LmdbStore {
    fn upsert_employee(&self, record: &EmployeeRecord) -> Result<(), StoreError> {
        Ok(self.put_record(self.employees, &id_key(record.id), record)?)
    }

    fn get_employee(&self, id: u64) -> Result<Option<EmployeeRecord>, StoreError> {
        Ok(self.get_record(self.employees, &id_key(id))?)
    }

    fn update_salary(&self, id: u64, salary: &str) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.employees,
            &id_key(id),
            || format!("employee {id}"),
            |rec: &mut EmployeeRecord| rec.salary = salary.to_string(),
        )?)
    }

    fn set_employee_active(&self, id: u64, active: bool) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.employees,
            &id_key(id),
            || format!("employee {id}"),
            |rec: &mut EmployeeRecord| rec.active = active,
        )?)
    }

    fn set_last_payout(&self, id: u64, at: Timestamp) -> Result<(), StoreError> {
        Ok(self.mutate_record(
            self.employees,
            &id_key(id),
            || format!("employee {id}"),
            |rec: &mut EmployeeRecord| rec.last_payout_time = at,
        )?)
    }

    fn employee_ids(&self) -> Result<Vec<u64>, StoreError> {
        Ok(self.scan_u64_keys(self.employees)?)
    }

    fn iter_employees(&self) -> Result<Vec<EmployeeRecord>, StoreError> {
        Ok(self.scan_records(self.employees)?)
    }
}
