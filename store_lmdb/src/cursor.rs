//! LMDB implementation of CursorStore.

use crate::{LmdbError, LmdbStore};
use sable_store::cursor::cursor_key;
use sable_store::{CursorStore, StoreError};

impl CursorStore for LmdbStore {
    fn get_cursor(&self, contract: &str, event: &str) -> Result<Option<u64>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let key = cursor_key(contract, event);
        Ok(self
            .cursors
            .get(&rtxn, key.as_bytes())
            .map_err(LmdbError::from)?
            .and_then(|b| b.try_into().ok().map(u64::from_be_bytes)))
    }

    fn set_cursor(&self, contract: &str, event: &str, block: u64) -> Result<(), StoreError> {
        let key = cursor_key(contract, event);
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        self.cursors
            .put(&mut wtxn, key.as_bytes(), &block.to_be_bytes())
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;
        Ok(())
    }
}
