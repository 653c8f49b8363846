//! LMDB environment setup and shared (de)serialization helpers.

use crate::LmdbError;
use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Named databases inside the environment; must cover every collection.
const MAX_DBS: u32 = 8;

/// Meta key holding the highest block number seen across transactions.
pub(crate) const MAX_BLOCK_KEY: &[u8] = b"max_block";

/// The LMDB-backed ledger store: one environment, one named database per
/// collection. `heed::Env` is internally reference-counted, so the store
/// is cheap to clone and safe to share across tasks.
#[derive(Clone)]
pub struct LmdbStore {
    pub(crate) env: Env,
    pub(crate) transactions: Database<Bytes, Bytes>,
    pub(crate) employees: Database<Bytes, Bytes>,
    pub(crate) tags: Database<Bytes, Bytes>,
    pub(crate) assets: Database<Bytes, Bytes>,
    pub(crate) networks: Database<Bytes, Bytes>,
    pub(crate) cursors: Database<Bytes, Bytes>,
    pub(crate) meta: Database<Bytes, Bytes>,
}

impl LmdbStore {
    /// Open or create the environment at `path`.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path)
            .map_err(|e| LmdbError::Serialization(format!("create data dir: {e}")))?;

        // Safety: the environment directory is owned by this process and
        // opened once per path.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(MAX_DBS)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let transactions = env.create_database(&mut wtxn, Some("transactions"))?;
        let employees = env.create_database(&mut wtxn, Some("employees"))?;
        let tags = env.create_database(&mut wtxn, Some("tags"))?;
        let assets = env.create_database(&mut wtxn, Some("assets"))?;
        let networks = env.create_database(&mut wtxn, Some("networks"))?;
        let cursors = env.create_database(&mut wtxn, Some("cursors"))?;
        let meta = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        tracing::info!(path = %path.display(), "opened ledger store");
        Ok(Self {
            env,
            transactions,
            employees,
            tags,
            assets,
            networks,
            cursors,
            meta,
        })
    }

    /// Read and decode one record.
    pub(crate) fn get_record<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
    ) -> Result<Option<T>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match db.get(&rtxn, key)? {
            Some(bytes) => Ok(Some(bincode::deserialize(bytes)?)),
            None => Ok(None),
        }
    }

    /// Encode and write one record in its own transaction.
    pub(crate) fn put_record<T: Serialize>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        value: &T,
    ) -> Result<(), LmdbError> {
        let bytes = bincode::serialize(value)?;
        let mut wtxn = self.env.write_txn()?;
        db.put(&mut wtxn, key, &bytes)?;
        wtxn.commit()?;
        Ok(())
    }

    /// Read-modify-write one record; fails with `NotFound` if absent.
    pub(crate) fn mutate_record<T, F>(
        &self,
        db: Database<Bytes, Bytes>,
        key: &[u8],
        describe: impl FnOnce() -> String,
        mutate: F,
    ) -> Result<(), LmdbError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce(&mut T),
    {
        let mut wtxn = self.env.write_txn()?;
        let bytes = db
            .get(&wtxn, key)?
            .ok_or_else(|| LmdbError::NotFound(describe()))?;
        let mut record: T = bincode::deserialize(bytes)?;
        mutate(&mut record);
        let encoded = bincode::serialize(&record)?;
        db.put(&mut wtxn, key, &encoded)?;
        wtxn.commit()?;
        Ok(())
    }

    /// Decode every record in key order.
    pub(crate) fn scan_records<T: DeserializeOwned>(
        &self,
        db: Database<Bytes, Bytes>,
    ) -> Result<Vec<T>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let mut out = Vec::new();
        for entry in db.iter(&rtxn)? {
            let (_, bytes) = entry?;
            out.push(bincode::deserialize(bytes)?);
        }
        Ok(out)
    }

    /// All keys in key order, decoded as big-endian u64.
    pub(crate) fn scan_u64_keys(
        &self,
        db: Database<Bytes, Bytes>,
    ) -> Result<Vec<u64>, LmdbError> {
        let rtxn = self.env.read_txn()?;
        let mut out = Vec::new();
        for entry in db.iter(&rtxn)? {
            let (key, _) = entry?;
            let arr: [u8; 8] = key
                .try_into()
                .map_err(|_| LmdbError::Serialization("u64 key of wrong length".into()))?;
            out.push(u64::from_be_bytes(arr));
        }
        Ok(out)
    }
}

/// Big-endian key for id-keyed collections, so LMDB iteration order is
/// numeric order.
pub(crate) fn id_key(id: u64) -> [u8; 8] {
    id.to_be_bytes()
}
