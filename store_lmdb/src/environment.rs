//! LMDB environment setup.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env, EnvOpenOptions};

use crate::LmdbError;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";
const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Wraps the LMDB environment and all database handles.
#[derive(Clone)]
pub struct LmdbEnvironment {
    pub(crate) env: Arc<Env>,
    pub(crate) proposals_db: Database<Bytes, Bytes>,
    pub(crate) votes_db: Database<Bytes, Bytes>,
    pub(crate) timelock_db: Database<Bytes, Bytes>,
    pub(crate) timelock_meta_db: Database<Bytes, Bytes>,
    pub(crate) meta_db: Database<Bytes, Bytes>,
}

impl LmdbEnvironment {
    /// Open or create an LMDB environment at the given path.
    pub fn open(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        std::fs::create_dir_all(path).map_err(|e| LmdbError::Heed(e.to_string()))?;
        // Safety: an LMDB environment must not be opened twice in the same
        // process; callers own that invariant.
        let env = unsafe {
            EnvOpenOptions::new()
                .map_size(map_size)
                .max_dbs(8)
                .open(path)?
        };

        let mut wtxn = env.write_txn()?;
        let proposals_db = env.create_database(&mut wtxn, Some("proposals"))?;
        let votes_db = env.create_database(&mut wtxn, Some("votes"))?;
        let timelock_db = env.create_database(&mut wtxn, Some("timelock"))?;
        let timelock_meta_db = env.create_database(&mut wtxn, Some("timelock_meta"))?;
        let meta_db = env.create_database(&mut wtxn, Some("meta"))?;
        wtxn.commit()?;

        let environment = Self {
            env: Arc::new(env),
            proposals_db,
            votes_db,
            timelock_db,
            timelock_meta_db,
            meta_db,
        };
        environment.init_schema_version()?;
        Ok(environment)
    }

    /// Stamp a fresh database with the current schema version; reject a
    /// database written by a newer schema.
    fn init_schema_version(&self) -> Result<(), LmdbError> {
        let current = self.schema_version()?;
        if current == 0 {
            let mut wtxn = self.env.write_txn()?;
            self.meta_db.put(
                &mut wtxn,
                SCHEMA_VERSION_KEY,
                &CURRENT_SCHEMA_VERSION.to_le_bytes(),
            )?;
            wtxn.commit()?;
            tracing::info!(version = CURRENT_SCHEMA_VERSION, "initialized database schema");
        } else if current > CURRENT_SCHEMA_VERSION {
            return Err(LmdbError::Heed(format!(
                "database schema version {} is newer than supported {}",
                current, CURRENT_SCHEMA_VERSION
            )));
        } else {
            tracing::info!(version = current, "database schema is up to date");
        }
        Ok(())
    }

    /// The stored schema version (0 when the database is fresh).
    pub fn schema_version(&self) -> Result<u32, LmdbError> {
        let rtxn = self.env.read_txn()?;
        match self.meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
            Some(bytes) if bytes.len() == 4 => {
                let arr: [u8; 4] = bytes.try_into().expect("checked length");
                Ok(u32::from_le_bytes(arr))
            }
            Some(_) => Err(LmdbError::Serialization(
                "schema_version has unexpected byte length".to_string(),
            )),
            None => Ok(0),
        }
    }
}
