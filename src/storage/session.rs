//! Session establishment and caching.
//!
//! A [`Session`] wraps the open redb database handle together with its
//! validated metadata. Opening a session creates the store file if allowed,
//! provisions containers on first run or version upgrade, and stamps the
//! metadata's `last_opened_at`.
//!
//! [`SessionCache`] owns a single lazily-initialized `Arc<Session>`. All
//! operations funnel through it so the process opens the store exactly once:
//! concurrent acquirers before the first open completes share the same
//! in-flight open instead of racing to create duplicate handles, and a
//! failed open is never cached — the next call retries from scratch.
//!
//! There is no teardown path: the cached session lives for the lifetime of
//! the cache, and redb flushes durably on drop.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use redb::{Database, ReadTransaction, WriteTransaction};
use tracing::{debug, info, instrument, warn};

use super::schema::{self, StoreMetadata, METADATA_KEY, METADATA_TABLE, SCHEMA_VERSION};
use crate::config::{Config, SyncMode};
use crate::error::{ConnectionError, EngineError, Result, SchemaError, SynapseError};

/// An open connection to the store at a fixed schema version.
///
/// Obtained through [`SessionCache::session`]; operations borrow it to open
/// per-operation transactions.
///
/// # Thread Safety
///
/// `Session` is `Send + Sync`. redb handles internal synchronization using
/// MVCC for readers and exclusive locking for writers.
#[derive(Debug)]
pub struct Session {
    /// The redb database handle.
    db: Database,

    /// Metadata validated at open time.
    metadata: StoreMetadata,

    /// Path to the store file.
    path: PathBuf,

    /// Durability mode applied to every write transaction.
    sync_mode: SyncMode,
}

impl Session {
    /// Opens or creates the store at the given path.
    ///
    /// A fresh store is provisioned with every container and index and a
    /// metadata record at [`SCHEMA_VERSION`]. An existing store at an older
    /// version is re-provisioned idempotently and its version bumped; an
    /// up-to-date store only gets its `last_opened_at` refreshed.
    ///
    /// # Errors
    ///
    /// - [`ConnectionError::OpenFailed`] if the file cannot be opened or
    ///   created (or is absent with `create_if_missing` off)
    /// - [`ConnectionError::Locked`] if another process holds the store
    /// - [`ConnectionError::VersionMismatch`] if the store records a newer
    ///   schema version than this build supports
    /// - [`SchemaError::Corrupted`] if the metadata record is unreadable
    #[instrument(skip(config), fields(path = %path.as_ref().display()))]
    pub(crate) fn open(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let store_exists = path.exists();

        debug!(store_exists, "Opening session");

        if !store_exists && !config.create_if_missing {
            return Err(ConnectionError::open_failed(format!(
                "No store at {} and create_if_missing is off",
                path.display()
            ))
            .into());
        }

        let db = Database::builder()
            .create(path)
            .map_err(ConnectionError::from)?;

        if store_exists {
            Self::open_existing(db, path.to_path_buf(), config)
        } else {
            Self::initialize_new(db, path.to_path_buf(), config)
        }
    }

    /// Provisions a fresh store and writes its metadata, in one transaction.
    #[instrument(skip(db, config), fields(path = %path.display()))]
    fn initialize_new(db: Database, path: PathBuf, config: &Config) -> Result<Self> {
        info!("Initializing new store");

        let metadata = StoreMetadata::new();

        let write_txn = db.begin_write().map_err(EngineError::from)?;
        {
            schema::provision(&write_txn)?;

            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata).map_err(EngineError::from)?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;
        }
        write_txn.commit().map_err(EngineError::from)?;

        info!(schema_version = SCHEMA_VERSION, "Store initialized");

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode: config.sync_mode,
        })
    }

    /// Opens and validates an existing store, upgrading the schema if the
    /// recorded version is older than this build's.
    #[instrument(skip(db, config), fields(path = %path.display()))]
    fn open_existing(db: Database, path: PathBuf, config: &Config) -> Result<Self> {
        info!("Opening existing store");

        let read_txn = db.begin_read().map_err(EngineError::from)?;

        let metadata = {
            let meta_table = read_txn
                .open_table(METADATA_TABLE)
                .map_err(|e| SchemaError::corrupted(format!("Cannot open metadata table: {}", e)))?;

            let metadata_bytes = meta_table
                .get(METADATA_KEY)
                .map_err(EngineError::from)?
                .ok_or_else(|| SchemaError::corrupted("Missing store metadata"))?;

            bincode::deserialize::<StoreMetadata>(metadata_bytes.value())
                .map_err(|e| SchemaError::corrupted(format!("Invalid metadata format: {}", e)))?
        };

        drop(read_txn);

        // A newer on-disk version means a newer build wrote this store.
        if metadata.schema_version > SCHEMA_VERSION {
            warn!(
                supported = SCHEMA_VERSION,
                found = metadata.schema_version,
                "Store written by a newer schema version"
            );
            return Err(SynapseError::Connection(ConnectionError::VersionMismatch {
                supported: SCHEMA_VERSION,
                found: metadata.schema_version,
            }));
        }

        let needs_upgrade = metadata.schema_version < SCHEMA_VERSION;

        let mut metadata = metadata;
        metadata.touch();
        if needs_upgrade {
            info!(
                from = metadata.schema_version,
                to = SCHEMA_VERSION,
                "Upgrading store schema"
            );
            metadata.schema_version = SCHEMA_VERSION;
        }

        let write_txn = db.begin_write().map_err(EngineError::from)?;
        {
            // Provisioning is the upgrade: create-if-missing for every
            // container, existing data untouched. Skipped on ordinary opens.
            if needs_upgrade {
                schema::provision(&write_txn)?;
            }

            let mut meta_table = write_txn.open_table(METADATA_TABLE)?;
            let metadata_bytes = bincode::serialize(&metadata).map_err(EngineError::from)?;
            meta_table.insert(METADATA_KEY, metadata_bytes.as_slice())?;
        }
        write_txn.commit().map_err(EngineError::from)?;

        info!(
            schema_version = metadata.schema_version,
            "Store opened successfully"
        );

        Ok(Self {
            db,
            metadata,
            path,
            sync_mode: config.sync_mode,
        })
    }

    /// Returns the metadata validated at open time.
    #[inline]
    pub fn metadata(&self) -> &StoreMetadata {
        &self.metadata
    }

    /// Returns the path to the store file.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the durability mode applied to write transactions.
    #[inline]
    pub fn sync_mode(&self) -> SyncMode {
        self.sync_mode
    }

    /// Begins a read-only transaction.
    pub(crate) fn begin_read(&self) -> Result<ReadTransaction> {
        Ok(self.db.begin_read().map_err(EngineError::from)?)
    }

    /// Begins a read-write transaction with the session's durability mode.
    pub(crate) fn begin_write(&self) -> Result<WriteTransaction> {
        let mut txn = self.db.begin_write().map_err(EngineError::from)?;
        txn.set_durability(match self.sync_mode {
            SyncMode::Normal => redb::Durability::Immediate,
            SyncMode::Fast => redb::Durability::Eventual,
        });
        Ok(txn)
    }
}

/// Lazily-initialized, shared handle to the open session.
///
/// The cache records the store location up front and opens nothing until
/// the first [`session()`](SessionCache::session) call. The `OnceCell`
/// serializes concurrent first opens: later callers block on the in-flight
/// open and receive the same `Arc<Session>`, so exactly one engine open and
/// one provisioning pass ever run. An open failure propagates to every
/// waiter and leaves the cell empty for retry.
#[derive(Debug)]
pub struct SessionCache {
    path: PathBuf,
    config: Config,
    cell: OnceCell<Arc<Session>>,
}

impl SessionCache {
    /// Creates a cache for the store at `path`. Opens nothing.
    pub fn new(path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            path: path.into(),
            config,
            cell: OnceCell::new(),
        }
    }

    /// Returns the open session, opening it on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`Session::open`] failures. A failed open is not cached;
    /// the next call retries.
    pub fn session(&self) -> Result<Arc<Session>> {
        self.cell
            .get_or_try_init(|| Session::open(&self.path, &self.config).map(Arc::new))
            .cloned()
    }

    /// Returns true if the session has been opened and cached.
    pub fn is_open(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Returns the configured store path.
    #[inline]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the configuration the session is (or will be) opened with.
    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }
}
