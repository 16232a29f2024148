//! Error types for SynapseDB.
//!
//! SynapseDB uses a hierarchical error system:
//! - `SynapseError` is the top-level error returned by all public APIs
//! - Specific error types (`ConnectionError`, `SchemaError`, `NotFoundError`,
//!   `EngineError`) provide detail
//!
//! # Error Handling Pattern
//! ```rust,ignore
//! use synapsedb::{SynapseDB, Config, Result};
//!
//! fn example() -> Result<()> {
//!     let db = SynapseDB::open("./synapse.db", Config::default());
//!     db.connect()?;
//!     // ... operations that may fail ...
//!     Ok(())
//! }
//! ```
//!
//! Every failure path resolves to a typed error; no operation swallows a
//! storage fault or reports success with unchanged state.

use thiserror::Error;

/// Result type alias for SynapseDB operations.
pub type Result<T> = std::result::Result<T, SynapseError>;

/// Top-level error enum for all SynapseDB operations.
///
/// This is the only error type returned by public APIs.
/// Use pattern matching to handle specific error cases.
#[derive(Debug, Error)]
pub enum SynapseError {
    /// Session could not be opened or is unusable.
    #[error("Connection error: {0}")]
    Connection(#[from] ConnectionError),

    /// Expected container or index is missing, or metadata is corrupted.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Insert collided with an existing key.
    #[error("Duplicate key in '{store}': {key}")]
    DuplicateKey {
        /// Container the insert targeted.
        store: String,
        /// The colliding key.
        key: String,
    },

    /// Operation target does not exist.
    #[error("{0}")]
    NotFound(#[from] NotFoundError),

    /// Opaque underlying storage fault, passed through unchanged.
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}

impl SynapseError {
    /// Creates a duplicate key error for the given store and key.
    pub fn duplicate_key(store: impl Into<String>, key: impl ToString) -> Self {
        Self::DuplicateKey {
            store: store.into(),
            key: key.to_string(),
        }
    }

    /// Returns true if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Returns true if this is a duplicate key error.
    pub fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey { .. })
    }

    /// Returns true if this is a connection error.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns true if this is a schema error.
    pub fn is_schema(&self) -> bool {
        matches!(self, Self::Schema(_))
    }

    /// Returns true if this is an engine error.
    pub fn is_engine(&self) -> bool {
        matches!(self, Self::Engine(_))
    }
}

/// Session establishment errors.
///
/// These errors indicate the database session could not be opened; the
/// session cache never retains a handle after one of these.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The engine failed to open or create the database file.
    #[error("Failed to open database: {0}")]
    OpenFailed(String),

    /// Database is locked by another process.
    #[error("Database is locked by another writer")]
    Locked,

    /// The store was written by a newer schema version than this build
    /// understands.
    #[error("Schema version mismatch: supported {supported}, found {found}")]
    VersionMismatch {
        /// Highest schema version this build supports.
        supported: u32,
        /// Version recorded in the store.
        found: u32,
    },
}

impl ConnectionError {
    /// Creates an open-failed error with the given message.
    pub fn open_failed(msg: impl Into<String>) -> Self {
        Self::OpenFailed(msg.into())
    }
}

/// Schema errors.
///
/// These indicate a corrupted or mismatched on-disk layout: a container or
/// index that provisioning should have created is absent, or the metadata
/// record cannot be read.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// Expected container is missing from the store.
    #[error("Container missing: {0}")]
    MissingStore(String),

    /// Store metadata is missing or unreadable.
    #[error("Store corrupted: {0}")]
    Corrupted(String),
}

impl SchemaError {
    /// Creates a missing-store error for the given container name.
    pub fn missing_store(name: impl Into<String>) -> Self {
        Self::MissingStore(name.into())
    }

    /// Creates a corruption error with the given message.
    pub fn corrupted(msg: impl Into<String>) -> Self {
        Self::Corrupted(msg.into())
    }
}

/// Not found errors for specific entity types.
#[derive(Debug, Error)]
pub enum NotFoundError {
    /// Note with given ID not found.
    #[error("Note not found: {0}")]
    Note(String),

    /// Link with given ID not found.
    #[error("Link not found: {0}")]
    Link(String),
}

impl NotFoundError {
    /// Creates a note not found error.
    pub fn note(id: impl ToString) -> Self {
        Self::Note(id.to_string())
    }

    /// Creates a link not found error.
    pub fn link(id: impl ToString) -> Self {
        Self::Link(id.to_string())
    }
}

/// Opaque storage-engine faults.
///
/// Passed through unchanged from the underlying engine; callers generally
/// cannot recover from these beyond retrying the whole operation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Error from the redb storage engine.
    #[error("Storage engine error: {0}")]
    Redb(String),

    /// Transaction failed (begin, commit, abort).
    #[error("Transaction failed: {0}")]
    Transaction(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EngineError {
    /// Creates a redb error with the given message.
    pub fn redb(msg: impl Into<String>) -> Self {
        Self::Redb(msg.into())
    }

    /// Creates a transaction error with the given message.
    pub fn transaction(msg: impl Into<String>) -> Self {
        Self::Transaction(msg.into())
    }

    /// Creates a serialization error with the given message.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}

// Conversions from redb error types. Each redb error family routes to one
// taxonomy variant: open failures are connection errors, a missing table is
// a schema error, everything else is an engine fault.

impl From<redb::DatabaseError> for ConnectionError {
    fn from(err: redb::DatabaseError) -> Self {
        // redb doesn't expose a typed variant for lock conflicts, so we
        // detect them via error message string matching. This may need
        // updating if redb changes its error messages in a future version.
        let msg = err.to_string();
        if msg.contains("locked") {
            ConnectionError::Locked
        } else {
            ConnectionError::OpenFailed(msg)
        }
    }
}

impl From<redb::TableError> for SynapseError {
    fn from(err: redb::TableError) -> Self {
        match err {
            redb::TableError::TableDoesNotExist(name) => {
                SynapseError::Schema(SchemaError::MissingStore(name))
            }
            other => SynapseError::Engine(EngineError::Redb(format!("Table error: {}", other))),
        }
    }
}

impl From<redb::TransactionError> for EngineError {
    fn from(err: redb::TransactionError) -> Self {
        EngineError::Transaction(err.to_string())
    }
}

impl From<redb::CommitError> for EngineError {
    fn from(err: redb::CommitError) -> Self {
        EngineError::Transaction(format!("Commit failed: {}", err))
    }
}

impl From<redb::StorageError> for EngineError {
    fn from(err: redb::StorageError) -> Self {
        EngineError::Redb(err.to_string())
    }
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        EngineError::Serialization(err.to_string())
    }
}

// Also allow direct conversion to SynapseError for convenience
impl From<redb::DatabaseError> for SynapseError {
    fn from(err: redb::DatabaseError) -> Self {
        SynapseError::Connection(ConnectionError::from(err))
    }
}

impl From<redb::TransactionError> for SynapseError {
    fn from(err: redb::TransactionError) -> Self {
        SynapseError::Engine(EngineError::from(err))
    }
}

impl From<redb::CommitError> for SynapseError {
    fn from(err: redb::CommitError) -> Self {
        SynapseError::Engine(EngineError::from(err))
    }
}

impl From<redb::StorageError> for SynapseError {
    fn from(err: redb::StorageError) -> Self {
        SynapseError::Engine(EngineError::from(err))
    }
}

impl From<bincode::Error> for SynapseError {
    fn from(err: bincode::Error) -> Self {
        SynapseError::Engine(EngineError::from(err))
    }
}
