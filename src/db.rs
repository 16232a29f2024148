//! SynapseDB main struct and lifecycle operations.
//!
//! The [`SynapseDB`] struct is the primary interface for interacting with
//! the note store. It provides methods for:
//!
//! - Bootstrapping the session (lazily or via [`connect`](SynapseDB::connect))
//! - Creating, reading, updating, and deleting notes
//! - Inspecting store metadata
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use synapsedb::{SynapseDB, Config, NoteUpdate};
//!
//! // Record the store location; nothing is opened yet
//! let db = SynapseDB::open("./synapse.db", Config::default());
//!
//! // Bootstrap: open the session and provision the schema
//! db.connect()?;
//!
//! // CRUD
//! let note = db.create_note(None, "Reading list", "redb docs")?;
//! let fetched = db.get_note(note.id)?;
//! db.update_note(note.id, NoteUpdate::title("Reading list 2025"))?;
//! db.delete_note(note.id)?;
//! ```
//!
//! # Thread Safety
//!
//! `SynapseDB` is `Send + Sync` and can be shared across threads using
//! `Arc`. The underlying storage uses MVCC for concurrent reads with
//! exclusive write locking; the session itself is opened exactly once no
//! matter how many threads race to the first operation.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, instrument};

use crate::config::Config;
use crate::error::Result;
use crate::note::{self, Note, NoteUpdate};
use crate::storage::schema::StoreMetadata;
use crate::storage::session::{Session, SessionCache};
use crate::types::NoteId;

/// The main SynapseDB handle.
///
/// Construction records the store location without touching the disk; the
/// session is opened on the first operation (or eagerly by
/// [`connect`](SynapseDB::connect)) and cached for the lifetime of this
/// handle. There is no explicit close — dropping the handle flushes
/// durably.
#[derive(Debug)]
pub struct SynapseDB {
    /// Single shared session, opened lazily.
    sessions: SessionCache,
}

impl SynapseDB {
    /// Creates a handle for the store at `path`. Opens nothing.
    ///
    /// The store file is created on first use unless
    /// [`Config::create_if_missing`] is off.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// use synapsedb::{SynapseDB, Config};
    ///
    /// let db = SynapseDB::open("./synapse.db", Config::default());
    /// ```
    pub fn open(path: impl AsRef<Path>, config: Config) -> Self {
        Self {
            sessions: SessionCache::new(path.as_ref(), config),
        }
    }

    /// Bootstraps the session eagerly: opens the store, provisions the
    /// schema if needed, and caches the handle.
    ///
    /// Safe to call from several threads at once — every caller shares the
    /// single in-flight open and receives the same session.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the engine cannot open the store
    /// (locked, I/O failure, newer schema version) and a schema error if
    /// the metadata record is corrupted. A failure is not cached; the next
    /// call retries.
    #[instrument(skip(self), fields(path = %self.sessions.path().display()))]
    pub fn connect(&self) -> Result<Arc<Session>> {
        let session = self.sessions.session()?;
        info!("Session ready");
        Ok(session)
    }

    /// Returns a copy of the store metadata (schema version, lifecycle
    /// timestamps), opening the session if needed.
    pub fn metadata(&self) -> Result<StoreMetadata> {
        Ok(self.sessions.session()?.metadata().clone())
    }

    /// Returns the configuration this handle was created with.
    #[inline]
    pub fn config(&self) -> &Config {
        self.sessions.config()
    }

    /// Returns the store path.
    #[inline]
    pub fn path(&self) -> &Path {
        self.sessions.path()
    }

    // =========================================================================
    // Note CRUD
    // =========================================================================

    /// Creates a note, generating a random ID when `id` is `None`.
    ///
    /// The new record starts with `created_at == updated_at == now` and
    /// empty tags and links, and is inserted with "add" semantics.
    ///
    /// # Errors
    ///
    /// Fails with a duplicate-key error if `id` collides with an existing
    /// record (the existing record is untouched), or with connection,
    /// schema, or engine errors from the storage layer.
    pub fn create_note(
        &self,
        id: Option<NoteId>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note> {
        let session = self.sessions.session()?;
        note::create(&session, id, title, content)
    }

    /// Retrieves a note by ID. An absent ID resolves to `Ok(None)`.
    pub fn get_note(&self, id: NoteId) -> Result<Option<Note>> {
        let session = self.sessions.session()?;
        note::get(&session, id)
    }

    /// Returns every stored note in ascending ID order.
    ///
    /// Order is the underlying key order, not creation order; sort on
    /// `created_at` for the latter.
    pub fn get_all_notes(&self) -> Result<Vec<Note>> {
        let session = self.sessions.session()?;
        note::get_all(&session)
    }

    /// Merges `changes` over the stored note and bumps `updated_at`
    /// strictly forward. Returns the updated record.
    ///
    /// # Errors
    ///
    /// Fails with a not-found error when no record with `id` exists — an
    /// explicit rejection, never a silent no-op.
    pub fn update_note(&self, id: NoteId, changes: NoteUpdate) -> Result<Note> {
        let session = self.sessions.session()?;
        note::update(&session, id, changes)
    }

    /// Deletes a note if present. Idempotent: deleting an absent ID
    /// succeeds without error.
    pub fn delete_note(&self, id: NoteId) -> Result<()> {
        let session = self.sessions.session()?;
        note::delete(&session, id)
    }
}

impl note::NoteStore for SynapseDB {
    fn create_note(&self, id: Option<NoteId>, title: String, content: String) -> Result<Note> {
        SynapseDB::create_note(self, id, title, content)
    }

    fn update_note(&self, id: NoteId, changes: NoteUpdate) -> Result<Note> {
        SynapseDB::update_note(self, id, changes)
    }

    fn delete_note(&self, id: NoteId) -> Result<()> {
        SynapseDB::delete_note(self, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_open_is_lazy() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");

        let db = SynapseDB::open(&path, Config::default());
        assert!(!path.exists(), "open() must not touch the disk");

        db.connect().unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_connect_twice_is_cheap() {
        let dir = tempdir().unwrap();
        let db = SynapseDB::open(dir.path().join("test.db"), Config::default());

        let a = db.connect().unwrap();
        let b = db.connect().unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_first_operation_bootstraps() {
        let dir = tempdir().unwrap();
        let db = SynapseDB::open(dir.path().join("test.db"), Config::default());

        // No explicit connect(); the operation opens the session itself
        let note = db.create_note(None, "Implicit", "bootstrap").unwrap();
        assert_eq!(db.get_note(note.id).unwrap().unwrap().title, "Implicit");
    }

    #[test]
    fn test_metadata_access() {
        let dir = tempdir().unwrap();
        let db = SynapseDB::open(dir.path().join("test.db"), Config::default());

        let metadata = db.metadata().unwrap();
        assert_eq!(
            metadata.schema_version,
            crate::storage::schema::SCHEMA_VERSION
        );
    }

    #[test]
    fn test_synapsedb_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SynapseDB>();
    }
}
