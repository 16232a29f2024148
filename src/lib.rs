//! # SynapseDB
//!
//! Embedded durable note store — transactional persistence for note-taking
//! apps, with an optimistic in-memory workspace for UI layers.
//!
//! SynapseDB persists note records (and typed links between notes) in an
//! embedded ACID store, survives process restarts, and gives the calling
//! UI a rollback protocol so speculative edits never stick when
//! persistence fails.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use synapsedb::{SynapseDB, Config, NoteUpdate};
//!
//! // Record the store location (nothing opens yet), then bootstrap
//! let db = SynapseDB::open("./synapse.db", Config::default());
//! db.connect()?;
//!
//! // CRUD
//! let note = db.create_note(None, "Reading list", "redb docs")?;
//! db.update_note(note.id, NoteUpdate::title("Reading list 2025"))?;
//! let all = db.get_all_notes()?;
//! db.delete_note(note.id)?;
//! ```
//!
//! ## Key Concepts
//!
//! ### Session
//!
//! A **session** is the single open connection to the store at a fixed
//! schema version. It is opened lazily, exactly once per handle no matter
//! how many threads race to the first operation, and lives until the
//! handle drops. Schema containers and their secondary indexes are
//! provisioned inside the first open (or a version upgrade), never on an
//! ordinary open.
//!
//! ### Note
//!
//! A **note** is the core record: title, content, tags, and references to
//! other notes, stamped with creation and last-mutation times. Every CRUD
//! operation runs in its own transaction and keeps the secondary indexes
//! (title, creation time, one entry per tag) consistent with the record.
//!
//! ### Optimistic workspace
//!
//! A [`NoteWorkspace`] mirrors the collection in memory, applies each
//! mutation speculatively before persistence resolves, and restores its
//! pre-mutation snapshot if the store rejects the operation.
//!
//! ## Thread Safety
//!
//! [`SynapseDB`] is `Send + Sync` and can be shared across threads using
//! `Arc`. The store uses MVCC for concurrent reads with exclusive write
//! locking.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

// ============================================================================
// Module declarations
// ============================================================================

mod config;
mod db;
mod error;
mod types;

pub mod storage;

// Domain modules
mod link;
mod note;
mod workspace;

// ============================================================================
// Public API re-exports
// ============================================================================

// Main database interface
pub use db::SynapseDB;

// Configuration
pub use config::{Config, SyncMode};

// Error handling
pub use error::{
    ConnectionError, EngineError, NotFoundError, Result, SchemaError, SynapseError,
};

// Core types
pub use types::{LinkId, NoteId, Timestamp};

// Domain types
pub use link::Link;
pub use note::{Note, NoteStore, NoteUpdate};

// Optimistic workspace
pub use workspace::{NoteWorkspace, WorkspaceSnapshot};

// Storage (for advanced users)
pub use storage::{SearchIndexEntry, Session, SessionCache, StoreMetadata, SCHEMA_VERSION};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Convenient imports for common SynapseDB usage.
///
/// ```rust
/// use synapsedb::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{Config, SyncMode};
    pub use crate::db::SynapseDB;
    pub use crate::error::{Result, SynapseError};
    pub use crate::note::{Note, NoteStore, NoteUpdate};
    pub use crate::types::{NoteId, Timestamp};
    pub use crate::workspace::NoteWorkspace;
}
