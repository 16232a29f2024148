//! Store schema definitions and versioning.
//!
//! This module declares the persistent containers and their secondary
//! indexes. All table definitions are compile-time constants to ensure
//! consistency.
//!
//! # Schema Versioning
//!
//! The schema version is stored in the metadata table. Provisioning runs
//! only when the recorded version is absent (fresh store) or older than
//! [`SCHEMA_VERSION`] (upgrade); an ordinary open of an up-to-date store
//! performs no structural change. A store recorded at a *newer* version
//! refuses to open.
//!
//! # Table Layout
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ METADATA_TABLE                                              │
//! │   Key: &str                                                 │
//! │   Value: &[u8] (bincode)                                    │
//! │   Entries: "store_metadata" -> StoreMetadata                │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ NOTES_TABLE                                                 │
//! │   Key: &[u8; 16] (NoteId as UUID bytes)                     │
//! │   Value: &[u8] (bincode-serialized Note)                    │
//! │   Indexes: notes_by_title, notes_by_created_at,             │
//! │            notes_by_tag (one entry per tag value)           │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ LINKS_TABLE                                                 │
//! │   Key: &[u8; 16] (LinkId as UUID bytes)                     │
//! │   Value: &[u8] (bincode-serialized Link)                    │
//! │   Indexes: links_by_source, links_by_target                 │
//! └─────────────────────────────────────────────────────────────┘
//!
//! ┌─────────────────────────────────────────────────────────────┐
//! │ SEARCH_INDEX_TABLE                                          │
//! │   Key: &str (term)                                          │
//! │   Value: &[u8] (bincode-serialized SearchIndexEntry)        │
//! └─────────────────────────────────────────────────────────────┘
//! ```

use redb::{MultimapTableDefinition, TableDefinition, WriteTransaction};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::types::Timestamp;

/// Current schema version.
///
/// Increment this when adding containers or indexes. Opening an older store
/// re-runs provisioning (create-if-missing); opening a newer one fails.
pub const SCHEMA_VERSION: u32 = 1;

/// Metadata key in the metadata table.
pub(crate) const METADATA_KEY: &str = "store_metadata";

// ============================================================================
// Table Definitions
// ============================================================================

/// Metadata table for store-level information.
///
/// Stores schema version and lifecycle timestamps.
/// Key is a string identifier, value is serialized data.
pub const METADATA_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("metadata");

/// Notes table.
///
/// Key: NoteId as 16-byte UUID
/// Value: bincode-serialized Note struct
pub const NOTES_TABLE: TableDefinition<&[u8; 16], &[u8]> = TableDefinition::new("notes");

/// Index: notes by title.
///
/// Non-unique; multiple notes may share a title.
/// Key: title string, Value: NoteId bytes.
pub const NOTES_BY_TITLE_TABLE: MultimapTableDefinition<&str, &[u8; 16]> =
    MultimapTableDefinition::new("notes_by_title");

/// Index: notes by creation time.
///
/// Key: big-endian millisecond timestamp (lexicographic order matches time
/// order), Value: NoteId bytes. A multimap allows multiple notes created in
/// the same millisecond.
pub const NOTES_BY_CREATED_AT_TABLE: MultimapTableDefinition<&[u8; 8], &[u8; 16]> =
    MultimapTableDefinition::new("notes_by_created_at");

/// Index: notes by tag (multi-valued).
///
/// One index entry per tag value on the note, mirroring a multi-entry
/// index. Key: tag string, Value: NoteId bytes.
pub const NOTES_BY_TAG_TABLE: MultimapTableDefinition<&str, &[u8; 16]> =
    MultimapTableDefinition::new("notes_by_tag");

/// Links table.
///
/// Key: LinkId as 16-byte UUID
/// Value: bincode-serialized Link struct
pub const LINKS_TABLE: TableDefinition<&[u8; 16], &[u8]> = TableDefinition::new("links");

/// Index: links by source note.
///
/// Key: source NoteId bytes, Value: LinkId bytes.
pub const LINKS_BY_SOURCE_TABLE: MultimapTableDefinition<&[u8; 16], &[u8; 16]> =
    MultimapTableDefinition::new("links_by_source");

/// Index: links by target note.
///
/// Key: target NoteId bytes, Value: LinkId bytes.
pub const LINKS_BY_TARGET_TABLE: MultimapTableDefinition<&[u8; 16], &[u8; 16]> =
    MultimapTableDefinition::new("links_by_target");

/// Search index table, keyed by term.
///
/// Provisioned for the search subsystem; no CRUD in this crate writes it.
pub const SEARCH_INDEX_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("search_index");

// ============================================================================
// Store Metadata
// ============================================================================

/// Store metadata kept in the metadata table.
///
/// This is serialized with bincode and stored under the key "store_metadata".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoreMetadata {
    /// Schema version for compatibility checking.
    pub schema_version: u32,

    /// Timestamp when the store was created.
    pub created_at: Timestamp,

    /// Last time the store was opened (updated on each open).
    pub last_opened_at: Timestamp,
}

impl StoreMetadata {
    /// Creates new metadata for a fresh store.
    pub fn new() -> Self {
        let now = Timestamp::now();
        Self {
            schema_version: SCHEMA_VERSION,
            created_at: now,
            last_opened_at: now,
        }
    }

    /// Updates the last_opened_at timestamp.
    pub fn touch(&mut self) {
        self.last_opened_at = Timestamp::now();
    }

    /// Checks if this metadata is compatible with the current schema.
    pub fn is_compatible(&self) -> bool {
        self.schema_version == SCHEMA_VERSION
    }
}

impl Default for StoreMetadata {
    fn default() -> Self {
        Self::new()
    }
}

/// A posting list in the search index container, keyed by term.
///
/// The container is provisioned by the schema but no CRUD in this crate
/// writes it; the record type is declared so the search subsystem and this
/// crate agree on the wire format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchIndexEntry {
    /// The indexed term (primary key).
    pub term: String,

    /// Notes the term appears in.
    pub note_ids: Vec<crate::types::NoteId>,
}

// ============================================================================
// Provisioning
// ============================================================================

/// Creates every container and secondary index if not already present.
///
/// Idempotent: opening a table inside a write transaction creates it only
/// when missing and leaves existing data untouched. Called inside the
/// session open transaction on first run or version upgrade, never on an
/// ordinary open of an up-to-date store.
pub(crate) fn provision(txn: &WriteTransaction) -> Result<()> {
    let _ = txn.open_table(METADATA_TABLE)?;

    let _ = txn.open_table(NOTES_TABLE)?;
    let _ = txn.open_multimap_table(NOTES_BY_TITLE_TABLE)?;
    let _ = txn.open_multimap_table(NOTES_BY_CREATED_AT_TABLE)?;
    let _ = txn.open_multimap_table(NOTES_BY_TAG_TABLE)?;

    let _ = txn.open_table(LINKS_TABLE)?;
    let _ = txn.open_multimap_table(LINKS_BY_SOURCE_TABLE)?;
    let _ = txn.open_multimap_table(LINKS_BY_TARGET_TABLE)?;

    let _ = txn.open_table(SEARCH_INDEX_TABLE)?;

    debug!(schema_version = SCHEMA_VERSION, "Containers provisioned");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_version() {
        assert_eq!(SCHEMA_VERSION, 1);
    }

    #[test]
    fn test_store_metadata_new() {
        let meta = StoreMetadata::new();
        assert_eq!(meta.schema_version, SCHEMA_VERSION);
        assert_eq!(meta.created_at, meta.last_opened_at);
        assert!(meta.is_compatible());
    }

    #[test]
    fn test_store_metadata_touch() {
        let mut meta = StoreMetadata::new();
        let original = meta.last_opened_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        meta.touch();
        assert!(meta.last_opened_at > original);
    }

    #[test]
    fn test_store_metadata_serialization() {
        let meta = StoreMetadata::new();
        let bytes = bincode::serialize(&meta).unwrap();
        let restored: StoreMetadata = bincode::deserialize(&bytes).unwrap();
        assert_eq!(meta.schema_version, restored.schema_version);
        assert_eq!(meta.created_at, restored.created_at);
    }

    #[test]
    fn test_incompatible_version_detected() {
        let meta = StoreMetadata {
            schema_version: SCHEMA_VERSION + 1,
            ..StoreMetadata::new()
        };
        assert!(!meta.is_compatible());
    }
}
