//! Note CRUD operations.
//!
//! A **note** is the core record in SynapseDB: a titled piece of content
//! with tags and references to other notes. All note operations are
//! available on [`SynapseDB`](crate::SynapseDB):
//!
//! - [`create_note(id, title, content)`](crate::SynapseDB::create_note)
//! - [`get_note(id)`](crate::SynapseDB::get_note)
//! - [`get_all_notes()`](crate::SynapseDB::get_all_notes)
//! - [`update_note(id, update)`](crate::SynapseDB::update_note)
//! - [`delete_note(id)`](crate::SynapseDB::delete_note)
//!
//! Each operation opens its own transaction: reads are read-only, writes
//! are read-write, and a write commits the record together with its
//! secondary index rows (title, creation time, one row per tag) so the
//! indexes can never drift from the records they cover.

pub mod types;

pub use types::{Note, NoteUpdate};

use redb::{ReadableTable, WriteTransaction};
use tracing::debug;

use crate::error::{EngineError, NotFoundError, Result, SynapseError};
use crate::storage::schema::{
    NOTES_BY_CREATED_AT_TABLE, NOTES_BY_TAG_TABLE, NOTES_BY_TITLE_TABLE, NOTES_TABLE,
};
use crate::storage::session::Session;
use crate::storage::txn::{run_read, run_write};
use crate::types::NoteId;

/// The CRUD contract a UI-facing layer drives.
///
/// [`SynapseDB`](crate::SynapseDB) is the production implementation; the
/// seam exists so reconciliation logic can be exercised against a failing
/// store in tests.
pub trait NoteStore {
    /// Creates a note with "add" semantics. See
    /// [`SynapseDB::create_note`](crate::SynapseDB::create_note).
    fn create_note(&self, id: Option<NoteId>, title: String, content: String) -> Result<Note>;

    /// Merges `changes` over an existing note. See
    /// [`SynapseDB::update_note`](crate::SynapseDB::update_note).
    fn update_note(&self, id: NoteId, changes: NoteUpdate) -> Result<Note>;

    /// Idempotently deletes a note. See
    /// [`SynapseDB::delete_note`](crate::SynapseDB::delete_note).
    fn delete_note(&self, id: NoteId) -> Result<()>;
}

/// Inserts the secondary index rows for `note`.
fn insert_index_entries(txn: &WriteTransaction, note: &Note) -> Result<()> {
    let mut by_title = txn.open_multimap_table(NOTES_BY_TITLE_TABLE)?;
    by_title.insert(note.title.as_str(), note.id.as_bytes())?;

    let mut by_created = txn.open_multimap_table(NOTES_BY_CREATED_AT_TABLE)?;
    by_created.insert(&note.created_at.to_be_bytes(), note.id.as_bytes())?;

    let mut by_tag = txn.open_multimap_table(NOTES_BY_TAG_TABLE)?;
    for tag in &note.tags {
        by_tag.insert(tag.as_str(), note.id.as_bytes())?;
    }

    Ok(())
}

/// Removes the secondary index rows for `note` as it was last written.
fn remove_index_entries(txn: &WriteTransaction, note: &Note) -> Result<()> {
    let mut by_title = txn.open_multimap_table(NOTES_BY_TITLE_TABLE)?;
    by_title.remove(note.title.as_str(), note.id.as_bytes())?;

    let mut by_created = txn.open_multimap_table(NOTES_BY_CREATED_AT_TABLE)?;
    by_created.remove(&note.created_at.to_be_bytes(), note.id.as_bytes())?;

    let mut by_tag = txn.open_multimap_table(NOTES_BY_TAG_TABLE)?;
    for tag in &note.tags {
        by_tag.remove(tag.as_str(), note.id.as_bytes())?;
    }

    Ok(())
}

/// Creates a note, failing if the key already exists ("add" semantics).
///
/// The duplicate check and the insert run in the same write transaction,
/// so a collision aborts without committing anything and the pre-existing
/// record is untouched.
pub(crate) fn create(
    session: &Session,
    id: Option<NoteId>,
    title: impl Into<String>,
    content: impl Into<String>,
) -> Result<Note> {
    let note = Note::new(id, title, content);

    run_write(session, |txn| {
        let mut table = txn.open_table(NOTES_TABLE)?;

        if table.get(note.id.as_bytes())?.is_some() {
            return Err(SynapseError::duplicate_key("notes", note.id));
        }

        let bytes = bincode::serialize(&note).map_err(EngineError::from)?;
        table.insert(note.id.as_bytes(), bytes.as_slice())?;
        drop(table);

        insert_index_entries(txn, &note)
    })?;

    debug!(id = %note.id, title = %note.title, "Note created");
    Ok(note)
}

/// Point lookup. An absent ID is `Ok(None)`, not an error.
pub(crate) fn get(session: &Session, id: NoteId) -> Result<Option<Note>> {
    run_read(session, |txn| {
        let table = txn.open_table(NOTES_TABLE)?;
        match table.get(id.as_bytes())? {
            Some(value) => {
                let note: Note =
                    bincode::deserialize(value.value()).map_err(EngineError::from)?;
                Ok(Some(note))
            }
            None => Ok(None),
        }
    })
}

/// Returns every note in ascending key (ID-byte) order.
///
/// Key order is unrelated to creation order; callers wanting creation
/// order sort on `created_at` explicitly.
pub(crate) fn get_all(session: &Session) -> Result<Vec<Note>> {
    run_read(session, |txn| {
        let table = txn.open_table(NOTES_TABLE)?;

        let mut notes = Vec::new();
        for result in table.iter()? {
            let (_, value) = result.map_err(EngineError::from)?;
            let note: Note = bincode::deserialize(value.value()).map_err(EngineError::from)?;
            notes.push(note);
        }

        Ok(notes)
    })
}

/// Reads, merges, and writes back a note ("put" semantics), rewriting any
/// index rows the merge touched.
///
/// A missing ID is an explicit [`NotFoundError`] rejection, never a silent
/// no-op.
pub(crate) fn update(session: &Session, id: NoteId, changes: NoteUpdate) -> Result<Note> {
    let updated = run_write(session, |txn| {
        let mut table = txn.open_table(NOTES_TABLE)?;

        let current: Note = match table.get(id.as_bytes())? {
            Some(value) => bincode::deserialize(value.value()).map_err(EngineError::from)?,
            None => return Err(NotFoundError::note(id).into()),
        };

        let mut updated = current.clone();
        updated.apply(changes);

        let bytes = bincode::serialize(&updated).map_err(EngineError::from)?;
        table.insert(id.as_bytes(), bytes.as_slice())?;
        drop(table);

        // created_at never changes, so its row is removed and re-added
        // unchanged; title and tag rows track the merged values.
        remove_index_entries(txn, &current)?;
        insert_index_entries(txn, &updated)?;

        Ok(updated)
    })?;

    debug!(id = %id, "Note updated");
    Ok(updated)
}

/// Removes a note and its index rows if present. Idempotent: deleting an
/// absent ID succeeds without error.
pub(crate) fn delete(session: &Session, id: NoteId) -> Result<()> {
    let existed = run_write(session, |txn| {
        let mut table = txn.open_table(NOTES_TABLE)?;

        let removed: Option<Note> = match table.remove(id.as_bytes())? {
            Some(value) => {
                Some(bincode::deserialize(value.value()).map_err(EngineError::from)?)
            }
            None => None,
        };
        drop(table);

        match removed {
            Some(note) => {
                remove_index_entries(txn, &note)?;
                Ok(true)
            }
            None => Ok(false),
        }
    })?;

    if existed {
        debug!(id = %id, "Note deleted");
    }
    Ok(())
}
