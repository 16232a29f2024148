//! Optimistic workspace reconciliation.
//!
//! A [`NoteWorkspace`] is the in-memory model a UI renders: the note
//! collection plus the currently selected note. Each user-initiated
//! mutation is applied to the workspace *before* the persistence call
//! resolves, so the UI never waits on the disk; if persistence fails, the
//! workspace is restored to its exact pre-mutation state and the error is
//! propagated for user notification.
//!
//! # Snapshot discipline
//!
//! Every mutation captures its own [`WorkspaceSnapshot`] of the value
//! *prior to* the speculative change. Rollback is a single state
//! replacement of both the collection and the selection — never an
//! incremental undo — so a failed mutation leaves the workspace
//! indistinguishable from its pre-attempt state, including derived state
//! like a selection that pointed at the mutated record.
//!
//! The workspace drives any [`NoteStore`] implementation;
//! [`SynapseDB`](crate::SynapseDB) in production, a failing stand-in in
//! tests.

use tracing::debug;

use crate::error::Result;
use crate::note::{Note, NoteStore, NoteUpdate};
use crate::types::NoteId;

/// Immutable copy of the workspace state, captured before a speculative
/// mutation and restored wholesale on persistence failure.
#[derive(Clone, Debug, PartialEq)]
pub struct WorkspaceSnapshot {
    notes: Vec<Note>,
    selected: Option<NoteId>,
}

/// In-memory note collection kept optimistically in sync with a store.
#[derive(Clone, Debug, Default)]
pub struct NoteWorkspace {
    notes: Vec<Note>,
    selected: Option<NoteId>,
}

impl NoteWorkspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a workspace over an already-loaded collection, preserving
    /// the given ordering (typically from
    /// [`get_all_notes`](crate::SynapseDB::get_all_notes)).
    pub fn from_notes(notes: Vec<Note>) -> Self {
        Self {
            notes,
            selected: None,
        }
    }

    /// The current collection, in workspace order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    /// The currently selected note, if any.
    pub fn selected(&self) -> Option<&Note> {
        let id = self.selected?;
        self.notes.iter().find(|n| n.id == id)
    }

    /// Selects the note with `id` if it is in the collection; `None`
    /// clears the selection.
    pub fn select(&mut self, id: Option<NoteId>) {
        self.selected = id.filter(|id| self.notes.iter().any(|n| n.id == *id));
    }

    /// Captures the pre-mutation state for rollback.
    fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            notes: self.notes.clone(),
            selected: self.selected,
        }
    }

    /// Restores a snapshot in a single state replacement.
    fn restore(&mut self, snapshot: WorkspaceSnapshot) {
        self.notes = snapshot.notes;
        self.selected = snapshot.selected;
    }

    // =========================================================================
    // Optimistic mutations
    // =========================================================================

    /// Speculatively appends a new note, then persists it.
    ///
    /// The ID is generated up front so the speculative entry and the
    /// persisted record agree; on success the entry is replaced with the
    /// store's authoritative record (timestamps included). On failure the
    /// workspace rolls back to its pre-mutation snapshot and the error
    /// propagates.
    pub fn create_note<S: NoteStore>(
        &mut self,
        store: &S,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Result<Note> {
        let title = title.into();
        let content = content.into();

        let snapshot = self.snapshot();
        let id = NoteId::new();
        self.notes.push(Note::new(Some(id), title.clone(), content.clone()));

        match store.create_note(Some(id), title, content) {
            Ok(persisted) => {
                if let Some(entry) = self.notes.iter_mut().find(|n| n.id == id) {
                    *entry = persisted.clone();
                }
                Ok(persisted)
            }
            Err(err) => {
                debug!(id = %id, error = %err, "Create failed, rolling back");
                self.restore(snapshot);
                Err(err)
            }
        }
    }

    /// Speculatively merges `changes` into the in-memory note, then
    /// persists the update.
    ///
    /// On success the entry is replaced with the store's authoritative
    /// record. On failure (including a note that no longer exists in the
    /// store) the workspace rolls back — the collection after rollback
    /// equals the original exactly, `updated_at` included.
    pub fn update_note<S: NoteStore>(
        &mut self,
        store: &S,
        id: NoteId,
        changes: NoteUpdate,
    ) -> Result<Note> {
        let snapshot = self.snapshot();

        if let Some(entry) = self.notes.iter_mut().find(|n| n.id == id) {
            entry.apply(changes.clone());
        }

        match store.update_note(id, changes) {
            Ok(persisted) => {
                if let Some(entry) = self.notes.iter_mut().find(|n| n.id == id) {
                    *entry = persisted.clone();
                }
                Ok(persisted)
            }
            Err(err) => {
                debug!(id = %id, error = %err, "Update failed, rolling back");
                self.restore(snapshot);
                Err(err)
            }
        }
    }

    /// Speculatively removes the note (clearing the selection if it
    /// pointed at it), then persists the delete.
    ///
    /// On failure the workspace rolls back, restoring the selection along
    /// with the collection — a failed delete of the selected note leaves
    /// it selected, not cleared.
    pub fn delete_note<S: NoteStore>(&mut self, store: &S, id: NoteId) -> Result<()> {
        let snapshot = self.snapshot();

        self.notes.retain(|n| n.id != id);
        if self.selected == Some(id) {
            self.selected = None;
        }

        match store.delete_note(id) {
            Ok(()) => Ok(()),
            Err(err) => {
                debug!(id = %id, error = %err, "Delete failed, rolling back");
                self.restore(snapshot);
                Err(err)
            }
        }
    }
}
