//! Note record types.

use serde::{Deserialize, Serialize};

use crate::types::{NoteId, Timestamp};

/// A persisted note record.
///
/// `id` and `created_at` are fixed at creation; every other field is
/// replaceable through [`NoteUpdate`]. `updated_at` moves strictly forward
/// on every mutation, so `updated_at >= created_at` always holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Primary key, immutable after creation.
    pub id: NoteId,

    /// Display title. Indexed (non-unique).
    pub title: String,

    /// Body text.
    pub content: String,

    /// Creation time in ms since epoch, set once.
    pub created_at: Timestamp,

    /// Last mutation time in ms since epoch.
    pub updated_at: Timestamp,

    /// Ordered tags. Each value gets its own index entry.
    pub tags: Vec<String>,

    /// Ordered references to other notes. Not validated against the notes
    /// container; dangling references are possible.
    pub linked_notes: Vec<NoteId>,
}

impl Note {
    /// Constructs a fresh note with `created_at == updated_at == now` and
    /// empty tags and links.
    ///
    /// When `id` is `None` a new random ID is generated.
    pub fn new(id: Option<NoteId>, title: impl Into<String>, content: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: id.unwrap_or_else(NoteId::new),
            title: title.into(),
            content: content.into(),
            created_at: now,
            updated_at: now,
            tags: Vec::new(),
            linked_notes: Vec::new(),
        }
    }

    /// Merges the `Some` fields of `update` over this note and bumps
    /// `updated_at` strictly above its prior value.
    ///
    /// The clock has millisecond resolution, so a second mutation within
    /// the same millisecond would otherwise stamp an equal time; in that
    /// case the stamp advances by one millisecond instead.
    pub(crate) fn apply(&mut self, update: NoteUpdate) {
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(tags) = update.tags {
            self.tags = tags;
        }
        if let Some(linked_notes) = update.linked_notes {
            self.linked_notes = linked_notes;
        }

        let now = Timestamp::now();
        self.updated_at = if now > self.updated_at {
            now
        } else {
            Timestamp::from_millis(self.updated_at.as_millis() + 1)
        };
    }
}

/// Partial update for a note's mutable fields.
///
/// Only fields set to `Some(...)` will be replaced. `id` and `created_at`
/// are immutable. Collection fields are replaced wholesale, not merged.
#[derive(Clone, Debug, Default)]
pub struct NoteUpdate {
    /// New title.
    pub title: Option<String>,

    /// New body text.
    pub content: Option<String>,

    /// Replace tags entirely.
    pub tags: Option<Vec<String>>,

    /// Replace linked note references entirely.
    pub linked_notes: Option<Vec<NoteId>>,
}

impl NoteUpdate {
    /// Update that replaces only the title.
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Default::default()
        }
    }

    /// Update that replaces only the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    /// Update that replaces only the tags.
    pub fn tags(tags: Vec<String>) -> Self {
        Self {
            tags: Some(tags),
            ..Default::default()
        }
    }
}
