use std::{
    cmp::Reverse,
    collections::{HashMap, HashSet},
    time::Duration,
};

use log::{debug, info, trace};
use uuid::Uuid;

use crate::{
    all_tags, normalize_tags, now_millis, visible_notes, FilterState, KeyValueStore, Note,
    NoteDraft, NotePersistence, PendingDeletion, RecoveryBuffer,
};

/// Owns the canonical, order-significant note collection. Every mutation
/// goes through here and is followed by a save of the whole collection.
///
/// Lookup misses are silent no-ops and save failures are only logged; the
/// in-memory collection stays authoritative for the rest of the session.
pub struct NoteStore<S> {
    notes: Vec<Note>,
    persistence: NotePersistence<S>,
    recovery: RecoveryBuffer,
}

impl<S: KeyValueStore> NoteStore<S> {
    /// Loads the persisted collection (empty on first run or unreadable
    /// data) along with any deletion still inside its undo window.
    pub fn open(kv: S, undo_window: Duration) -> Self {
        let persistence = NotePersistence::new(kv);
        let notes = persistence.load();

        let mut recovery = RecoveryBuffer::new(undo_window);
        if let Some(pending) = persistence.load_pending() {
            recovery.resume(pending, now_millis());
        }

        NoteStore {
            notes,
            persistence,
            recovery,
        }
    }

    /// Notes in canonical order.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Sorted set of every tag in the collection.
    pub fn all_tags(&self) -> Vec<String> {
        all_tags(&self.notes)
    }

    /// The filtered and sorted view for `filter`.
    pub fn visible(&self, filter: &FilterState) -> Vec<&Note> {
        visible_notes(&self.notes, filter)
    }

    pub fn pending_deletion(&self) -> Option<&PendingDeletion> {
        self.recovery.pending()
    }

    /// Creates a note from a validated draft and puts it at the front of
    /// the collection.
    pub fn add(&mut self, draft: NoteDraft) -> Note {
        let id = self.fresh_id();
        let note = Note::from_draft(id, draft, now_millis());
        info!("Adding note {} ({})", note.id, note.title);

        self.notes.insert(0, note.clone());
        self.persist();
        note
    }

    /// Replaces the stored note with the same id, keeping its position and
    /// creation time and stamping `updated_at` with the current time.
    /// Returns `false` without touching anything when the id is unknown.
    pub fn update(&mut self, note: Note) -> bool {
        let Some(index) = self.position(&note.id) else {
            debug!("Ignoring update of unknown note {}", note.id);
            return false;
        };

        let existing = &self.notes[index];
        let floor = existing.updated_at.max(existing.created_at);
        let created_at = existing.created_at;

        let mut updated = note;
        updated.created_at = created_at;
        updated.updated_at = now_millis().max(floor);
        updated.tags = normalize_tags(&updated.tags);

        info!("Updating note {}", updated.id);
        self.notes[index] = updated;
        self.persist();
        true
    }

    /// Flips the favourite flag. Returns the new value, or `None` for an
    /// unknown id.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let mut note = self.get(id)?.clone();
        note.is_favorite = !note.is_favorite;
        let is_favorite = note.is_favorite;
        self.update(note);
        Some(is_favorite)
    }

    /// Removes the note and keeps it recoverable for the undo window.
    /// Returns the removed note, or `None` for an unknown id.
    pub fn delete(&mut self, id: &str) -> Option<Note> {
        let Some(index) = self.position(id) else {
            debug!("Ignoring delete of unknown note {}", id);
            return None;
        };

        let removed = self.notes.remove(index);
        info!("Deleted note {} ({})", removed.id, removed.title);

        let pending = self.recovery.hold(removed.clone(), now_millis());
        self.persistence.save_pending(Some(pending));
        self.persist();
        Some(removed)
    }

    /// Moves the notes in `visible` to the front, in the given order. All
    /// other notes keep their relative order after them. Unknown ids are
    /// ignored. Timestamps are left alone.
    pub fn reorder(&mut self, visible: &[Note]) {
        self.reorder_ids(visible.iter().map(|note| note.id.as_str()));
    }

    pub fn reorder_ids<'a, I>(&mut self, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut rank: HashMap<&str, usize> = HashMap::new();
        for id in ids {
            let next = rank.len();
            rank.entry(id).or_insert(next);
        }

        let (mut moved, rest): (Vec<Note>, Vec<Note>) = std::mem::take(&mut self.notes)
            .into_iter()
            .partition(|note| rank.contains_key(note.id.as_str()));
        moved.sort_by_key(|note| rank[note.id.as_str()]);

        trace!("Reordered {} notes ahead of {}", moved.len(), rest.len());
        moved.extend(rest);
        self.notes = moved;

        info!("Reordered collection of {} notes", self.notes.len());
        self.persist();
    }

    /// Puts a deleted note back and re-sorts the collection by most recent
    /// update. A note whose id is already present is left alone.
    pub fn undo_delete(&mut self, note: Note) -> bool {
        if self
            .recovery
            .pending()
            .is_some_and(|pending| pending.note.id == note.id)
        {
            self.recovery.clear();
            self.persistence.save_pending(None);
        }

        if self.contains(&note.id) {
            debug!("Note {} is already present, nothing to restore", note.id);
            return false;
        }

        info!("Restoring note {} ({})", note.id, note.title);
        self.notes.push(note);
        self.notes.sort_by_key(|n| Reverse(n.updated_at));
        self.persist();
        true
    }

    /// Restores the most recent deletion if its undo window is still open.
    pub fn restore_last_deleted(&mut self) -> Option<Note> {
        self.recovery.pending()?;
        let note = self.recovery.take(now_millis());
        self.persistence.save_pending(None);

        let note = note?;
        let id = note.id.clone();
        if self.undo_delete(note) {
            self.get(&id).cloned()
        } else {
            None
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.notes.iter().position(|note| note.id == id)
    }

    fn fresh_id(&self) -> String {
        let taken: HashSet<&str> = self.notes.iter().map(|n| n.id.as_str()).collect();
        loop {
            let id = Uuid::new_v4().to_string();
            if !taken.contains(id.as_str()) {
                return id;
            }
        }
    }

    fn persist(&self) {
        self.persistence.save(&self.notes);
    }
}
