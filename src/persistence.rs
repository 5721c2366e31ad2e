//! Load and save the note collection as one serialized blob.
//!
//! Failures never reach the caller: a missing or unreadable blob loads as an
//! empty collection, and a failed write is logged while the in-memory state
//! stays authoritative.
use log::{debug, error, info, warn};

use crate::{KeyValueStore, Note, PendingDeletion, NOTES_KEY, PENDING_DELETE_KEY};

/// Persistence adapter for the canonical note collection.
#[derive(Debug, Clone)]
pub struct NotePersistence<S> {
    kv: S,
}

impl<S: KeyValueStore> NotePersistence<S> {
    pub fn new(kv: S) -> Self {
        NotePersistence { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Reads the stored collection in canonical order.
    pub fn load(&self) -> Vec<Note> {
        let raw = match self.kv.get(NOTES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("No stored notes yet, starting empty");
                return Vec::new();
            }
            Err(e) => {
                error!("Failed to load notes from storage: {}", e);
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<Note>>(&raw) {
            Ok(notes) => {
                info!("Loaded {} notes from storage", notes.len());
                notes
            }
            Err(e) => {
                error!("Stored notes are unreadable, starting empty: {}", e);
                Vec::new()
            }
        }
    }

    /// Writes the whole collection. Returns whether the write succeeded.
    pub fn save(&self, notes: &[Note]) -> bool {
        let json = match serde_json::to_string(notes) {
            Ok(json) => json,
            Err(e) => {
                error!("Failed to serialize notes: {}", e);
                return false;
            }
        };

        match self.kv.set(NOTES_KEY, &json) {
            Ok(()) => {
                debug!("Saved {} notes", notes.len());
                true
            }
            Err(e) => {
                error!("Failed to save notes to storage: {}", e);
                false
            }
        }
    }

    /// Reads the deletion still awaiting a possible undo, if any.
    pub fn load_pending(&self) -> Option<PendingDeletion> {
        let raw = match self.kv.get(PENDING_DELETE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                warn!("Failed to read pending deletion: {}", e);
                return None;
            }
        };
        serde_json::from_str(&raw)
            .map_err(|e| warn!("Discarding unreadable pending deletion: {}", e))
            .ok()
    }

    pub fn save_pending(&self, pending: Option<&PendingDeletion>) {
        let result = match pending {
            Some(pending) => serde_json::to_string(pending)
                .map_err(crate::KnError::from)
                .and_then(|json| self.kv.set(PENDING_DELETE_KEY, &json)),
            None => self.kv.remove(PENDING_DELETE_KEY),
        };
        if let Err(e) = result {
            warn!("Failed to store pending deletion: {}", e);
        }
    }
}
