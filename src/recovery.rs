//! Short-lived recovery of the most recent deletion.
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::Note;

/// A deleted note that may still be restored until `expires_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDeletion {
    pub note: Note,
    /// Milliseconds since the epoch after which the note is gone for good
    pub expires_at: i64,
}

impl PendingDeletion {
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// Holds at most one pending deletion. A newer deletion replaces the
/// previous one, which is then permanently lost.
#[derive(Debug, Clone)]
pub struct RecoveryBuffer {
    pending: Option<PendingDeletion>,
    window_ms: i64,
}

impl RecoveryBuffer {
    pub fn new(window: Duration) -> Self {
        RecoveryBuffer {
            pending: None,
            window_ms: i64::try_from(window.as_millis()).unwrap_or(i64::MAX),
        }
    }

    /// Keeps `note` recoverable until `now` plus the window.
    pub fn hold(&mut self, note: Note, now: i64) -> &PendingDeletion {
        if let Some(previous) = &self.pending {
            debug!("Dropping earlier pending deletion of {}", previous.note.id);
        }
        self.pending.insert(PendingDeletion {
            note,
            expires_at: now.saturating_add(self.window_ms),
        })
    }

    /// Puts back a pending deletion read from storage. Expired entries are
    /// discarded.
    pub fn resume(&mut self, pending: PendingDeletion, now: i64) {
        if pending.is_expired(now) {
            debug!("Pending deletion of {} already expired", pending.note.id);
            return;
        }
        self.pending = Some(pending);
    }

    /// Yields the held note if it has not expired. The slot is emptied
    /// either way.
    pub fn take(&mut self, now: i64) -> Option<Note> {
        let pending = self.pending.take()?;
        if pending.is_expired(now) {
            debug!("Undo window for {} has passed", pending.note.id);
            return None;
        }
        Some(pending.note)
    }

    pub fn pending(&self) -> Option<&PendingDeletion> {
        self.pending.as_ref()
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }
}
