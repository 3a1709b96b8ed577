use bytes::Bytes;
use std::sync::{Arc, Mutex, PoisonError};

/// Single-slot holder for the most recently received question payload
///
/// The payload is kept as raw bytes and never re-encoded. Writes overwrite
/// the slot (last write wins) and readers get a snapshot of the bytes, so a
/// reader never observes a half-written value. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct QuestionStore {
    slot: Arc<Mutex<Option<Bytes>>>,
}

impl QuestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, payload: Bytes) {
        // A panic while holding the lock cannot leave a partial value behind
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(payload);
    }

    pub fn get(&self) -> Option<Bytes> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
