//! Session save/load
//!
//! One JSON record under a fixed key. A missing record is the normal first
//! run. Backend and parse failures are logged and never end the session.

use thiserror::Error;

use crate::platform::storage::{Storage, StorageError};
use crate::sim::SessionState;

/// Key the session record lives under
pub const SESSION_KEY: &str = "pair_flip_session";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("session record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("session record has out-of-range values")]
    Invalid,
}

pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    pub fn try_save(&mut self, session: &SessionState) -> Result<(), PersistError> {
        let json = serde_json::to_string(session)?;
        self.storage.set(SESSION_KEY, &json)?;
        Ok(())
    }

    /// Save, logging instead of failing
    pub fn save(&mut self, session: &SessionState) {
        match self.try_save(session) {
            Ok(()) => log::info!(
                "Session saved (score {}, turn {})",
                session.score,
                session.turns
            ),
            Err(e) => log::warn!("Session save failed: {e}"),
        }
    }

    /// `Ok(None)` when nothing has been saved yet
    pub fn try_load(&self) -> Result<Option<SessionState>, PersistError> {
        if !self.storage.has(SESSION_KEY) {
            return Ok(None);
        }
        let json = self.storage.get(SESSION_KEY)?;
        let session: SessionState = serde_json::from_str(&json)?;
        if !session.is_valid() {
            return Err(PersistError::Invalid);
        }
        Ok(Some(session))
    }

    /// Load, falling back to a fresh start on any failure
    pub fn load(&self) -> Option<SessionState> {
        match self.try_load() {
            Ok(Some(session)) => {
                log::info!("Loaded saved session");
                Some(session)
            }
            Ok(None) => {
                log::info!("No saved session found, starting fresh");
                None
            }
            Err(e) => {
                log::warn!("Discarding unreadable saved session: {e}");
                None
            }
        }
    }

    /// Drop the saved record (new game)
    pub fn clear(&mut self) {
        match self.storage.remove(SESSION_KEY) {
            Ok(()) => log::info!("Saved session cleared"),
            Err(e) => log::warn!("Failed to clear saved session: {e}"),
        }
    }
}
