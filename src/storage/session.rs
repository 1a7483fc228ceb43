//! Durable session storage
//!
//! Single writer of session data: the auth service owns the store, every
//! other component only reads through it. One canonical store backs the
//! whole client; there is no parallel token stack.

use parking_lot::RwLock;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, warn};

use crate::domain::auth::Session;
use crate::error::{ClientError, ClientResult};

/// Persistence seam for the paired access/refresh tokens.
pub trait SessionStore: Send + Sync {
    /// Returns the stored session, or `None` when absent or unreadable.
    fn load(&self) -> Option<Session>;
    fn save(&self, session: &Session) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

/// In-memory store for tests and ephemeral clients.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: RwLock<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.inner.read().clone()
    }

    fn save(&self, session: &Session) -> ClientResult<()> {
        *self.inner.write() = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.inner.write() = None;
        Ok(())
    }
}

/// File-backed store: one JSON document holding both tokens and the expiry
/// instant. A corrupt or partial file reads as no session.
pub struct FileSessionStore {
    path: PathBuf,
    cached: RwLock<Option<Session>>,
}

impl FileSessionStore {
    pub fn new(storage_dir: impl Into<PathBuf>) -> ClientResult<Self> {
        let dir = storage_dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| ClientError::storage(format!("cannot create {}: {}", dir.display(), e)))?;
        let path = dir.join("session.json");

        let cached = match fs::read(&path) {
            Ok(bytes) => match serde_json::from_slice::<Session>(&bytes) {
                Ok(session) => Some(session),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Discarding unreadable session file");
                    None
                }
            },
            Err(_) => None,
        };

        Ok(Self {
            path,
            cached: RwLock::new(cached),
        })
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Option<Session> {
        self.cached.read().clone()
    }

    fn save(&self, session: &Session) -> ClientResult<()> {
        let data = serde_json::to_vec_pretty(session)
            .map_err(|e| ClientError::storage(format!("cannot serialize session: {}", e)))?;
        fs::write(&self.path, data)
            .map_err(|e| ClientError::storage(format!("cannot write session file: {}", e)))?;
        *self.cached.write() = Some(session.clone());
        debug!(path = %self.path.display(), "Session persisted");
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        // Clear memory first so a failed unlink still leaves us logged out.
        *self.cached.write() = None;
        if self.path.exists() {
            fs::remove_file(&self.path)
                .map_err(|e| ClientError::storage(format!("cannot remove session file: {}", e)))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("million-session-{}", uuid::Uuid::new_v4()))
    }

    fn sample_session() -> Session {
        Session {
            access_token: "access".into(),
            refresh_token: "refresh".into(),
            expires_at: Utc::now() + Duration::hours(1),
            user: None,
        }
    }

    #[test]
    fn memory_store_round_trip() {
        let store = MemorySessionStore::new();
        assert!(store.load().is_none());

        store.save(&sample_session()).unwrap();
        assert!(store.load().is_some());

        store.clear().unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn file_store_persists_across_instances() {
        let dir = temp_dir();
        {
            let store = FileSessionStore::new(&dir).unwrap();
            store.save(&sample_session()).unwrap();
        }
        let reopened = FileSessionStore::new(&dir).unwrap();
        let loaded = reopened.load().expect("session should survive reopen");
        assert_eq!(loaded.access_token, "access");

        reopened.clear().unwrap();
        let again = FileSessionStore::new(&dir).unwrap();
        assert!(again.load().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn corrupt_session_file_reads_as_absent() {
        let dir = temp_dir();
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("session.json"), b"{\"access_token\": \"only-half\"").unwrap();

        let store = FileSessionStore::new(&dir).unwrap();
        assert!(store.load().is_none());

        std::fs::remove_dir_all(&dir).ok();
    }
}
