//! Locally persisted favorites
//!
//! Favorites are client-side state only: a JSON array of property ids under
//! the `million-favorites` name. They reflect local storage whichever data
//! mode is active and are never routed through the fallback facade.

use parking_lot::RwLock;
use std::fs;
use std::path::PathBuf;
use tracing::warn;
use uuid::Uuid;

use crate::error::{ClientError, ClientResult};

const FAVORITES_FILE: &str = "million-favorites.json";

pub struct FavoritesStore {
    path: Option<PathBuf>,
    inner: RwLock<Vec<Uuid>>,
}

impl FavoritesStore {
    /// In-memory only; nothing touches disk.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            inner: RwLock::new(Vec::new()),
        }
    }

    pub fn new(storage_dir: impl Into<PathBuf>) -> ClientResult<Self> {
        let dir = storage_dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| ClientError::storage(format!("cannot create {}: {}", dir.display(), e)))?;
        let path = dir.join(FAVORITES_FILE);

        let ids = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice::<Vec<Uuid>>(&bytes).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Resetting unreadable favorites file");
                Vec::new()
            }),
            Err(_) => Vec::new(),
        };

        Ok(Self {
            path: Some(path),
            inner: RwLock::new(ids),
        })
    }

    pub fn all(&self) -> Vec<Uuid> {
        self.inner.read().clone()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.inner.read().contains(&id)
    }

    pub fn add(&self, id: Uuid) -> ClientResult<()> {
        {
            let mut ids = self.inner.write();
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        self.persist()
    }

    pub fn remove(&self, id: Uuid) -> ClientResult<()> {
        self.inner.write().retain(|x| *x != id);
        self.persist()
    }

    /// Returns whether the id is a favorite after the toggle.
    pub fn toggle(&self, id: Uuid) -> ClientResult<bool> {
        let now_favorite = {
            let mut ids = self.inner.write();
            if let Some(pos) = ids.iter().position(|x| *x == id) {
                ids.remove(pos);
                false
            } else {
                ids.push(id);
                true
            }
        };
        self.persist()?;
        Ok(now_favorite)
    }

    fn persist(&self) -> ClientResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let data = serde_json::to_vec(&*self.inner.read())
            .map_err(|e| ClientError::storage(format!("cannot serialize favorites: {}", e)))?;
        fs::write(path, data)
            .map_err(|e| ClientError::storage(format!("cannot write favorites file: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_membership() {
        let store = FavoritesStore::in_memory();
        let id = Uuid::new_v4();

        assert!(store.toggle(id).unwrap());
        assert!(store.contains(id));
        assert!(!store.toggle(id).unwrap());
        assert!(!store.contains(id));
    }

    #[test]
    fn add_is_idempotent() {
        let store = FavoritesStore::in_memory();
        let id = Uuid::new_v4();

        store.add(id).unwrap();
        store.add(id).unwrap();
        assert_eq!(store.all().len(), 1);
    }

    #[test]
    fn favorites_survive_reopen() {
        let dir = std::env::temp_dir().join(format!("million-fav-{}", Uuid::new_v4()));
        let id = Uuid::new_v4();
        {
            let store = FavoritesStore::new(&dir).unwrap();
            store.add(id).unwrap();
        }
        let reopened = FavoritesStore::new(&dir).unwrap();
        assert!(reopened.contains(id));

        std::fs::remove_dir_all(&dir).ok();
    }
}
