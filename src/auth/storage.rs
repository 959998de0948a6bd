//! Persisted session snapshot.
//!
//! One JSON file holds the serialized `User` of the current session, the
//! crate's stand-in for the browser-local storage the app keeps it in. A
//! missing or unreadable file means "logged out".

use std::path::PathBuf;

use crate::models::User;

/// File-backed storage for the current-user snapshot.
#[derive(Debug, Clone)]
pub struct SessionStorage {
    path: PathBuf,
}

impl SessionStorage {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Reads the persisted snapshot.
    ///
    /// Returns `None` if no snapshot exists. A snapshot that fails to parse
    /// is discarded so the next load starts clean.
    pub fn load(&self) -> Option<User> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read session snapshot: {}", e);
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(user) => Some(user),
            Err(e) => {
                tracing::warn!("Discarding corrupt session snapshot: {}", e);
                self.clear();
                None
            }
        }
    }

    /// Writes the snapshot. Failures are logged, not surfaced; the in-memory
    /// session stays authoritative either way.
    pub fn save(&self, user: &User) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                tracing::warn!("Failed to create session directory: {}", e);
                return;
            }
        }

        match serde_json::to_string(user) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&self.path, json) {
                    tracing::warn!("Failed to persist session snapshot: {}", e);
                }
            }
            Err(e) => tracing::warn!("Failed to serialize session snapshot: {}", e),
        }
    }

    /// Removes the snapshot. Clearing an absent snapshot is fine.
    pub fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("Failed to remove session snapshot: {}", e);
            }
        }
    }
}
