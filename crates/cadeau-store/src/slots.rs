//! Slot storage primitives.
//!
//! The web storefront kept this state in browser-local key/value slots.
//! [`SlotStore`] reproduces that model on disk: one file per slot key inside
//! a data directory.  [`SessionSlots`] is the ephemeral counterpart (session
//! storage): an in-memory map that disappears with the process.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;

use crate::error::{Result, StoreError};

/// Persistent key/value slots, one file per key.
#[derive(Debug)]
pub struct SlotStore {
    dir: PathBuf,
}

impl SlotStore {
    /// Open (or create) the default slot directory.
    ///
    /// The directory is placed in the platform-appropriate data location:
    /// - Linux:   `~/.local/share/cadeau/slots/`
    /// - macOS:   `~/Library/Application Support/com.cadeau.cadeau/slots/`
    /// - Windows: `{FOLDERID_RoamingAppData}\cadeau\cadeau\data\slots\`
    pub fn open_default() -> Result<Self> {
        let project_dirs =
            ProjectDirs::from("com", "cadeau", "cadeau").ok_or(StoreError::NoDataDir)?;
        let dir = project_dirs.data_dir().join("slots");

        tracing::info!(path = %dir.display(), "opening slot store");

        Self::open_at(&dir)
    }

    /// Open (or create) a slot directory at an explicit path.
    ///
    /// This is useful for tests and for embedding the store inside custom
    /// directory layouts.
    pub fn open_at(dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Read a slot.  A missing or unreadable slot reads as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        match std::fs::read_to_string(self.slot_path(key)) {
            Ok(value) => Some(value),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => {
                tracing::warn!(key, error = %e, "failed to read slot");
                None
            }
        }
    }

    /// Write a slot, replacing any previous value.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        std::fs::write(self.slot_path(key), value)?;
        Ok(())
    }

    /// Delete a slot.  Deleting an absent slot is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        match std::fs::remove_file(self.slot_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Session-scoped key/value slots.
///
/// Holds the "ran once this session" guard markers.  Constructed fresh at
/// startup (and per test), so guard state never leaks between runs.
#[derive(Debug, Default)]
pub struct SessionSlots {
    map: Mutex<HashMap<String, String>>,
}

impl SessionSlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.map.lock().expect("session slots poisoned").get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.map
            .lock()
            .expect("session slots poisoned")
            .insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let slots = SlotStore::open_at(dir.path()).unwrap();

        assert_eq!(slots.get("users"), None);
        slots.set("users", "[]").unwrap();
        assert_eq!(slots.get("users").as_deref(), Some("[]"));

        slots.remove("users").unwrap();
        assert_eq!(slots.get("users"), None);

        // removing again is fine
        slots.remove("users").unwrap();
    }

    #[test]
    fn session_slots_are_independent_per_instance() {
        let a = SessionSlots::new();
        a.set("admin_seeded_once", "1");
        assert_eq!(a.get("admin_seeded_once").as_deref(), Some("1"));

        let b = SessionSlots::new();
        assert_eq!(b.get("admin_seeded_once"), None);
    }
}
