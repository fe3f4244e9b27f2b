//! Profile persistence — one JSON record under a fixed storage key.
//!
//! Presence of the record means the user finished onboarding; absence means
//! first run.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use crate::profile::models::{UserProfile, STORAGE_KEY};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt profile record: {0}")]
    Serde(#[from] serde_json::Error),
}

pub trait ProfileStore: Send + Sync {
    fn load(&self) -> Result<Option<UserProfile>, StoreError>;
    fn save(&self, profile: &UserProfile) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Stores the profile at `<data_dir>/saanvi_recovery_v1.json`.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{STORAGE_KEY}.json")),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProfileStore for JsonFileStore {
    fn load(&self) -> Result<Option<UserProfile>, StoreError> {
        let data = match std::fs::read_to_string(&self.path) {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&data)?))
    }

    /// Writes through a tempfile in the same directory, then renames it into
    /// place, so a crash never leaves a half-written record.
    fn save(&self, profile: &UserProfile) -> Result<(), StoreError> {
        let data = serde_json::to_vec_pretty(profile)?;
        let dir = self.path.parent().unwrap_or(Path::new("."));
        std::fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&data)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!("Profile saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests.
#[cfg(test)]
#[derive(Default)]
pub struct MemoryProfileStore {
    profile: std::sync::Mutex<Option<UserProfile>>,
}

#[cfg(test)]
impl MemoryProfileStore {
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            profile: std::sync::Mutex::new(Some(profile)),
        }
    }
}

#[cfg(test)]
impl ProfileStore for MemoryProfileStore {
    fn load(&self) -> Result<Option<UserProfile>, StoreError> {
        Ok(self.profile.lock().unwrap().clone())
    }

    fn save(&self, profile: &UserProfile) -> Result<(), StoreError> {
        *self.profile.lock().unwrap() = Some(profile.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        *self.profile.lock().unwrap() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn profile() -> UserProfile {
        let mut profile = UserProfile::new(
            "Asha".to_string(),
            NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            true,
        );
        profile.dietary_preferences = vec!["No Dairy".to_string()];
        profile
    }

    #[test]
    fn test_missing_record_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("nested"));
        store.save(&profile()).unwrap();

        assert!(store.path().ends_with("saanvi_recovery_v1.json"));
        assert_eq!(store.load().unwrap(), Some(profile()));
    }

    #[test]
    fn test_clear_removes_record_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        store.save(&profile()).unwrap();
        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load(), Err(StoreError::Serde(_))));
    }
}
