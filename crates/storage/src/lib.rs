//! File-backed preference storage for the measurement tool

use directories::ProjectDirs;
use mapmeasure_core::{PreferenceStore, UnitSelection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const PREFS_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("unable to resolve local data directory")]
    NoDataDirectory,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("unsupported preferences version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PreferencesEnvelope {
    version: u32,
    units: UnitSelection,
}

impl FileStore {
    pub fn from_default_project() -> Result<Self, StorageError> {
        let dirs = ProjectDirs::from("dev", "MapMeasure", "MapMeasure")
            .ok_or(StorageError::NoDataDirectory)?;

        Ok(Self { root: dirs.data_local_dir().to_path_buf() })
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn preferences_path(&self) -> PathBuf {
        self.root.join("measure-preferences.json")
    }
}

impl PreferenceStore for FileStore {
    type Error = StorageError;

    fn load_units(&self) -> Result<Option<UnitSelection>, StorageError> {
        let path = self.preferences_path();
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let envelope: PreferencesEnvelope = serde_json::from_slice(&bytes)?;
        if envelope.version != PREFS_SCHEMA_VERSION {
            return Err(StorageError::UnsupportedVersion {
                found: envelope.version,
                expected: PREFS_SCHEMA_VERSION,
            });
        }

        tracing::debug!(path = %path.display(), "loaded unit preferences");
        Ok(Some(envelope.units))
    }

    fn save_units(&mut self, units: &UnitSelection) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root)?;

        let envelope = PreferencesEnvelope { version: PREFS_SCHEMA_VERSION, units: *units };

        let bytes = serde_json::to_vec_pretty(&envelope)?;
        fs::write(self.preferences_path(), bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mapmeasure_core::{AreaUnit, DistanceUnit};

    #[test]
    fn preferences_round_trip() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let mut store = FileStore::with_root(temp.path());

        let units = UnitSelection::new(DistanceUnit::Kilometers, AreaUnit::Hectares);

        store.save_units(&units).expect("save should succeed");
        let loaded = store.load_units().expect("load should succeed");

        assert_eq!(loaded, Some(units));
    }

    #[test]
    fn default_project_store_lives_under_data_dir() {
        // Resolution depends on the user's home; nothing to check without one
        let Ok(store) = FileStore::from_default_project() else {
            return;
        };
        assert!(store.root().is_absolute());
        assert_eq!(store.preferences_path(), store.root().join("measure-preferences.json"));
    }

    #[test]
    fn load_none_when_file_absent() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = FileStore::with_root(temp.path());

        let loaded = store.load_units().expect("load should succeed");
        assert_eq!(loaded, None);
    }

    #[test]
    fn save_creates_missing_root() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let mut store = FileStore::with_root(temp.path().join("nested").join("prefs"));

        store.save_units(&UnitSelection::default()).expect("save should succeed");
        assert!(store.preferences_path().exists());
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = FileStore::with_root(temp.path());
        fs::write(store.preferences_path(), b"{ nope").expect("write should succeed");

        assert!(matches!(store.load_units(), Err(StorageError::Serde(_))));
    }

    #[test]
    fn future_version_is_rejected() {
        let temp = tempfile::tempdir().expect("temp dir should be created");
        let store = FileStore::with_root(temp.path());
        fs::write(
            store.preferences_path(),
            br#"{"version":99,"units":{"distance":"m","area":"ha"}}"#,
        )
        .expect("write should succeed");

        assert!(matches!(
            store.load_units(),
            Err(StorageError::UnsupportedVersion { found: 99, expected: 1 })
        ));
    }
}
