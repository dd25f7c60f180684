use super::error::SaveError;
use super::format::{decompress_and_deserialize, serialize_and_compress, LeagueSnapshot};

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::Path;

pub struct SnapshotManager;

impl SnapshotManager {
    /// Write a snapshot atomically: temp file, fsync, rename.
    pub fn save_to_path(path: &Path, snapshot: &LeagueSnapshot) -> Result<(), SaveError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = serialize_and_compress(snapshot)?;
        let temp_path = path.with_extension("tmp");

        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            file.sync_all()?;
        }

        rename(&temp_path, path)?;

        log::info!("Saved league snapshot ({} bytes) to {:?}", data.len(), path);
        Ok(())
    }

    pub fn load_from_path(path: &Path) -> Result<LeagueSnapshot, SaveError> {
        if !path.exists() {
            return Err(SaveError::FileNotFound { path: path.display().to_string() });
        }

        let mut file = File::open(path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let snapshot = decompress_and_deserialize(&data)?;

        log::debug!("Loaded {} bytes from {:?}", data.len(), path);
        Ok(snapshot)
    }

    /// Snapshot timestamp as RFC 3339, for listings.
    pub fn format_timestamp(snapshot: &LeagueSnapshot) -> String {
        use time::{format_description::well_known::Rfc3339, OffsetDateTime};

        OffsetDateTime::from_unix_timestamp_nanos(snapshot.timestamp as i128 * 1_000_000)
            .ok()
            .and_then(|t| t.format(&Rfc3339).ok())
            .unwrap_or_else(|| "Unknown".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::models::GameAttributes;
    use crate::store::MemoryStore;
    use tempfile::TempDir;

    fn empty_snapshot() -> LeagueSnapshot {
        let config = LeagueConfig::test_league(2, 2);
        let store = MemoryStore::new(GameAttributes::new(config.starting_season));
        LeagueSnapshot::new(config, store, 7)
    }

    #[test]
    fn test_atomic_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("league.gm");

        SnapshotManager::save_to_path(&path, &empty_snapshot()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("tmp").exists());

        let loaded = SnapshotManager::load_from_path(&path).unwrap();
        assert_eq!(loaded.rng_seed, 7);
    }

    #[test]
    fn test_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = SnapshotManager::load_from_path(&temp_dir.path().join("nope.gm")).unwrap_err();
        assert!(matches!(err, SaveError::FileNotFound { .. }));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_format_timestamp() {
        let mut snapshot = empty_snapshot();
        snapshot.timestamp = 0;
        assert_eq!(SnapshotManager::format_timestamp(&snapshot), "1970-01-01T00:00:00Z");
    }
}
