//! Persisted configuration and the order counter

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use shared::Config;
use tracing::info;

use super::atomic::{atomic_write_json, read_json};
use super::error::StorageResult;

/// Owner of `config.json`
///
/// All mutations go through the lock and are written back immediately.
#[derive(Debug)]
pub struct ConfigStore {
    path: PathBuf,
    config: Mutex<Config>,
}

impl ConfigStore {
    /// Load the configuration
    ///
    /// A missing file yields the defaults, which are written back so the
    /// operator has a file to edit. Fields missing from an existing file take
    /// their defaults. A file that does not parse is an error.
    pub fn load(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let config = match read_json::<Config>(&path)? {
            Some(config) => config,
            None => {
                let config = Config::default();
                atomic_write_json(&path, &config)?;
                info!(path = %path.display(), "Created default config");
                config
            }
        };
        Ok(Self {
            path,
            config: Mutex::new(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current configuration
    pub fn snapshot(&self) -> Config {
        self.config.lock().clone()
    }

    /// Write the current configuration
    pub fn save(&self) -> StorageResult<()> {
        let config = self.config.lock();
        atomic_write_json(&self.path, &*config)
    }

    /// Apply a change and persist it
    ///
    /// If the write fails the in-memory value is restored.
    pub fn update(&self, f: impl FnOnce(&mut Config)) -> StorageResult<()> {
        let mut config = self.config.lock();
        let previous = config.clone();
        f(&mut *config);
        if let Err(e) = atomic_write_json(&self.path, &*config) {
            *config = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Increment and persist the order counter, returning the new number
    pub fn next_order_number(&self) -> StorageResult<i64> {
        let mut number = 0;
        self.update(|config| {
            config.order_counter += 1;
            number = config.order_counter;
        })?;
        Ok(number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageError;

    #[test]
    fn test_missing_config_written_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let store = ConfigStore::load(&path).unwrap();
        assert_eq!(store.snapshot(), Config::default());
        assert!(path.exists());
    }

    #[test]
    fn test_old_config_gets_new_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"restaurant": {"name": "Cantina da Nona"}, "order_counter": 41}"#,
        )
        .unwrap();

        let config = ConfigStore::load(&path).unwrap().snapshot();
        assert_eq!(config.restaurant.name, "Cantina da Nona");
        assert_eq!(config.order_counter, 41);
        assert_eq!(config.printer.chars_per_line, 48);
        assert!(!config.kitchen_ticket);
    }

    #[test]
    fn test_corrupt_config_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            ConfigStore::load(&path),
            Err(StorageError::Parse { .. })
        ));
    }

    #[test]
    fn test_next_order_number_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let store = ConfigStore::load(&path).unwrap();
        assert_eq!(store.next_order_number().unwrap(), 1);
        assert_eq!(store.next_order_number().unwrap(), 2);

        let reloaded = ConfigStore::load(&path).unwrap();
        assert_eq!(reloaded.snapshot().order_counter, 2);
        assert_eq!(reloaded.next_order_number().unwrap(), 3);
    }

    #[test]
    fn test_concurrent_order_numbers_are_unique() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(ConfigStore::load(dir.path().join("config.json")).unwrap());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = std::sync::Arc::clone(&store);
                std::thread::spawn(move || store.next_order_number().unwrap())
            })
            .collect();
        let mut numbers: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        numbers.sort_unstable();
        assert_eq!(numbers, (1..=8).collect::<Vec<_>>());
    }

    #[test]
    fn test_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let store = ConfigStore::load(&path).unwrap();

        store
            .update(|c| {
                c.kitchen_ticket = true;
                c.printer.device_path = "/dev/usb/lp1".to_string();
            })
            .unwrap();

        let reloaded = ConfigStore::load(&path).unwrap().snapshot();
        assert!(reloaded.kitchen_ticket);
        assert_eq!(reloaded.printer.device_path, "/dev/usb/lp1");
    }
}
