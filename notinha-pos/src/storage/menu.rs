//! Persisted menu

use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use shared::Menu;
use tracing::info;

use super::atomic::{atomic_write_json, read_json};
use super::error::StorageResult;

/// Owner of `menu.json`
#[derive(Debug)]
pub struct MenuStore {
    path: PathBuf,
    menu: Mutex<Menu>,
}

impl MenuStore {
    /// Load the menu; a missing file starts an empty menu on disk
    pub fn load(path: impl Into<PathBuf>) -> StorageResult<Self> {
        let path = path.into();
        let menu = match read_json::<Menu>(&path)? {
            Some(menu) => menu,
            None => {
                let menu = Menu::new();
                atomic_write_json(&path, &menu)?;
                info!(path = %path.display(), "Created empty menu");
                menu
            }
        };
        Ok(Self {
            path,
            menu: Mutex::new(menu),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy of the current menu
    pub fn snapshot(&self) -> Menu {
        self.menu.lock().clone()
    }

    pub fn save(&self) -> StorageResult<()> {
        let menu = self.menu.lock();
        atomic_write_json(&self.path, &*menu)
    }

    /// Apply an edit and persist it; the edit is rolled back if the write fails
    pub fn update<R>(&self, f: impl FnOnce(&mut Menu) -> R) -> StorageResult<R> {
        let mut menu = self.menu.lock();
        let previous = menu.clone();
        let result = f(&mut *menu);
        if let Err(e) = atomic_write_json(&self.path, &*menu) {
            *menu = previous;
            return Err(e);
        }
        Ok(result)
    }
}
