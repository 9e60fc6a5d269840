//! JSON document files with atomic replacement

use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::error::{StorageError, StorageResult};

/// Write `value` as indented JSON with a trailing newline
///
/// The document goes to `<path>.tmp` first and is then renamed over `path`,
/// so a crash mid-write leaves the previous contents intact.
pub fn atomic_write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> StorageResult<()> {
    let mut data = serde_json::to_vec_pretty(value)?;
    data.push(b'\n');

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let tmp_path = tmp_path(path);
    fs::write(&tmp_path, &data).map_err(|e| StorageError::io(&tmp_path, e))?;
    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StorageError::io(path, e));
    }
    Ok(())
}

/// Read a JSON document; `None` when the file does not exist
pub fn read_json<T: DeserializeOwned>(path: &Path) -> StorageResult<Option<T>> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };
    serde_json::from_slice(&data)
        .map(Some)
        .map_err(|e| StorageError::parse(path, e))
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_write_is_indented_with_newline() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        let mut value = BTreeMap::new();
        value.insert("a", 1);

        atomic_write_json(&path, &value).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "{\n  \"a\": 1\n}\n");
        assert!(!tmp_path(&path).exists());
    }

    #[test]
    fn test_write_replaces_previous_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.json");
        atomic_write_json(&path, &vec![1, 2, 3]).unwrap();
        atomic_write_json(&path, &vec![4]).unwrap();

        let back: Option<Vec<i32>> = read_json(&path).unwrap();
        assert_eq!(back, Some(vec![4]));
    }

    #[test]
    fn test_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("doc.json");
        atomic_write_json(&path, &true).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let back: Option<Vec<i32>> = read_json(&dir.path().join("missing.json")).unwrap();
        assert!(back.is_none());
    }

    #[test]
    fn test_read_malformed_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let result: StorageResult<Option<Vec<i32>>> = read_json(&path);
        assert!(matches!(result, Err(StorageError::Parse { .. })));
    }
}
