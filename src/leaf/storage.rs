//! Key-value persistence for the note list and theme.
//!
//! A store holds string values under string keys, read and written whole.
//! On disk each key is one file inside the store directory.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use tempfile::NamedTempFile;

use crate::errors::Result;

/// key holding the JSON array of notes
pub static NOTES_KEY: &str = "notes";
/// key holding `dark` or `light`
pub static THEME_KEY: &str = "theme";

pub trait Storage {
    /// `Ok(None)` when nothing has been stored under `key`
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    fn set_item(&mut self, key: &str, value: &str) -> Result<()>;

    /// where a key lives, for error messages
    fn describe(&self, key: &str) -> String {
        key.to_string()
    }
}

/// Store backed by a directory, one file per key.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new<P: AsRef<Path>>(root: P) -> FileStorage {
        FileStorage { root: root.as_ref().to_path_buf() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(key)
    }
}

impl Storage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        let mut file = match File::open(&path) {
            Ok(f) => f,
            Err(ref e) if e.kind() == ErrorKind::NotFound => {
                debug!("event=store_miss key={} path={}", key, path.display());
                return Ok(None);
            }
            Err(e) => return Err(From::from(e)),
        };
        let mut contents_buf = vec![];
        file.read_to_end(&mut contents_buf)?;
        let contents = String::from_utf8(contents_buf)?;
        debug!("event=store_read key={} bytes={}", key, contents.len());
        Ok(Some(contents))
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root)?;
            info!("event=store_created path={}", self.root.display());
        }
        let path = self.key_path(key);
        // readers see either the old value or the new one, never a partial write
        let mut tmp = NamedTempFile::new_in(&self.root)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| e.error)?;
        debug!("event=store_write key={} bytes={}", key, value.len());
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        self.key_path(key).display().to_string()
    }
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> MemoryStorage {
        MemoryStorage::default()
    }
}

impl Storage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
