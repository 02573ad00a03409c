use std::{
    collections::BTreeMap,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::error::LookupError;

/* everything but [A-Za-z0-9._-] is escaped, '%' and '/' included */
const FILE_NAME_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'.').remove(b'-').remove(b'_');

/// A trait for every storage the catalogs and cached schedules are persisted into.
/// Values are opaque blobs for the store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<Vec<u8>>;
    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), LookupError>;
}

/// Keeps everything in memory, nothing survives the process.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, Vec<u8>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), LookupError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Stores every key as a separate file inside one directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn open(dir: &Path) -> Result<FileStore, LookupError> {
        fs::create_dir_all(dir)?;
        info!(
            "Using store directory {}",
            std::path::absolute(dir)?.display()
        );
        Ok(FileStore {
            dir: dir.to_path_buf(),
        })
    }

    /// File of `key` inside the store directory. Keys are percent-encoded, so two
    /// different keys never share a file and no key leaves the directory.
    fn path_for(&self, key: &str) -> PathBuf {
        let file_name = utf8_percent_encode(key, FILE_NAME_ENCODE_SET);
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<Vec<u8>> {
        let path = self.path_for(key);
        match fs::read(&path) {
            Ok(bytes) => Some(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("Nothing stored under {}", key);
                None
            }
            Err(err) => {
                warn!("Could not read {}: {}", path.display(), err);
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: Vec<u8>) -> Result<(), LookupError> {
        let path = self.path_for(key);
        debug!("Writing {} bytes to {}", value.len(), path.display());
        fs::write(path, value)?;
        Ok(())
    }
}

/// Accepts no writes and holds nothing, for checking the best-effort paths.
#[cfg(test)]
pub struct FailingStore;

#[cfg(test)]
impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Option<Vec<u8>> {
        None
    }

    fn set(&mut self, key: &str, _value: Vec<u8>) -> Result<(), LookupError> {
        Err(LookupError::Io(std::io::Error::new(
            ErrorKind::PermissionDenied,
            format!("store is read-only, refusing {}", key),
        )))
    }
}
