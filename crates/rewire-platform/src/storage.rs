use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;

use rewire_hooks::StorageBackend;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access store file: {0}")]
    Io(#[from] io::Error),
}

/// Durable key/value backend persisted as a single JSON object file.
///
/// The file is loaded once on open; a malformed file is logged and treated
/// as empty rather than surfaced (stored data is never worth crashing
/// over). Every write persists the whole map.
pub struct FileStore {
    path: PathBuf,
    map: RefCell<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let map = match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(map) => map,
                Err(err) => {
                    log::warn!("store file {} is malformed ({err}); starting empty", path.display());
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(err.into()),
        };
        Ok(Self {
            path,
            map: RefCell::new(map),
        })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }

    fn persist(&self) {
        let raw = match serde_json::to_string_pretty(&*self.map.borrow()) {
            Ok(raw) => raw,
            Err(err) => {
                log::warn!("could not serialize store map: {err}");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, raw) {
            log::warn!("could not persist store file {}: {err}", self.path.display());
        }
    }
}

impl StorageBackend for FileStore {
    fn read(&self, key: &str) -> Option<String> {
        self.map.borrow().get(key).cloned()
    }

    fn write(&self, key: &str, text: &str) {
        self.map.borrow_mut().insert(key.to_owned(), text.to_owned());
        self.persist();
    }
}
