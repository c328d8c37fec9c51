use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use doubler_core::{GameError, Result, StorageBackend};

/// Keeps every key in its own `<key>.json` file inside a data directory.
#[derive(Clone, Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Uses `dir` for storage, creating it when missing.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|err| storage_error(&dir, err))?;
        log::debug!("Keeping data in {}", dir.display());
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

fn storage_error(path: &Path, err: io::Error) -> GameError {
    GameError::Storage(format!("{}: {}", path.display(), err))
}

impl StorageBackend for FileBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_error(&path, err)),
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        // the old file stays whole until the rename
        let path = self.path(key);
        let partial = path.with_extension("json.partial");
        fs::write(&partial, value).map_err(|err| storage_error(&partial, err))?;
        fs::rename(&partial, &path).map_err(|err| storage_error(&path, err))
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path(key);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_error(&path, err)),
        }
    }
}
