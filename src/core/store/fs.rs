//! Filesystem-backed config store.
//!
//! One file per key directly under the environment's state directory, so
//! operators can inspect (`cat ssh-key`) what tubes persisted.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use super::ConfigStore;
use crate::core::validation::validate_key;
use crate::error::{Result, StoreError};

/// Config store rooted at a state directory.
#[derive(Debug, Clone)]
pub struct Filesystem {
    root: PathBuf,
}

impl Filesystem {
    /// Open a store rooted at `root`. The directory is not created.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The state directory backing this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(key))
    }

    fn write_durably(&self, path: &Path, value: &[u8]) -> io::Result<()> {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = self.root.join(format!(".{file_name}.tmp"));

        let mut file = fs::File::create(&tmp)?;
        file.write_all(value)?;
        file.sync_all()?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp, path)?;

        // the rename itself must reach the disk
        #[cfg(unix)]
        fs::File::open(&self.root)?.sync_all()?;

        Ok(())
    }
}

impl ConfigStore for Filesystem {
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.path(key)?;
        trace!(path = %path.display(), "reading config entry");

        fs::read(&path).map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => StoreError::NotFound(key.to_string()).into(),
            _ => StoreError::ReadFailed {
                key: key.to_string(),
                source,
            }
            .into(),
        })
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        let path = self.path(key)?;
        debug!(path = %path.display(), len = value.len(), "writing config entry");

        self.write_durably(&path, value).map_err(|source| {
            StoreError::WriteFailed {
                key: key.to_string(),
                source,
            }
            .into()
        })
    }

    fn is_empty(&self) -> Result<bool> {
        let list_failed = |source| StoreError::ListFailed {
            path: self.root.clone(),
            source,
        };

        let mut entries = fs::read_dir(&self.root).map_err(list_failed)?;
        match entries.next() {
            None => Ok(true),
            Some(Ok(_)) => Ok(false),
            Some(Err(source)) => Err(list_failed(source).into()),
        }
    }
}
