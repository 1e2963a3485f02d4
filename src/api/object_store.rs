//! Object storage adapter for uploaded files (resource downloads, images).
//!
//! Only the four pass-through operations live here; nothing else in the
//! crate depends on where the bytes end up.

use crate::config::Config;
use crate::error::CadenceError;
use std::future::Future;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use tracing::debug;
use url::Url;

pub trait ObjectStore: Send + Sync {
    fn upload(&self, key: &str, bytes: Vec<u8>)
    -> impl Future<Output = Result<(), CadenceError>> + Send;

    /// Public URL the object is served from.
    fn get_url(&self, key: &str) -> Result<Url, CadenceError>;

    /// Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = Result<(), CadenceError>> + Send;

    /// Keys under `prefix`, sorted.
    fn list(&self, prefix: &str) -> impl Future<Output = Result<Vec<String>, CadenceError>> + Send;
}

/// Filesystem-backed store rooted at one directory.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    public_base: Url,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, public_base: Url) -> Self {
        Self {
            root: root.into(),
            public_base,
        }
    }

    /// Store rooted at `storage_dir`, serving URLs under `public_base_url`.
    pub fn from_config(cfg: &Config) -> Self {
        Self::new(cfg.storage_dir.clone(), cfg.public_base_url.clone())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Keys are relative `/`-separated paths; anything escaping the root is
    /// rejected.
    fn resolve(&self, key: &str) -> Result<PathBuf, CadenceError> {
        let relative = Path::new(key);
        let clean = !key.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_)));
        if !clean {
            return Err(CadenceError::InvalidObjectKey(key.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

impl ObjectStore for LocalObjectStore {
    async fn upload(&self, key: &str, bytes: Vec<u8>) -> Result<(), CadenceError> {
        let path = self.resolve(key)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        debug!(key, "object uploaded");
        Ok(())
    }

    fn get_url(&self, key: &str) -> Result<Url, CadenceError> {
        self.resolve(key)?;
        Ok(self.public_base.join(key)?)
    }

    async fn delete(&self, key: &str) -> Result<(), CadenceError> {
        let path = self.resolve(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => {
                debug!(key, "object deleted");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>, CadenceError> {
        let mut keys = Vec::new();
        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let mut entries = match tokio::fs::read_dir(&dir).await {
                Ok(entries) => entries,
                Err(e) if e.kind() == ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if entry.file_type().await?.is_dir() {
                    pending.push(path);
                    continue;
                }
                let Ok(relative) = path.strip_prefix(&self.root) else {
                    continue;
                };
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }
        keys.sort();
        Ok(keys)
    }
}
