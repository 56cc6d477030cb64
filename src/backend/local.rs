//! Local filesystem implementation of the browse-side contracts.
//!
//! One configured root exposed as a single `Local` storage, defaulting
//! to the user's home directory. Listings are one level deep,
//! directories first then files, name-sorted, so the order is
//! deterministic across runs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use walkdir::WalkDir;

use crate::backend::contract::{ContentListing, StorageCatalog};
use crate::error::CoreError;
use crate::store::{ContentEntry, Listing, StorageDescriptor, StorageKind};
use crate::types::StoreId;

/// Id of the default local storage, matching the bootstrap store the
/// application seeds on first run.
pub const LOCAL_STORE_ID: StoreId = 1;

pub struct LocalStorage {
    id: StoreId,
    name: String,
    root: PathBuf,
}

impl LocalStorage {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        LocalStorage {
            id: LOCAL_STORE_ID,
            name: name.into(),
            root: root.into(),
        }
    }

    /// Default storage rooted at the user's home directory.
    pub fn with_home_root() -> Result<Self, CoreError> {
        let user_dirs = directories::UserDirs::new().ok_or(CoreError::HomeDirNotFound)?;
        Ok(LocalStorage::new("Local", user_dirs.home_dir()))
    }

    pub fn id(&self) -> StoreId {
        self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn descriptor(&self, prefix: &str) -> StorageDescriptor {
        StorageDescriptor {
            id: self.id,
            name: self.name.clone(),
            prefix: prefix.to_string(),
            kind: StorageKind::Local,
        }
    }

    fn resolve(&self, prefix: &str) -> PathBuf {
        let trimmed = prefix.trim_start_matches('/');
        if trimmed.is_empty() {
            self.root.clone()
        } else {
            self.root.join(trimmed)
        }
    }

    fn child_prefix(parent: &str, name: &str) -> String {
        let parent = parent.trim_matches('/');
        if parent.is_empty() {
            name.to_string()
        } else {
            format!("{parent}/{name}")
        }
    }

    /// Classify an existing prefix as a file or directory entry.
    pub fn entry(&self, prefix: &str) -> Result<ContentEntry, CoreError> {
        let path = self.resolve(prefix);
        if !path.exists() {
            return Err(CoreError::Fetch(format!("no such entry: {prefix}")));
        }
        Ok(ContentEntry::new(prefix, path.is_dir()))
    }
}

#[async_trait]
impl StorageCatalog for LocalStorage {
    async fn list_storages(&self) -> Result<Vec<StorageDescriptor>, CoreError> {
        Ok(vec![self.descriptor("")])
    }

    async fn get_storage(
        &self,
        id: StoreId,
        prefix: &str,
    ) -> Result<StorageDescriptor, CoreError> {
        if id != self.id {
            return Err(CoreError::StorageNotFound(id));
        }
        Ok(self.descriptor(prefix))
    }
}

#[async_trait]
impl ContentListing for LocalStorage {
    async fn list_contents(&self, storage: &StorageDescriptor) -> Result<Listing, CoreError> {
        if storage.id != self.id {
            return Err(CoreError::StorageNotFound(storage.id));
        }

        let path = self.resolve(&storage.prefix);
        if path.is_file() {
            return Err(CoreError::NotADirectory(storage.prefix.clone()));
        }
        debug!(storage = storage.id, prefix = %storage.prefix, "listing contents");

        let mut directories = Vec::new();
        let mut files = Vec::new();
        for entry in WalkDir::new(&path)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| CoreError::Fetch(e.to_string()))?;
            let name = entry.file_name().to_string_lossy().to_string();
            let prefix = Self::child_prefix(&storage.prefix, &name);
            if entry.file_type().is_dir() {
                directories.push(ContentEntry::new(prefix, true));
            } else {
                files.push(ContentEntry::new(prefix, false));
            }
        }
        directories.extend(files);

        Ok(Listing {
            prefix: storage.prefix.clone(),
            items: directories,
        })
    }
}
