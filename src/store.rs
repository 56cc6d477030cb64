//! Storage and content data model.
//!
//! A [`StorageDescriptor`] names one storage root or one navigated-to
//! location within it. Descriptors are immutable per navigation event:
//! every path change produces a new value via [`StorageDescriptor::with_prefix`].

use serde::{Deserialize, Serialize};

use crate::types::StoreId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageKind {
    Local,
    Remote,
}

impl std::fmt::Display for StorageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageKind::Local => f.write_str("Local"),
            StorageKind::Remote => f.write_str("Remote"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageDescriptor {
    pub id: StoreId,
    pub name: String,
    pub prefix: String,
    pub kind: StorageKind,
}

impl StorageDescriptor {
    /// Descriptor for a navigated-to location within the same storage.
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Self {
        StorageDescriptor {
            id: self.id,
            name: self.name.clone(),
            prefix: prefix.into(),
            kind: self.kind,
        }
    }

    /// The restriction embedded in buffer items: identity without the
    /// navigated prefix.
    pub fn to_ref(&self) -> StoreRef {
        StoreRef {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
        }
    }
}

/// Restriction of [`StorageDescriptor`] carried inside a buffer item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRef {
    pub id: StoreId,
    pub name: String,
    pub kind: StorageKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ContentKind {
    Directory,
    File,
}

impl std::fmt::Display for ContentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContentKind::Directory => f.write_str("dir"),
            ContentKind::File => f.write_str("file"),
        }
    }
}

/// One entry produced by the listing collaborator for a storage
/// location. Never persisted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentEntry {
    pub prefix: String,
    pub kind: ContentKind,
}

impl ContentEntry {
    pub fn new(prefix: impl Into<String>, is_dir: bool) -> Self {
        ContentEntry {
            prefix: prefix.into(),
            kind: if is_dir {
                ContentKind::Directory
            } else {
                ContentKind::File
            },
        }
    }
}

/// Result of listing one storage location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Listing {
    pub prefix: String,
    pub items: Vec<ContentEntry>,
}
