//! Buffer staging: the cross-storage selection set.
//!
//! A [`BufferState`] is an immutable snapshot of the user's current
//! selection: a named, keyed set of [`BufferItem`]s spanning one or
//! more storages. Every operation consumes a snapshot by reference and
//! produces a complete new snapshot with an advanced version counter;
//! consumers compare versions, never deep-mutate.

pub mod key;
pub mod registration;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::store::{ContentEntry, ContentKind, StoreRef};

pub use key::SelectionKey;
pub use registration::{
    group_selections, register, RegisterBufferRequest, RegisteredBuffer, StoreGroup,
};

/// One selected entry. Owned exclusively by the buffer; created on
/// add/toggle, destroyed on remove/reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferItem {
    pub id: SelectionKey,
    pub store: StoreRef,
    pub kind: ContentKind,
    pub prefix: String,
}

impl BufferItem {
    fn new(entry: &ContentEntry, store: &StoreRef) -> Self {
        BufferItem {
            id: SelectionKey::new(store.id, &entry.prefix),
            store: store.clone(),
            kind: entry.kind,
            prefix: entry.prefix.clone(),
        }
    }
}

/// Immutable selection-set snapshot.
///
/// Membership is a set keyed by [`SelectionKey`]; `order` records
/// insertion order so display and grouping stay deterministic even
/// though the backing map is unordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferState {
    name: String,
    version: u64,
    order: Vec<SelectionKey>,
    items: HashMap<SelectionKey, BufferItem>,
}

impl BufferState {
    pub fn new() -> Self {
        BufferState::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot version, advanced by every operation.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, key: &SelectionKey) -> bool {
        self.items.contains_key(key)
    }

    pub fn get(&self, key: &SelectionKey) -> Option<&BufferItem> {
        self.items.get(key)
    }

    /// Items in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &BufferItem> {
        self.order.iter().filter_map(|key| self.items.get(key))
    }

    fn bump(&self) -> BufferState {
        let mut next = self.clone();
        next.version += 1;
        next
    }

    /// Insert the entry at its derived key. Re-adding an existing
    /// selection refreshes the stored store metadata but leaves the set
    /// content and display position unchanged.
    pub fn add(&self, entry: &ContentEntry, store: &StoreRef) -> BufferState {
        let item = BufferItem::new(entry, store);
        debug!(key = %item.id, "adding selection");
        let mut next = self.bump();
        if !next.items.contains_key(&item.id) {
            next.order.push(item.id.clone());
        }
        next.items.insert(item.id.clone(), item);
        next
    }

    /// Delete the entry at `key`; a silent no-op on the set content if
    /// absent, never an error.
    pub fn remove(&self, key: &SelectionKey) -> BufferState {
        let mut next = self.bump();
        if next.items.remove(key).is_some() {
            debug!(key = %key, "removing selection");
            next.order.retain(|k| k != key);
        }
        next
    }

    /// The primary user-facing operation: deselect if present, select
    /// if absent. An involution on the member set.
    pub fn toggle(&self, entry: &ContentEntry, store: &StoreRef) -> BufferState {
        let key = SelectionKey::new(store.id, &entry.prefix);
        if self.items.contains_key(&key) {
            self.remove(&key)
        } else {
            self.add(entry, store)
        }
    }

    /// Replace the display name; does not touch the items.
    pub fn with_name(&self, name: impl Into<String>) -> BufferState {
        let mut next = self.bump();
        next.name = name.into();
        next
    }

    /// Empty buffer, empty name, whatever the prior state. The version
    /// still advances so consumers observe the change.
    pub fn reset(&self) -> BufferState {
        BufferState {
            name: String::new(),
            version: self.version + 1,
            order: Vec::new(),
            items: HashMap::new(),
        }
    }

    #[cfg(test)]
    fn check_invariants(&self) {
        assert_eq!(self.order.len(), self.items.len());
        for key in &self.order {
            let item = self.items.get(key).expect("ordered key missing from map");
            assert_eq!(*key, SelectionKey::new(item.store.id, &item.prefix));
        }
    }
}
