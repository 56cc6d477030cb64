//! Selection identity.
//!
//! A [`SelectionKey`] is the sole identity for selection-set membership:
//! two entries are the same selection if and only if their keys are
//! equal, regardless of which storage they came from.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::StoreId;

/// Composite key over (storage id, entry prefix).
///
/// The scheme is `store:{id}:prefix:{prefix}`. It is pure, total and
/// deterministic, and injective over distinct (id, prefix) pairs: the
/// id is numeric and cannot contain the separator, so the first
/// `:prefix:` after the digits is unambiguous whatever the prefix
/// contains.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SelectionKey(String);

impl SelectionKey {
    pub fn new(store: StoreId, prefix: &str) -> Self {
        SelectionKey(format!("store:{store}:prefix:{prefix}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SelectionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
