//! Session-level holder of the buffer state.
//!
//! Exactly one `Session` owns the live [`BufferState`]; every mutation
//! is an atomic read-modify-write of the whole snapshot under one lock,
//! so no two mutations interleave into an ill-defined state. Reads hand
//! out cloned snapshots that consumers compare by version.

use parking_lot::RwLock;
use tracing::debug;

use crate::backend::contract::RegistrationService;
use crate::buffer::registration::{self, RegisteredBuffer};
use crate::buffer::{BufferState, SelectionKey};
use crate::error::CoreError;
use crate::store::{ContentEntry, StoreRef};

#[derive(Default)]
pub struct Session {
    buffer: RwLock<BufferState>,
}

impl Session {
    pub fn new() -> Self {
        Session::default()
    }

    pub fn snapshot(&self) -> BufferState {
        self.buffer.read().clone()
    }

    pub fn version(&self) -> u64 {
        self.buffer.read().version()
    }

    fn mutate(&self, f: impl FnOnce(&BufferState) -> BufferState) -> BufferState {
        let mut guard = self.buffer.write();
        let next = f(&guard);
        *guard = next.clone();
        next
    }

    pub fn add(&self, entry: &ContentEntry, store: &StoreRef) -> BufferState {
        self.mutate(|buffer| buffer.add(entry, store))
    }

    pub fn remove(&self, key: &SelectionKey) -> BufferState {
        self.mutate(|buffer| buffer.remove(key))
    }

    pub fn toggle(&self, entry: &ContentEntry, store: &StoreRef) -> BufferState {
        self.mutate(|buffer| buffer.toggle(entry, store))
    }

    pub fn set_name(&self, name: impl Into<String>) -> BufferState {
        self.mutate(|buffer| buffer.with_name(name))
    }

    pub fn reset(&self) -> BufferState {
        debug!("resetting buffer");
        self.mutate(|buffer| buffer.reset())
    }

    /// Register the current snapshot. A rejected registration surfaces
    /// the error and leaves the held state exactly as it was.
    pub async fn register(
        &self,
        service: &dyn RegistrationService,
    ) -> Result<RegisteredBuffer, CoreError> {
        let snapshot = self.snapshot();
        registration::register(&snapshot, service).await
    }
}
