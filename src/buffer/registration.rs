//! Buffer registration: grouping a selection set by owning storage and
//! submitting it to the external registration service.
//!
//! Grouping order is deterministic: first-seen order of distinct store
//! ids while iterating the buffer in insertion order, prefixes in
//! insertion order within a group. The returned table handles pair up
//! with the groups positionally.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::backend::contract::RegistrationService;
use crate::buffer::BufferState;
use crate::error::CoreError;
use crate::types::{StoreId, TableId};

/// Selected prefixes under one storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreGroup {
    pub store: StoreId,
    pub prefixes: Vec<String>,
}

/// The request shape the core owns and sends across the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterBufferRequest {
    pub name: String,
    pub file_systems: Vec<StoreGroup>,
}

/// Group the buffer's selections by owning storage, first-seen order.
pub fn group_selections(state: &BufferState) -> Vec<StoreGroup> {
    let mut groups: Vec<StoreGroup> = Vec::new();
    for item in state.iter() {
        match groups.iter_mut().find(|group| group.store == item.store.id) {
            Some(group) => group.prefixes.push(item.prefix.clone()),
            None => groups.push(StoreGroup {
                store: item.store.id,
                prefixes: vec![item.prefix.clone()],
            }),
        }
    }
    groups
}

/// Build the registration request for a buffer snapshot.
pub fn request_for(state: &BufferState) -> RegisterBufferRequest {
    RegisterBufferRequest {
        name: state.name().to_string(),
        file_systems: group_selections(state),
    }
}

/// A registered buffer: the request that was submitted and the opaque
/// table handles the backend returned, one per group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredBuffer {
    request: RegisterBufferRequest,
    tables: Vec<TableId>,
}

impl RegisteredBuffer {
    pub fn request(&self) -> &RegisterBufferRequest {
        &self.request
    }

    pub fn tables(&self) -> &[TableId] {
        &self.tables
    }

    /// Groups paired with their table handles, in submission order.
    pub fn candidates(&self) -> impl Iterator<Item = (&StoreGroup, &TableId)> {
        self.request.file_systems.iter().zip(self.tables.iter())
    }

    pub fn table_for_store(&self, store: StoreId) -> Option<&TableId> {
        self.candidates()
            .find(|(group, _)| group.store == store)
            .map(|(_, table)| table)
    }
}

/// Submit the buffer's grouped selections. On failure the error is
/// returned to the caller; the buffer snapshot is read-only here, so a
/// rejected registration cannot clear or corrupt the selection.
pub async fn register(
    state: &BufferState,
    service: &dyn RegistrationService,
) -> Result<RegisteredBuffer, CoreError> {
    let request = request_for(state);
    debug!(
        buffer = %request.name,
        groups = request.file_systems.len(),
        "registering buffer"
    );
    let tables = service.register_buffer(&request).await?;
    info!(buffer = %request.name, tables = tables.len(), "buffer registered");
    Ok(RegisteredBuffer { request, tables })
}
