//! Service boundary contracts.
//!
//! The core reaches every external collaborator through these traits;
//! the engine behind them (object stores, SQL execution) is opaque.
//! All failures come back as `CoreError` values, never as panics.

use async_trait::async_trait;

use crate::buffer::registration::RegisterBufferRequest;
use crate::error::CoreError;
use crate::query::Row;
use crate::store::{Listing, StorageDescriptor};
use crate::types::{StoreId, TableId};

/// Materializes storage descriptors for the session.
#[async_trait]
pub trait StorageCatalog: Send + Sync {
    async fn list_storages(&self) -> Result<Vec<StorageDescriptor>, CoreError>;

    /// Descriptor for a navigated-to location within one storage.
    async fn get_storage(&self, id: StoreId, prefix: &str)
        -> Result<StorageDescriptor, CoreError>;
}

/// Lists the contents of one storage location.
#[async_trait]
pub trait ContentListing: Send + Sync {
    async fn list_contents(&self, storage: &StorageDescriptor) -> Result<Listing, CoreError>;
}

/// Registers a grouped selection as a queryable dataset.
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Returns one opaque table handle per submitted group, in group
    /// order.
    async fn register_buffer(
        &self,
        request: &RegisterBufferRequest,
    ) -> Result<Vec<TableId>, CoreError>;
}

/// Executes a statement against a registered table handle.
#[async_trait]
pub trait QueryEngine: Send + Sync {
    async fn run_query(&self, statement: &str, target: &TableId) -> Result<Vec<Row>, CoreError>;
}
