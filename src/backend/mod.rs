//! Boundary contracts to the storage/listing/query collaborators, plus
//! the local filesystem implementation of the browse-side contracts.

pub mod contract;
pub mod local;

pub use contract::{ContentListing, QueryEngine, RegistrationService, StorageCatalog};
pub use local::LocalStorage;
