//! Shared identifier types for the quarry session core.

/// StoreId: numeric identifier of a configured storage root.
pub type StoreId = usize;

/// TableId: opaque handle returned by the registration service for one
/// registered selection group.
pub type TableId = String;
