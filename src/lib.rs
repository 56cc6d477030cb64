//! Quarry: Cross-Storage Buffer Staging and Query Sessions
//!
//! Session core of a file/object browser that stages selections from
//! heterogeneous storages (local filesystem, remote object stores) into
//! a named buffer, registers the buffer with an external query engine,
//! and runs SQL statements against the registered handle.

pub mod backend;
pub mod buffer;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod query;
pub mod resource;
pub mod session;
pub mod store;
pub mod types;
