//! Shared vocabulary for the catalog descriptor sync engine: the data model
//! (diffs, descriptors, identities, operations), error taxonomy,
//! configuration, and the collaborator boundary to the source-control host.

pub mod config;
pub mod descriptor;
pub mod diff;
pub mod error;
pub mod ops;
pub mod source_host;
