//! Configuration-file reconciliation engine.
//!
//! Translates one push's raw file diffs into the minimal set of catalog
//! operations (create / update / unlink) for the component descriptor files
//! the push touched. Pipeline, leaves first:
//!
//! 1. `classify` — buckets descriptor diffs as added/modified/removed.
//! 2. `materialize` — fetches old/new descriptor content concurrently and
//!    builds typed candidates.
//! 3. `moves` — collapses delete+add pairs that are really file moves into
//!    single updates.
//! 4. `transition` — splits modified files whose identity scheme changed
//!    into unlink + create.
//! 5. `assemble` — merges everything into `ComponentChanges`, restoring the
//!    input diff order.
//!
//! The engine is a deterministic function of (diffs, file contents); any
//! fetch failure aborts the whole batch so no partial operation set can
//! desynchronize the catalog.

mod assemble;
mod classify;
mod materialize;
mod moves;
mod reconcile;
mod transition;

pub use reconcile::{reconcile, reconcile_push};
