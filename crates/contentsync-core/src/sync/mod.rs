//! SyncEngine: fetch, transform and reconcile every binding
//!
//! Bindings run one after another. A transport failure aborts only the
//! binding it happened in; the others still run.

mod engine;
mod report;

pub use engine::{SyncEngine, SyncOptions};
pub use report::{BindingReport, SyncReport};
