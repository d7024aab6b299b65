//! Command implementations for contentsync-cli

pub mod bindings;
pub mod diff;
pub mod edit_url;
pub mod sync;

pub use bindings::run_bindings;
pub use diff::run_diff;
pub use edit_url::run_edit_url;
pub use sync::run_sync;
