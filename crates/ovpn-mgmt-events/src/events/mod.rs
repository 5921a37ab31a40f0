//! Event module root – re-exports public API surface.

pub mod types;
pub mod fields;
pub mod classify;
pub mod state;

pub use types::*;
pub use classify::{classify, classify_notification};
pub use state::ConnectionState;
