//! Data models
//!
//! Shared between park-server and the map frontend (via API).
//! Wire format is camelCase JSON with SCREAMING_SNAKE_CASE enums.

pub mod poi;

// Re-exports
pub use poi::*;
