//! Shared types for the park directory backend
//!
//! Common types used across crates: POI data models and the realtime
//! message types exchanged over the push channel.

pub mod message;
pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

// Message bus re-exports (for convenient access)
pub use message::{AudienceFilter, BusMessage, EventType};
