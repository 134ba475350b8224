//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod domains;
pub mod feeds;
pub mod health;
pub mod monitor;
pub mod snapshots;
