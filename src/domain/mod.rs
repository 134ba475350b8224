//! Domain layer containing entities, repository interfaces and the key layout.
//!
//! # Architecture
//!
//! - [`entities`] - Core data structures and pure diffing functions
//! - [`repositories`] - Data access trait definitions
//! - [`keys`] - Logical key names in the key-value store
//!
//! The domain layer has no dependencies on infrastructure or presentation
//! layers. Business logic lives in [`crate::application::services`].

pub mod entities;
pub mod keys;
pub mod repositories;
