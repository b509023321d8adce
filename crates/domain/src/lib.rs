//! # Maintrack Domain
//!
//! Business domain types and models for Maintrack.
//!
//! This crate contains:
//! - Maintenance request snapshots and their status history
//! - Write models (new request, partial update, status change, filters)
//! - Domain error types and Result definitions
//! - Configuration structures
//!
//! ## Architecture
//! - No dependencies on other Maintrack crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures; the backend owns every rule

pub mod config;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
