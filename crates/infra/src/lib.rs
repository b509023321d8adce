//! # Maintrack Infrastructure
//!
//! Everything that talks to the outside world.
//!
//! This crate contains:
//! - HTTP transport over `reqwest`
//! - The authenticated request pipeline (bearer injection, one-shot refresh)
//! - The typed maintenance-request API façade
//! - Configuration loading (files + environment)
//! - Token store construction from configuration
//!
//! ## Architecture
//! - Depends on `maintrack-domain` (types, config structs) and
//!   `maintrack-common` (token store port and backends)
//! - Contains all "impure" code (network, filesystem, keychain)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod token_store;

// Re-export commonly used items
pub use api::{
    ApiClient, ApiError, ApiErrorCategory, AuthApi, MaintenanceApi, Session, SessionEvent,
};
pub use http::{HttpClient, HttpClientBuilder};
pub use token_store::open_token_store;
