//! Maintenance backend API
//!
//! Typed client for the maintenance-request REST backend.
//!
//! # Architecture
//!
//! - [`Session`] owns the token store and announces credential changes
//!   ([`SessionEvent`]); it is shared, never global
//! - [`ApiClient`] is the authenticated pipeline: bearer injection, one
//!   refresh-and-retry on 401, typed errors for everything else
//! - [`AuthApi`] and [`MaintenanceApi`] are thin façades, one HTTP call per
//!   method
//! - Requests are [`ApiRequest`] values that can be re-encoded, so a retry
//!   never depends on mutated transport state

pub mod auth;
pub mod client;
pub mod errors;
pub mod maintenance;
pub mod request;
pub mod session;

pub use auth::AuthApi;
pub use client::{ApiClient, ApiClientBuilder};
pub use errors::{ApiError, ApiErrorCategory, ErrorResponse};
pub use maintenance::MaintenanceApi;
pub use request::{ApiRequest, MultipartBody, RequestBody};
pub use session::{Session, SessionEvent};
