//! Domain types shared by the API façade and its consumers
//!
//! Read models mirror the backend's JSON one-to-one (the field renames keep
//! the wire vocabulary out of Rust names). Write models only carry what the
//! client is allowed to send.

pub mod auth;
pub mod filter;
pub mod page;
pub mod payload;
pub mod request;

pub use auth::LoginCredentials;
pub use filter::{RequestFilter, RequestOrdering};
pub use page::Page;
pub use payload::{Attachment, MaintenanceRequestPatch, NewMaintenanceRequest, StatusChange};
pub use request::{MaintenanceRequest, Priority, RequestId, RequestStatus, StatusHistoryRecord};
