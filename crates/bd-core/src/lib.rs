//! # bd-core
//!
//! Core list-query domain for the Bizdesk business client.
//!
//! This crate contains pure logic without any infrastructure dependencies:
//! parameter sanitizing, response envelope normalization, pagination
//! derivation, cache models and the port traits implemented by `bd-infra`.

// Public module exports
pub mod cache;
pub mod config;
pub mod entities;
pub mod entity;
pub mod envelope;
pub mod error;
pub mod ids;
pub mod list_state;
pub mod pagination;
pub mod params;
pub mod ports;

// Re-export commonly used types at the crate root
pub use cache::{CacheEntry, CacheKey, CacheState, QueryOptions};
pub use config::{ApiConfig, CacheConfig, ClientConfig, ListConfig};
pub use entity::ListEntity;
pub use envelope::{extract_record, normalize, NormalizedPage, RequestedPage, Statistics};
pub use error::{ListQueryError, TransportError};
pub use ids::RecordId;
pub use list_state::{ListEvent, ListPhase, ListStateMachine};
pub use pagination::{PaginationHints, PaginationInfo};
pub use params::{sanitize, ListParams, ParamValue, SanitizedParams, SortDirection};
