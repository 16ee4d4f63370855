//! # bd-app
//!
//! Application layer of the Bizdesk list-query stack: the shared query
//! cache, typed list resources and the per-screen list controller.

pub mod controller;
pub mod query_cache;
pub mod resource;

pub use controller::{ListController, ListView};
pub use query_cache::{PendingFetch, QueryCache, QueryResult, QuerySnapshot};
pub use resource::{ListPage, ListResource};
