//! Typed per-entity endpoints

mod list_resource;

pub use list_resource::{ListPage, ListResource};
