//! Client configuration model

mod client_config;

pub use client_config::{ApiConfig, CacheConfig, ClientConfig, ListConfig};
