//! Transport port - abstracts the HTTP backend
//!
//! The core never builds URLs or touches headers; it hands a method, a
//! resource path and already-sanitized query pairs to whatever implements
//! this trait.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::TransportError;
use crate::params::SanitizedParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One backend call.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRequest {
    pub method: HttpMethod,
    /// Path relative to the configured base URL, without a leading slash
    pub path: String,
    pub query: SanitizedParams,
    pub body: Option<Value>,
}

impl TransportRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: SanitizedParams::default(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn with_query(mut self, query: SanitizedParams) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Transport port
///
/// Implementations return the parsed JSON body of a successful response and
/// map every failure onto [`TransportError`]. No authentication and no
/// retries happen at this seam.
#[async_trait]
pub trait TransportPort: Send + Sync {
    async fn execute(&self, request: TransportRequest) -> Result<Value, TransportError>;
}
