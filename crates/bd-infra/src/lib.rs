//! Infrastructure adapters for the list-query ports.
//!
//! - [`http::ReqwestTransport`] implements `TransportPort` over HTTP
//! - [`time::SystemClock`] implements `ClockPort`
//! - [`reporting`] holds `ErrorReporterPort` sinks

pub mod http;
pub mod reporting;
pub mod time;

pub use http::{ReqwestTransport, TransportBuildError};
pub use reporting::{ChannelErrorReporter, TracingErrorReporter};
pub use time::SystemClock;
