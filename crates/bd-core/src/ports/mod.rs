//! Port interfaces for the application layer
//!
//! Ports define the contract between the list-query logic and the
//! infrastructure that talks to the backend, the clock and the UI. This
//! follows Hexagonal Architecture principles, so the cache and controller
//! can be driven entirely by test doubles.

mod clock;
mod error_reporter;
pub mod transport;

pub use clock::*;
pub use error_reporter::ErrorReporterPort;
pub use transport::{HttpMethod, TransportPort, TransportRequest};
