//! `ErrorReporterPort` sinks.

mod channel_reporter;
mod tracing_reporter;

pub use channel_reporter::ChannelErrorReporter;
pub use tracing_reporter::TracingErrorReporter;
