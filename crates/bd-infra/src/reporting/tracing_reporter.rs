use bd_core::ports::ErrorReporterPort;
use tracing::warn;

/// Writes user-facing errors to the log. Used by the CLI, which has no toast area.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingErrorReporter;

impl ErrorReporterPort for TracingErrorReporter {
    fn on_error(&self, message: &str) {
        warn!(target: "bizdesk::user_error", "{}", message);
    }
}
