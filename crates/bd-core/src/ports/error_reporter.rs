/// Sink for user-visible failure messages (toast, inline alert, log).
///
/// 用户可见错误信息的出口。
pub trait ErrorReporterPort: Send + Sync {
    fn on_error(&self, message: &str);
}
