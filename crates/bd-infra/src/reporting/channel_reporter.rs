use bd_core::ports::ErrorReporterPort;
use tokio::sync::mpsc;
use tracing::debug;

/// Forwards user-facing errors to a UI task over a bounded channel.
/// 通过有界通道把错误信息转发给 UI 任务。
///
/// Never blocks the caller: when the channel is full or the receiver is gone
/// the message is dropped.
#[derive(Debug, Clone)]
pub struct ChannelErrorReporter {
    tx: mpsc::Sender<String>,
}

impl ChannelErrorReporter {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl ErrorReporterPort for ChannelErrorReporter {
    fn on_error(&self, message: &str) {
        if let Err(err) = self.tx.try_send(message.to_string()) {
            debug!(error = %err, "Dropped user-facing error");
        }
    }
}
