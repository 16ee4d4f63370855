//! Shared test doubles for bd-app integration tests.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bd_core::ports::{ClockPort, ErrorReporterPort, TransportPort, TransportRequest};
use bd_core::TransportError;
use serde_json::{json, Value};
use tokio::sync::oneshot;
use tracing_subscriber::EnvFilter;

/// Route `tracing` output through the test harness; `RUST_LOG=bd_app=debug` to see it.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Clock moved by hand.
pub struct FakeClock(AtomicI64);

impl FakeClock {
    pub fn new(start_ms: i64) -> Arc<Self> {
        Arc::new(Self(AtomicI64::new(start_ms)))
    }

    pub fn advance_ms(&self, delta: i64) {
        self.0.fetch_add(delta, Ordering::SeqCst);
    }
}

impl ClockPort for FakeClock {
    fn now_ms(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

type Reply = Result<Value, TransportError>;

/// Transport whose replies are scripted in call order.
///
/// `reply` queues an immediate answer; `gate` queues an answer the test
/// releases later through the returned sender.
#[derive(Default)]
pub struct ScriptedTransport {
    requests: Mutex<Vec<TransportRequest>>,
    replies: Mutex<VecDeque<oneshot::Receiver<Reply>>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, reply: Reply) {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(reply);
        self.replies.lock().unwrap().push_back(rx);
    }

    pub fn gate(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.replies.lock().unwrap().push_back(rx);
        tx
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Option<TransportRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TransportPort for ScriptedTransport {
    async fn execute(&self, request: TransportRequest) -> Result<Value, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.replies.lock().unwrap().pop_front();
        match next {
            Some(rx) => rx
                .await
                .unwrap_or_else(|_| Err(TransportError::Network("gate dropped".to_string()))),
            None => Err(TransportError::Network("no scripted reply".to_string())),
        }
    }
}

/// Collects every reported message.
#[derive(Default)]
pub struct RecordingReporter {
    messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ErrorReporterPort for RecordingReporter {
    fn on_error(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }
}

/// Hand-rolled `{ success, data: { records: paginator, stats } }` response.
pub fn account_groups_page(ids: &[u64], current_page: u64, per_page: u64, total: u64) -> Value {
    let records: Vec<Value> = ids
        .iter()
        .map(|id| json!({ "id": id, "name": format!("Group {id}"), "is_active": true }))
        .collect();
    json!({
        "success": true,
        "data": {
            "records": {
                "data": records,
                "current_page": current_page,
                "per_page": per_page,
                "total": total
            },
            "stats": { "total": total, "active": total, "system": 0, "custom": total }
        }
    })
}
