/// Wall-clock source in Unix milliseconds.
///
/// Cache staleness is computed from this port so tests can move time by hand.
pub trait ClockPort: Send + Sync {
    fn now_ms(&self) -> i64;
}
