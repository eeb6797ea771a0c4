//! Simulated store latency

use std::time::Duration;

/// Fixed delay awaited before every store operation.
///
/// Zero by default. Setting it lets a local deployment behave like a remote
/// backend so clients exercise their loading states.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Latency(Duration);

impl Latency {
    pub const fn none() -> Self {
        Self(Duration::ZERO)
    }

    pub const fn from_millis(ms: u64) -> Self {
        Self(Duration::from_millis(ms))
    }

    pub fn duration(&self) -> Duration {
        self.0
    }

    pub async fn wait(&self) {
        if !self.0.is_zero() {
            tokio::time::sleep(self.0).await;
        }
    }
}
