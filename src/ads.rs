//! Advertisement gating
//!
//! Number reveals wait behind an "advertisement". In this build the ad is
//! a fixed-length timer; the trait exists so a real ad SDK completion
//! signal can replace it.

use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Resolves when an advertisement has finished playing.
#[async_trait]
pub trait AdGate: Send + Sync {
    async fn wait(&self);
}

/// Fixed-duration simulated advertisement.
pub struct TimerAdGate {
    duration: Duration,
}

impl TimerAdGate {
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    pub fn from_secs(secs: u64) -> Self {
        Self::new(Duration::from_secs(secs))
    }
}

#[async_trait]
impl AdGate for TimerAdGate {
    async fn wait(&self) {
        debug!(ms = self.duration.as_millis() as u64, "Simulated ad running");
        tokio::time::sleep(self.duration).await;
    }
}

/// Gate that completes immediately. Used by tests and `--no-ads`.
pub struct NoAdGate;

#[async_trait]
impl AdGate for NoAdGate {
    async fn wait(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_no_ad_gate_completes() {
        NoAdGate.wait().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_timer_gate_waits_the_full_duration() {
        let gate = TimerAdGate::from_secs(3);
        let start = tokio::time::Instant::now();
        gate.wait().await;
        assert!(start.elapsed() >= Duration::from_secs(3));
    }
}
