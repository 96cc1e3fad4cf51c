use crate::registry::DownloadRegistry;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Periodically sweeps expired download tokens so their files are removed even
/// when no request touches the registry.
#[derive(Clone)]
pub struct CleanupService {
    registry: Arc<DownloadRegistry>,
    period: Duration,
}

impl CleanupService {
    pub fn new(registry: Arc<DownloadRegistry>, period: Duration) -> Self {
        Self { registry, period }
    }

    /// Start the background sweep loop.
    /// Returns a JoinHandle for graceful shutdown
    pub fn start(self: Arc<Self>) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; nothing can have expired yet.
            ticker.tick().await;

            tracing::info!(period_secs = self.period.as_secs(), "Download cleanup task started");

            loop {
                ticker.tick().await;
                self.run_once();
            }
        })
    }

    /// Sweep once. Returns the number of entries removed.
    #[tracing::instrument(skip(self), fields(cleanup.operation = "sweep_expired"))]
    pub fn run_once(&self) -> usize {
        let removed = self.registry.sweep_expired();
        if removed > 0 {
            tracing::info!(removed, live = self.registry.len(), "Expired downloads cleaned up");
        } else {
            tracing::trace!("No expired downloads");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use meshlink_core::ManualClock;

    #[tokio::test]
    async fn run_once_sweeps_expired_entries() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let registry = Arc::new(DownloadRegistry::new(clock.clone()));
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.obj");
        std::fs::write(&path, b"v 0 0 0\n").unwrap();
        registry.create(path.clone(), "x", Duration::from_secs(10));

        let service = CleanupService::new(registry.clone(), Duration::from_secs(60));
        assert_eq!(service.run_once(), 0);

        clock.advance(Duration::from_secs(11));
        assert_eq!(service.run_once(), 1);
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn background_loop_sweeps_on_interval() {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let registry = Arc::new(DownloadRegistry::new(clock.clone()));
        let dir = tempfile::tempdir().unwrap();
        registry.create(dir.path().join("y.obj"), "y", Duration::from_secs(1));
        clock.advance(Duration::from_secs(2));

        let handle =
            Arc::new(CleanupService::new(registry.clone(), Duration::from_millis(20))).start();
        for _ in 0..100 {
            if registry.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(registry.is_empty());
        handle.abort();
    }
}
