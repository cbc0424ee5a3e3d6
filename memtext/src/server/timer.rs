use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio::time::{interval_at, Instant};
use tokio_util::sync::CancellationToken;

/// Source of time for the cache, Unix seconds
pub trait Timer {
    fn timestamp(&self) -> u64;
}

pub trait SetableTimer {
    fn add_second(&self);
}

pub struct SystemTimer {
    seconds: AtomicU64,
    cancellation_token: CancellationToken,
}

impl SystemTimer {
    pub fn new(cancellation_token: CancellationToken) -> Self {
        debug!("Creating system timer");
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |duration| duration.as_secs());
        SystemTimer {
            seconds: AtomicU64::new(now),
            cancellation_token,
        }
    }

    pub async fn run(&self) {
        let start = Instant::now();
        let mut interval = interval_at(start, Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.add_second();
                    trace!("Server tick: {}", self.timestamp());
                }
                _ = self.cancellation_token.cancelled() => {
                    debug!("Stopping system timer");
                    return;
                }
            }
        }
    }
}

impl Timer for SystemTimer {
    fn timestamp(&self) -> u64 {
        self.seconds.load(Ordering::Acquire)
    }
}

impl SetableTimer for SystemTimer {
    fn add_second(&self) {
        self.seconds.fetch_add(1, Ordering::Release);
    }
}
