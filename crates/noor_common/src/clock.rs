//! Periodic reference clock
//!
//! `ClockTicker::start` spawns a task that sends the current instant on every
//! period. The returned guard owns the task: dropping it stops the ticks, so
//! the clock cannot outlive the view that started it.

use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Handle to a running clock; the tick task is aborted on drop
#[derive(Debug)]
pub struct ClockGuard {
    handle: JoinHandle<()>,
}

impl ClockGuard {
    pub fn is_running(&self) -> bool {
        !self.handle.is_finished()
    }
}

impl Drop for ClockGuard {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("Clock ticker stopped");
    }
}

pub struct ClockTicker;

impl ClockTicker {
    /// Start ticking every `period`; must be called inside a Tokio runtime
    pub fn start(period: Duration) -> (ClockGuard, mpsc::Receiver<DateTime<Utc>>) {
        let period = period.max(Duration::from_millis(10));
        let (tx, rx) = mpsc::channel(8);

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if tx.send(Utc::now()).await.is_err() {
                    // Receiver gone
                    break;
                }
            }
        });

        tracing::debug!(period_ms = period.as_millis() as u64, "Clock ticker started");
        (ClockGuard { handle }, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ticks_arrive_in_order() {
        let (guard, mut rx) = ClockTicker::start(Duration::from_millis(10));
        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert!(second >= first);
        assert!(guard.is_running());
    }

    #[tokio::test]
    async fn test_drop_guard_stops_ticks() {
        let (guard, mut rx) = ClockTicker::start(Duration::from_millis(10));
        assert!(rx.recv().await.is_some());
        drop(guard);

        // Buffered ticks may drain first; the channel must then close
        let closed = tokio::time::timeout(Duration::from_secs(2), async {
            while rx.recv().await.is_some() {}
        })
        .await;
        assert!(closed.is_ok(), "ticker kept running after guard drop");
    }
}
