// src/poll.rs
//! Fixed-cadence polling used by every polling view.
//!
//! One read right away, then one per interval. Each poller lives inside the
//! mount scope of its view: cancelling the token stops the timer and drops
//! the read that is in flight. There is no backoff; a failed read is
//! delivered as-is and the next tick simply tries again.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::error::FetchError;

pub fn spawn_poller<T, F, Fut, D>(
    label: &'static str,
    every: Duration,
    cancel: CancellationToken,
    mut fetch: F,
    deliver: D,
) -> JoinHandle<()>
where
    T: Send + 'static,
    F: FnMut() -> Fut + Send + 'static,
    Fut: Future<Output = Result<T, FetchError>> + Send,
    D: Fn(Result<T, FetchError>) + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::debug!(target: "poll", label, every_secs = every.as_secs(), "poller started");

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                r = fetch() => r,
            };

            match &result {
                Ok(_) => tracing::trace!(target: "poll", label, "tick ok"),
                Err(e) => tracing::debug!(target: "poll", label, error = %e, "tick failed"),
            }
            deliver(result);
        }

        tracing::debug!(target: "poll", label, "poller stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn reads_immediately_then_every_interval_until_cancelled() {
        let calls = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let c = calls.clone();
        let handle = spawn_poller(
            "test",
            Duration::from_secs(10),
            cancel.clone(),
            move || {
                let n = c.fetch_add(1, Ordering::SeqCst) + 1;
                async move { Ok::<usize, FetchError>(n) }
            },
            move |r| {
                let _ = tx.send(r);
            },
        );

        let start = tokio::time::Instant::now();
        assert_eq!(rx.recv().await, Some(Ok(1)));
        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(rx.recv().await, Some(Ok(2)));
        assert!(start.elapsed() >= Duration::from_secs(10));

        cancel.cancel();
        handle.await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_delivered_and_polling_continues() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        let handle = spawn_poller(
            "failing",
            Duration::from_secs(5),
            cancel.clone(),
            || async { Err::<(), _>(FetchError::Status(503)) },
            move |r| {
                let _ = tx.send(r);
            },
        );

        assert_eq!(rx.recv().await, Some(Err(FetchError::Status(503))));
        assert_eq!(rx.recv().await, Some(Err(FetchError::Status(503))));
        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_drops_the_read_in_flight() {
        let (tx, mut rx) = mpsc::unbounded_channel::<Result<(), FetchError>>();
        let cancel = CancellationToken::new();
        let handle = spawn_poller(
            "hung",
            Duration::from_secs(5),
            cancel.clone(),
            || std::future::pending::<Result<(), FetchError>>(),
            move |r| {
                let _ = tx.send(r);
            },
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        cancel.cancel();
        handle.await.unwrap();
        assert!(rx.recv().await.is_none());
    }
}
