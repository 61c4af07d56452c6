//! Change notification for store readers.
//!
//! Every committed mutation bumps a revision counter held in a
//! `tokio::sync::watch` channel. A [`LiveQuery`] pairs a receiver with the
//! query that produces its collection and re-runs it when the revision moves.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::{FutureExt, Stream, stream};
use tokio::sync::watch;

use crate::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ChangeFeed {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl ChangeFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(0);
        Self { tx: Arc::new(tx) }
    }

    /// Announces a committed change and returns the new revision.
    pub fn publish(&self) -> u64 {
        let mut revision = 0;
        self.tx.send_modify(|current| {
            *current += 1;
            revision = *current;
        });
        revision
    }

    pub fn revision(&self) -> u64 {
        *self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.tx.subscribe()
    }

    /// Waits until the revision is past `since` or `timeout` elapses, and
    /// returns whatever revision is current at that point.
    pub async fn wait_for_change(&self, since: u64, timeout: Duration) -> u64 {
        let mut rx = self.subscribe();
        let waited = tokio::time::timeout(timeout, async {
            rx.wait_for(|revision| *revision > since)
                .await
                .map(|revision| *revision)
        })
        .await;

        match waited {
            Ok(Ok(revision)) => revision,
            _ => self.revision(),
        }
    }
}

type Fetch<T> = Arc<dyn Fn() -> BoxFuture<'static, AppResult<Vec<T>>> + Send + Sync>;

/// A collection that can be re-read whenever the store changes.
pub struct LiveQuery<T> {
    rx: watch::Receiver<u64>,
    fetch: Fetch<T>,
}

impl<T: Send + 'static> LiveQuery<T> {
    pub(crate) fn new<F, Fut>(rx: watch::Receiver<u64>, fetch: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = AppResult<Vec<T>>> + Send + 'static,
    {
        Self {
            rx,
            fetch: Arc::new(move || fetch().boxed()),
        }
    }

    /// Reads the collection as of now.
    pub async fn current(&mut self) -> AppResult<Vec<T>> {
        let _ = self.rx.borrow_and_update();
        (self.fetch)().await
    }

    /// Waits for the next committed change, then reads the collection.
    pub async fn changed(&mut self) -> AppResult<Vec<T>> {
        self.rx
            .changed()
            .await
            .map_err(|_| AppError::InternalError("change feed closed".into()))?;
        self.current().await
    }

    /// The current collection first, then one item per committed change.
    /// Ends when the feed is dropped.
    pub fn into_stream(self) -> impl Stream<Item = AppResult<Vec<T>>> {
        stream::unfold((self, true), |(mut query, first)| async move {
            if !first && query.rx.changed().await.is_err() {
                return None;
            }
            let item = query.current().await;
            Some((item, (query, false)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_publish_bumps_revision() {
        let feed = ChangeFeed::new();
        assert_eq!(feed.revision(), 0);
        assert_eq!(feed.publish(), 1);
        assert_eq!(feed.publish(), 2);
        assert_eq!(feed.revision(), 2);
    }

    #[tokio::test]
    async fn test_wait_for_change_times_out_with_current_revision() {
        let feed = ChangeFeed::new();
        feed.publish();
        let revision = feed.wait_for_change(1, Duration::from_millis(20)).await;
        assert_eq!(revision, 1);
    }

    #[tokio::test]
    async fn test_wait_for_change_returns_immediately_when_behind() {
        let feed = ChangeFeed::new();
        feed.publish();
        feed.publish();
        let revision = feed.wait_for_change(0, Duration::from_secs(5)).await;
        assert_eq!(revision, 2);
    }

    #[tokio::test]
    async fn test_live_query_refetches_on_change() {
        let feed = ChangeFeed::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let mut query = LiveQuery::new(feed.subscribe(), move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok(vec![n]) }
        });

        assert_eq!(query.current().await.unwrap(), vec![0]);

        let publisher = feed.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            publisher.publish();
        });
        assert_eq!(query.changed().await.unwrap(), vec![1]);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
