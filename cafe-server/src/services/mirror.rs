//! Record mirror
//!
//! Copies of orders and customers are pushed to a remote store after the
//! local commit. The queue is in-memory and unbounded: enqueueing never blocks
//! the request, and copies still queued at shutdown are dropped. The remote
//! copy is never read back.

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

pub const ORDERS_COLLECTION: &str = "orders";
pub const CUSTOMERS_COLLECTION: &str = "customers";

/// First retry delay
const INITIAL_RETRY_DELAY: Duration = Duration::from_secs(1);
/// Retry delay cap
const MAX_RETRY_DELAY: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum MirrorError {
    #[error("Mirror request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mirror rejected write ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mirror: Send + Sync {
    /// Upsert one record in `collection`
    async fn put(&self, collection: &str, id: &str, body: &Value) -> Result<(), MirrorError>;
}

/// `PUT {base_url}/{collection}/{id}` with the record as JSON body
pub struct HttpMirror {
    client: Client,
    base_url: String,
}

impl HttpMirror {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, MirrorError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Mirror for HttpMirror {
    async fn put(&self, collection: &str, id: &str, body: &Value) -> Result<(), MirrorError> {
        let url = format!("{}/{}/{}", self.base_url, collection, id);
        let response = self.client.put(&url).json(body).send().await?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(MirrorError::Rejected { status, body });
        }
        Ok(())
    }
}

#[derive(Debug)]
struct MirrorJob {
    collection: &'static str,
    id: String,
    body: Value,
}

/// Enqueue side of the mirror
#[derive(Clone)]
pub struct MirrorService {
    tx: Option<mpsc::UnboundedSender<MirrorJob>>,
}

impl MirrorService {
    /// Create the queue and the worker that drains it
    pub fn new(mirror: Arc<dyn Mirror>, max_retries: u32) -> (Self, MirrorWorker) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = MirrorWorker {
            mirror,
            rx,
            max_retries: max_retries.max(1),
            initial_delay: INITIAL_RETRY_DELAY,
        };
        (Self { tx: Some(tx) }, worker)
    }

    /// Service without a worker; every enqueue is dropped
    pub fn disabled() -> Self {
        Self { tx: None }
    }

    /// Queue a copy of `record`. Never fails the caller.
    pub fn enqueue<T: Serialize>(&self, collection: &'static str, id: &str, record: &T) {
        let Some(tx) = &self.tx else {
            return;
        };
        let body = match serde_json::to_value(record) {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(collection, id, "Failed to serialize mirror copy: {e}");
                return;
            }
        };
        let job = MirrorJob {
            collection,
            id: id.to_string(),
            body,
        };
        if tx.send(job).is_err() {
            tracing::warn!(collection, id, "Mirror worker stopped, copy dropped");
        }
    }
}

/// Background worker pushing queued copies with exponential backoff
pub struct MirrorWorker {
    mirror: Arc<dyn Mirror>,
    rx: mpsc::UnboundedReceiver<MirrorJob>,
    max_retries: u32,
    initial_delay: Duration,
}

impl MirrorWorker {
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        tracing::info!("MirrorWorker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    let dropped = self.rx.len();
                    if dropped > 0 {
                        tracing::warn!(dropped, "MirrorWorker shutting down with queued copies");
                    }
                    break;
                }

                job = self.rx.recv() => {
                    let Some(job) = job else {
                        tracing::info!("Mirror queue closed");
                        break;
                    };
                    tokio::select! {
                        _ = shutdown.cancelled() => break,
                        _ = self.push_with_retry(&job) => {}
                    }
                }
            }
        }

        tracing::info!("MirrorWorker stopped");
    }

    async fn push_with_retry(&self, job: &MirrorJob) {
        let mut delay = self.initial_delay;

        for attempt in 1..=self.max_retries {
            match self.mirror.put(job.collection, &job.id, &job.body).await {
                Ok(()) => {
                    tracing::debug!(collection = job.collection, id = %job.id, "Mirrored record");
                    return;
                }
                Err(e) if attempt < self.max_retries => {
                    tracing::warn!(
                        attempt,
                        max_retries = self.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        collection = job.collection,
                        id = %job.id,
                        "Mirror write failed, retrying: {e}"
                    );
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(MAX_RETRY_DELAY);
                }
                Err(e) => {
                    tracing::error!(
                        collection = job.collection,
                        id = %job.id,
                        "Mirror write failed after {} attempts: {e}",
                        self.max_retries
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    /// Fails the first `failures` calls, then records writes
    struct FlakyMirror {
        failures: u32,
        calls: AtomicU32,
        writes: Mutex<Vec<(String, String)>>,
    }

    impl FlakyMirror {
        fn new(failures: u32) -> Self {
            Self {
                failures,
                calls: AtomicU32::new(0),
                writes: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Mirror for FlakyMirror {
        async fn put(&self, collection: &str, id: &str, _body: &Value) -> Result<(), MirrorError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(MirrorError::Rejected {
                    status: 503,
                    body: "unavailable".to_string(),
                });
            }
            self.writes
                .lock()
                .unwrap()
                .push((collection.to_string(), id.to_string()));
            Ok(())
        }
    }

    async fn drain(mirror: Arc<FlakyMirror>, max_retries: u32, ids: &[&str]) {
        let (service, worker) = MirrorService::new(mirror, max_retries);
        let worker = worker.with_initial_delay(Duration::from_millis(1));
        for id in ids {
            service.enqueue(ORDERS_COLLECTION, id, &serde_json::json!({ "id": id }));
        }
        // dropping the only sender closes the queue once it is drained
        drop(service);
        worker.run(CancellationToken::new()).await;
    }

    #[tokio::test]
    async fn test_retries_until_success() {
        let mirror = Arc::new(FlakyMirror::new(2));
        drain(mirror.clone(), 5, &["o-1"]).await;

        assert_eq!(mirror.calls.load(Ordering::SeqCst), 3);
        assert_eq!(
            mirror.writes.lock().unwrap().as_slice(),
            &[("orders".to_string(), "o-1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let mirror = Arc::new(FlakyMirror::new(10));
        drain(mirror.clone(), 3, &["o-1", "o-2"]).await;

        // each job gets exactly max_retries attempts
        assert_eq!(mirror.calls.load(Ordering::SeqCst), 6);
        assert!(mirror.writes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_service_drops_silently() {
        MirrorService::disabled().enqueue(ORDERS_COLLECTION, "o-1", &serde_json::json!({}));
    }
}
