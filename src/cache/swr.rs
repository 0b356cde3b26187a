// In-memory stale-while-revalidate cache keyed by request URL.
// Deduplicates concurrent GETs and publishes one shared result to every subscriber.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde_json::Value;
use tokio::sync::watch;

use crate::api::Fetcher;
use crate::error::FetchError;
use crate::fetch::FetchState;

/// Window during which a successful response is served without revalidation.
pub const DEFAULT_DEDUPE_INTERVAL: Duration = Duration::from_secs(2);

/// Value published to subscribers of a key.
pub type SharedState = FetchState<Arc<Value>>;

#[derive(Debug)]
struct Entry {
    tx: watch::Sender<SharedState>,
    /// Distinguishes entries recreated after an invalidation.
    generation: u64,
    in_flight: bool,
    fetched_at: Option<Instant>,
}

impl Entry {
    fn is_fresh(&self, interval: Duration) -> bool {
        self.fetched_at.is_some_and(|at| at.elapsed() < interval)
    }
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<String, Entry>,
    next_generation: u64,
}

/// Shared fetch cache. Owned by the app and injected into every `FetchHook`.
#[derive(Debug)]
pub struct FetchCache {
    entries: Mutex<Entries>,
    dedupe_interval: Duration,
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUPE_INTERVAL)
    }
}

impl FetchCache {
    pub fn new(dedupe_interval: Duration) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            dedupe_interval,
        }
    }

    /// Subscribe to `key`, starting a fetch through `fetcher` when needed.
    ///
    /// - miss: a new `Pending` entry and one spawned fetch
    /// - in flight, or fresh success: the shared receiver, no fetch
    /// - stale success: the stale value stays visible while one revalidation runs
    /// - error: reset to `Pending` and fetched again
    ///
    /// Must be called from within a tokio runtime.
    pub fn subscribe(
        self: &Arc<Self>,
        key: &str,
        fetcher: Arc<dyn Fetcher>,
    ) -> watch::Receiver<SharedState> {
        let mut guard = self.lock();
        let entries = &mut *guard;

        let (generation, rx) = match entries.map.get_mut(key) {
            Some(entry) => {
                if entry.in_flight {
                    tracing::debug!(key, "joining in-flight fetch");
                    return entry.tx.subscribe();
                }

                let has_data = entry.tx.borrow().is_success();
                if has_data && entry.is_fresh(self.dedupe_interval) {
                    tracing::debug!(key, "cache hit");
                    return entry.tx.subscribe();
                }

                if !has_data {
                    entry.tx.send_replace(FetchState::Pending);
                }
                tracing::debug!(key, stale = has_data, "revalidating");
                entry.in_flight = true;
                (entry.generation, entry.tx.subscribe())
            }
            None => {
                let generation = entries.next_generation;
                entries.next_generation += 1;

                let (tx, rx) = watch::channel(FetchState::Pending);
                entries.map.insert(
                    key.to_string(),
                    Entry {
                        tx,
                        generation,
                        in_flight: true,
                        fetched_at: None,
                    },
                );
                tracing::debug!(key, "cache miss");
                (generation, rx)
            }
        };
        drop(guard);

        self.spawn_fetch(key.to_string(), generation, fetcher);
        rx
    }

    fn spawn_fetch(self: &Arc<Self>, key: String, generation: u64, fetcher: Arc<dyn Fetcher>) {
        let cache = Arc::clone(self);
        tokio::spawn(async move {
            let result = fetcher.fetch(&key).await;
            cache.complete(&key, generation, result);
        });
    }

    /// Publish a finished fetch to the entry that started it.
    fn complete(&self, key: &str, generation: u64, result: Result<Value, FetchError>) {
        let mut entries = self.lock();
        let Some(entry) = entries.map.get_mut(key) else {
            tracing::debug!(key, "discarding result for invalidated key");
            return;
        };
        if entry.generation != generation {
            tracing::debug!(key, "discarding result from previous generation");
            return;
        }

        entry.in_flight = false;
        match result {
            Ok(value) => {
                entry.fetched_at = Some(Instant::now());
                entry.tx.send_replace(FetchState::Success(Arc::new(value)));
            }
            Err(err) if entry.tx.borrow().is_success() => {
                tracing::warn!(key, error = %err, "revalidation failed, keeping stale data");
            }
            Err(err) => {
                tracing::debug!(key, error = %err, "fetch failed");
                entry.tx.send_replace(FetchState::Error(err));
            }
        }
    }

    /// Drop every entry. Pending fetches finish but their results are discarded.
    pub fn invalidate_all(&self) {
        let mut entries = self.lock();
        tracing::debug!(count = entries.map.len(), "invalidating cache");
        entries.map.clear();
    }

    /// Number of cached keys.
    pub fn len(&self) -> usize {
        self.lock().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of keys with a request on the wire.
    pub fn in_flight(&self) -> usize {
        self.lock().map.values().filter(|e| e.in_flight).count()
    }

    fn lock(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
