use crate::error::{AppError, Result};
use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio_util::sync::CancellationToken;

type SharedResult<V> = Shared<BoxFuture<'static, Result<V>>>;

struct InFlight<V> {
    result: SharedResult<V>,
    cancel: CancellationToken,
    waiters: usize,
    generation: u64,
}

type Table<K, V> = Arc<Mutex<HashMap<K, InFlight<V>>>>;

fn lock<K, V>(table: &Mutex<HashMap<K, InFlight<V>>>) -> MutexGuard<'_, HashMap<K, InFlight<V>>> {
    // Entries stay consistent even if a holder panicked
    table.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Merges concurrent requests for the same key into one spawned task.
///
/// The task owns a cancellation token that fires once every waiter has gone.
/// Entries leave the table when the task finishes or is abandoned, so a later
/// request for the same key always starts fresh.
pub struct RequestCoalescer<K, V> {
    in_flight: Table<K, V>,
    next_generation: AtomicU64,
}

impl<K, V> RequestCoalescer<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        RequestCoalescer {
            in_flight: Arc::new(Mutex::new(HashMap::new())),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Await the result for `key`, starting `start` if nothing is in flight.
    ///
    /// `start` receives the shared task's token, which is distinct from
    /// `cancel`. If `cancel` fires first the caller gets [`AppError::Cancelled`]
    /// and the task keeps running for any remaining waiters.
    pub async fn run<F, Fut>(&self, key: K, cancel: &CancellationToken, start: F) -> Result<V>
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let (result, _waiter) = self.join_or_start(key, start);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(AppError::Cancelled),
            result = result => result,
        }
    }

    /// Number of keys currently in flight
    pub fn in_flight(&self) -> usize {
        lock(&self.in_flight).len()
    }

    fn join_or_start<F, Fut>(&self, key: K, start: F) -> (SharedResult<V>, Waiter<K, V>)
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let mut table = lock(&self.in_flight);

        if let Some(entry) = table.get_mut(&key) {
            if !entry.cancel.is_cancelled() {
                entry.waiters += 1;
                tracing::debug!(generation = entry.generation, "Joining in-flight request");
                let waiter = Waiter {
                    table: self.in_flight.clone(),
                    key,
                    generation: entry.generation,
                };
                return (entry.result.clone(), waiter);
            }
        }

        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let task = start(cancel.clone());

        let table_ref = self.in_flight.clone();
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            let result = task.await;
            remove_generation(&table_ref, &task_key, generation);
            result
        });

        let result = async move {
            handle
                .await
                .unwrap_or_else(|e| Err(AppError::Internal(format!("Request task failed: {}", e))))
        }
        .boxed()
        .shared();

        table.insert(
            key.clone(),
            InFlight {
                result: result.clone(),
                cancel,
                waiters: 1,
                generation,
            },
        );

        let waiter = Waiter {
            table: self.in_flight.clone(),
            key,
            generation,
        };
        (result, waiter)
    }
}

impl<K, V> Default for RequestCoalescer<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

fn remove_generation<K: Eq + Hash, V>(table: &Mutex<HashMap<K, InFlight<V>>>, key: &K, generation: u64) {
    let mut table = lock(table);
    if table.get(key).is_some_and(|entry| entry.generation == generation) {
        table.remove(key);
    }
}

/// Registration of one caller on an in-flight entry; dropping it leaves
struct Waiter<K: Eq + Hash, V> {
    table: Table<K, V>,
    key: K,
    generation: u64,
}

impl<K: Eq + Hash, V> Drop for Waiter<K, V> {
    fn drop(&mut self) {
        let mut table = lock(&self.table);
        let Some(entry) = table.get_mut(&self.key) else {
            return;
        };
        if entry.generation != self.generation {
            return;
        }

        entry.waiters = entry.waiters.saturating_sub(1);
        if entry.waiters == 0 {
            tracing::debug!(generation = self.generation, "Last waiter left, cancelling request");
            entry.cancel.cancel();
            table.remove(&self.key);
        }
    }
}
