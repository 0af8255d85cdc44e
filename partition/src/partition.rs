//! Core PartitionStore implementation with point operations and batched
//! iteration.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use common::engine::factory::create_engine;
use common::{Engine, EngineIterator, EngineResult, IteratorOptions, PartitionHandle};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::count::CountTracker;
use crate::error::{Error, Result};
use crate::exec;
use crate::model::PartitionEntry;

/// A partition-scoped view over a shared storage engine.
///
/// `PartitionStore` exposes one logical keyspace inside a shared engine
/// instance: point reads and writes, first/last-entry queries, a cached
/// live-key count, and ordered batched iteration. Keys and values are opaque
/// byte sequences ordered lexicographically by byte value.
///
/// # Cancellation
///
/// Every operation takes a caller-supplied [`CancellationToken`], checked
/// once before the engine call is dispatched. A token that is already
/// cancelled fails the call with [`Error::OperationCancelled`] and leaves
/// the engine untouched; a token cancelled after dispatch has no effect on
/// that call. There is no mid-flight abort.
///
/// # Counting
///
/// The cached count is initialized by a full scan at construction and then
/// bumped on every put and remove without an existence check, so it is an
/// approximation: overwrites inflate it and removes of absent keys deflate
/// it. [`count_from_offset`](PartitionStore::count_from_offset) always scans
/// and never consults the cache.
///
/// # Thread Safety
///
/// All methods take `&self`; concurrency safety is delegated to the engine's
/// point-operation guarantees plus the atomic counter. There is no lock
/// serializing store operations.
///
/// # Example
///
/// ```ignore
/// use partition::{Config, PartitionStore};
/// use bytes::Bytes;
/// use tokio_util::sync::CancellationToken;
///
/// let store = PartitionStore::open(Config {
///     partition: "messages".to_string(),
///     ..Config::default()
/// })?;
/// let token = CancellationToken::new();
///
/// store.put(Bytes::from("k"), Bytes::from("v"), &token).await?;
/// assert_eq!(store.get(Bytes::from("k"), &token).await?, Some(Bytes::from("v")));
/// assert_eq!(store.count(&token)?, 1);
/// ```
pub struct PartitionStore {
    engine: Arc<dyn Engine>,
    partition: PartitionHandle,
    count: CountTracker,
}

impl PartitionStore {
    /// Opens a partition store, creating the engine from configuration.
    ///
    /// This is a convenience constructor for callers that own their engine.
    /// To share one engine across several partition views, build it once and
    /// use [`new`](PartitionStore::new) with handles from
    /// [`Engine::open_partition`].
    ///
    /// # Errors
    ///
    /// Returns an error if the engine cannot be created, the partition
    /// cannot be opened, or the initial count scan fails.
    pub fn open(config: Config) -> Result<Self> {
        let engine = create_engine(&config.engine)?;
        let partition = engine.open_partition(&config.partition)?;
        Self::new(engine, partition)
    }

    /// Creates a partition view over an existing engine and handle.
    ///
    /// Performs a full forward scan of the partition to seed the cached
    /// count; this is the only point where the counter is reconciled against
    /// the engine. The view holds the handle without owning its lifecycle:
    /// dropping the store never closes the partition or the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the initial count scan fails.
    pub fn new(engine: Arc<dyn Engine>, partition: PartitionHandle) -> Result<Self> {
        let initial = initial_count(engine.as_ref(), &partition)?;
        Ok(Self {
            engine,
            partition,
            count: CountTracker::new(initial),
        })
    }

    /// Stores `value` under `key`, overwriting any existing value.
    ///
    /// Increments the cached count on success, whether or not the key
    /// already existed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationCancelled`] if `token` was cancelled before
    /// dispatch, or a storage error if the engine write fails.
    #[tracing::instrument(level = "trace", skip_all)]
    pub async fn put(&self, key: Bytes, value: Bytes, token: &CancellationToken) -> Result<()> {
        let engine = Arc::clone(&self.engine);
        let partition = self.partition.clone();
        exec::execute(token, async move { engine.put(&partition, key, value).await }).await?;
        self.count.increment();
        Ok(())
    }

    /// Gets the value for a key, or None if not found.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationCancelled`] if `token` was cancelled before
    /// dispatch, or a storage error if the engine read fails.
    #[tracing::instrument(level = "trace", skip_all)]
    pub async fn get(&self, key: Bytes, token: &CancellationToken) -> Result<Option<Bytes>> {
        let engine = Arc::clone(&self.engine);
        let partition = self.partition.clone();
        exec::execute(token, async move { engine.get(&partition, key).await }).await
    }

    /// Deletes `key`. A no-op at the engine level if the key is absent.
    ///
    /// Decrements the cached count on success, whether or not the key
    /// existed, mirroring the put-side accounting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationCancelled`] if `token` was cancelled before
    /// dispatch, or a storage error if the engine delete fails.
    #[tracing::instrument(level = "trace", skip_all)]
    pub async fn remove(&self, key: Bytes, token: &CancellationToken) -> Result<()> {
        let engine = Arc::clone(&self.engine);
        let partition = self.partition.clone();
        exec::execute(token, async move { engine.delete(&partition, key).await }).await?;
        self.count.decrement();
        Ok(())
    }

    /// Returns true if `key` is present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationCancelled`] if `token` was cancelled before
    /// dispatch, or a storage error if the engine read fails.
    #[tracing::instrument(level = "trace", skip_all)]
    pub async fn contains(&self, key: Bytes, token: &CancellationToken) -> Result<bool> {
        let value = self.get(key, token).await?;
        Ok(value.is_some())
    }

    /// Returns the entry with the smallest key, or None if the partition is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationCancelled`] if `token` was cancelled before
    /// dispatch, or a storage error if iterator creation or the seek fails.
    #[tracing::instrument(level = "trace", skip_all)]
    pub async fn first_entry(&self, token: &CancellationToken) -> Result<Option<PartitionEntry>> {
        let engine = Arc::clone(&self.engine);
        let partition = self.partition.clone();
        exec::execute(token, async move {
            let mut iter = engine.iterator(&partition, IteratorOptions::default())?;
            iter.seek_to_first()?;
            Ok(current_entry(iter.as_ref()))
        })
        .await
    }

    /// Returns the entry with the largest key, or None if the partition is
    /// empty.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationCancelled`] if `token` was cancelled before
    /// dispatch, or a storage error if iterator creation or the seek fails.
    #[tracing::instrument(level = "trace", skip_all)]
    pub async fn last_entry(&self, token: &CancellationToken) -> Result<Option<PartitionEntry>> {
        let engine = Arc::clone(&self.engine);
        let partition = self.partition.clone();
        exec::execute(token, async move {
            let mut iter = engine.iterator(&partition, IteratorOptions::default())?;
            iter.seek_to_last()?;
            Ok(current_entry(iter.as_ref()))
        })
        .await
    }

    /// Returns the cached live-key count.
    ///
    /// The value is approximate (see the type-level docs); it is read from
    /// memory without touching the engine.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationCancelled`] if `token` is already
    /// cancelled.
    pub fn count(&self, token: &CancellationToken) -> Result<i64> {
        if token.is_cancelled() {
            return Err(Error::OperationCancelled);
        }
        Ok(self.count.count())
    }

    /// Counts the entries with key >= `offset` by a fresh forward scan.
    ///
    /// Unlike [`count`](PartitionStore::count) this reflects the engine's
    /// contents at scan time; the two can diverge since the cached counter
    /// is approximate.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OperationCancelled`] if `token` was cancelled before
    /// dispatch, or a storage error if the scan fails.
    #[tracing::instrument(level = "trace", skip_all)]
    pub async fn count_from_offset(
        &self,
        offset: Bytes,
        token: &CancellationToken,
    ) -> Result<u64> {
        let engine = Arc::clone(&self.engine);
        let partition = self.partition.clone();
        exec::execute(token, async move {
            let mut iter = engine.iterator(&partition, IteratorOptions::default())?;
            iter.seek(&offset)?;
            let mut count = 0u64;
            while iter.valid() {
                count += 1;
                iter.next()?;
            }
            Ok(count)
        })
        .await
    }

    /// Visits up to `batch_size` entries in ascending key order, starting at
    /// the first key or at the first key >= `start_key` when supplied.
    ///
    /// `callback` is awaited once per entry, strictly sequentially; a slow
    /// callback delays the scan but not other store operations, and a
    /// callback error aborts the scan and propagates. The scan stops after
    /// `batch_size` entries or when the partition is exhausted, without
    /// reporting which; callers that need to resume should track the last
    /// key they saw and re-invoke with [`common::next_key`] of it as the
    /// next `start_key`.
    ///
    /// The scan drives a tailing iterator: no snapshot is pinned, so keys
    /// written concurrently may become visible if they land in the
    /// still-unvisited range. Intended for eventually-consistent sweeps
    /// (cleanup, expiry), not consistent reads. The iterator is owned by the
    /// call and released on every exit path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `batch_size` is zero,
    /// [`Error::OperationCancelled`] if `token` was cancelled before the
    /// scan started, a storage error if the engine fails, or the callback's
    /// own error.
    #[tracing::instrument(level = "trace", skip_all)]
    pub async fn iterate_batch<F, Fut>(
        &self,
        start_key: Option<Bytes>,
        batch_size: usize,
        token: &CancellationToken,
        mut callback: F,
    ) -> Result<()>
    where
        F: FnMut(Bytes, Bytes) -> Fut + Send,
        Fut: Future<Output = Result<()>> + Send,
    {
        if batch_size < 1 {
            return Err(Error::InvalidArgument(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if token.is_cancelled() {
            return Err(Error::OperationCancelled);
        }

        let mut iter = self
            .engine
            .iterator(&self.partition, IteratorOptions { tailing: true })?;
        match &start_key {
            Some(key) => iter.seek(key)?,
            None => iter.seek_to_first()?,
        }

        let mut visited = 0usize;
        while visited < batch_size && iter.valid() {
            let entry = match current_entry(iter.as_ref()) {
                Some(entry) => entry,
                None => break,
            };
            callback(entry.key, entry.value).await?;
            visited += 1;
            iter.next()?;
        }
        Ok(())
    }
}

/// Reads the entry under the iterator's current position, if any.
fn current_entry(iter: &dyn EngineIterator) -> Option<PartitionEntry> {
    match (iter.key(), iter.value()) {
        (Some(key), Some(value)) => Some(PartitionEntry { key, value }),
        _ => None,
    }
}

/// Counts every entry in the partition by a full forward scan.
fn initial_count(engine: &dyn Engine, partition: &PartitionHandle) -> EngineResult<i64> {
    let mut iter = engine.iterator(partition, IteratorOptions::default())?;
    iter.seek_to_first()?;
    let mut count = 0i64;
    while iter.valid() {
        count += 1;
        iter.next()?;
    }
    Ok(count)
}
