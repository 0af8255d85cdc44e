use std::collections::{BTreeMap, HashMap};
use std::ops::Bound::{Excluded, Included, Unbounded};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use bytes::Bytes;

use super::{
    Engine, EngineError, EngineIterator, EngineResult, IteratorOptions, PartitionHandle,
};

type Tree = BTreeMap<Bytes, Bytes>;

/// In-memory implementation of the Engine trait using one BTreeMap per
/// partition.
///
/// This implementation stores all data in memory and is useful for testing
/// or scenarios where durability is not required. Point operations are
/// thread-safe behind per-partition locks.
pub struct InMemoryEngine {
    partitions: RwLock<HashMap<String, Arc<RwLock<Tree>>>>,
}

impl InMemoryEngine {
    /// Creates a new InMemoryEngine instance with no partitions.
    pub fn new() -> Self {
        Self {
            partitions: RwLock::new(HashMap::new()),
        }
    }

    fn tree(&self, partition: &PartitionHandle) -> EngineResult<Arc<RwLock<Tree>>> {
        let partitions = self
            .partitions
            .read()
            .map_err(|e| EngineError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        partitions
            .get(partition.name())
            .cloned()
            .ok_or_else(|| EngineError::Storage(format!("Unknown partition: {}", partition.name())))
    }
}

impl Default for InMemoryEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Engine for InMemoryEngine {
    #[tracing::instrument(level = "trace", skip_all)]
    async fn get(&self, partition: &PartitionHandle, key: Bytes) -> EngineResult<Option<Bytes>> {
        let tree = self.tree(partition)?;
        let guard = tree
            .read()
            .map_err(|e| EngineError::Internal(format!("Failed to acquire read lock: {}", e)))?;
        Ok(guard.get(&key).cloned())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn put(
        &self,
        partition: &PartitionHandle,
        key: Bytes,
        value: Bytes,
    ) -> EngineResult<()> {
        let tree = self.tree(partition)?;
        let mut guard = tree
            .write()
            .map_err(|e| EngineError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        guard.insert(key, value);
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    async fn delete(&self, partition: &PartitionHandle, key: Bytes) -> EngineResult<()> {
        let tree = self.tree(partition)?;
        let mut guard = tree
            .write()
            .map_err(|e| EngineError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        guard.remove(&key);
        Ok(())
    }

    #[tracing::instrument(level = "trace", skip_all)]
    fn iterator(
        &self,
        partition: &PartitionHandle,
        options: IteratorOptions,
    ) -> EngineResult<Box<dyn EngineIterator>> {
        let tree = self.tree(partition)?;
        let source = if options.tailing {
            IterSource::Live(tree)
        } else {
            let guard = tree.read().map_err(|e| {
                EngineError::Internal(format!("Failed to acquire read lock: {}", e))
            })?;
            IterSource::Snapshot(guard.clone())
        };
        Ok(Box::new(InMemoryIterator {
            source,
            current: None,
        }))
    }

    fn open_partition(&self, name: &str) -> EngineResult<PartitionHandle> {
        let mut partitions = self
            .partitions
            .write()
            .map_err(|e| EngineError::Internal(format!("Failed to acquire write lock: {}", e)))?;
        partitions
            .entry(name.to_string())
            .or_insert_with(|| Arc::new(RwLock::new(BTreeMap::new())));
        Ok(PartitionHandle::new(name))
    }
}

/// The key space an iterator reads from.
///
/// Tailing iterators read through to the live tree on every step, so writes
/// landing ahead of the cursor become visible mid-scan. Snapshot iterators
/// clone the tree at creation and never see later writes.
enum IterSource {
    Live(Arc<RwLock<Tree>>),
    Snapshot(Tree),
}

impl IterSource {
    fn with_tree<R>(&self, f: impl FnOnce(&Tree) -> R) -> EngineResult<R> {
        match self {
            IterSource::Live(tree) => {
                let guard = tree.read().map_err(|e| {
                    EngineError::Internal(format!("Failed to acquire read lock: {}", e))
                })?;
                Ok(f(&guard))
            }
            IterSource::Snapshot(tree) => Ok(f(tree)),
        }
    }

    fn first(&self) -> EngineResult<Option<(Bytes, Bytes)>> {
        self.with_tree(|tree| tree.iter().next().map(clone_entry))
    }

    fn last(&self) -> EngineResult<Option<(Bytes, Bytes)>> {
        self.with_tree(|tree| tree.iter().next_back().map(clone_entry))
    }

    /// First entry with key >= the given key.
    fn at_or_after(&self, key: &[u8]) -> EngineResult<Option<(Bytes, Bytes)>> {
        let key = Bytes::copy_from_slice(key);
        self.with_tree(|tree| tree.range((Included(key), Unbounded)).next().map(clone_entry))
    }

    /// First entry with key strictly greater than the given key.
    fn after(&self, key: &Bytes) -> EngineResult<Option<(Bytes, Bytes)>> {
        let key = key.clone();
        self.with_tree(|tree| tree.range((Excluded(key), Unbounded)).next().map(clone_entry))
    }
}

fn clone_entry((key, value): (&Bytes, &Bytes)) -> (Bytes, Bytes) {
    (key.clone(), value.clone())
}

struct InMemoryIterator {
    source: IterSource,
    current: Option<(Bytes, Bytes)>,
}

impl EngineIterator for InMemoryIterator {
    fn seek_to_first(&mut self) -> EngineResult<()> {
        self.current = self.source.first()?;
        Ok(())
    }

    fn seek_to_last(&mut self) -> EngineResult<()> {
        self.current = self.source.last()?;
        Ok(())
    }

    fn seek(&mut self, key: &[u8]) -> EngineResult<()> {
        self.current = self.source.at_or_after(key)?;
        Ok(())
    }

    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn key(&self) -> Option<Bytes> {
        self.current.as_ref().map(|(key, _)| key.clone())
    }

    fn value(&self) -> Option<Bytes> {
        self.current.as_ref().map(|(_, value)| value.clone())
    }

    fn next(&mut self) -> EngineResult<()> {
        if let Some((key, _)) = self.current.take() {
            self.current = self.source.after(&key)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with_partition(name: &str) -> (InMemoryEngine, PartitionHandle) {
        let engine = InMemoryEngine::new();
        let handle = engine.open_partition(name).unwrap();
        (engine, handle)
    }

    #[tokio::test]
    async fn should_put_and_get_within_partition() {
        // given
        let (engine, handle) = engine_with_partition("p0");

        // when
        engine
            .put(&handle, Bytes::from("k"), Bytes::from("v"))
            .await
            .unwrap();
        let result = engine.get(&handle, Bytes::from("k")).await.unwrap();

        // then
        assert_eq!(result, Some(Bytes::from("v")));
    }

    #[tokio::test]
    async fn should_isolate_partitions_from_each_other() {
        // given
        let engine = InMemoryEngine::new();
        let left = engine.open_partition("left").unwrap();
        let right = engine.open_partition("right").unwrap();

        // when
        engine
            .put(&left, Bytes::from("k"), Bytes::from("v"))
            .await
            .unwrap();

        // then
        assert_eq!(
            engine.get(&left, Bytes::from("k")).await.unwrap(),
            Some(Bytes::from("v"))
        );
        assert_eq!(engine.get(&right, Bytes::from("k")).await.unwrap(), None);
    }

    #[tokio::test]
    async fn should_share_keyspace_between_handles_for_same_partition() {
        // given
        let engine = InMemoryEngine::new();
        let first = engine.open_partition("shared").unwrap();
        let second = engine.open_partition("shared").unwrap();

        // when
        engine
            .put(&first, Bytes::from("k"), Bytes::from("v"))
            .await
            .unwrap();

        // then
        assert_eq!(
            engine.get(&second, Bytes::from("k")).await.unwrap(),
            Some(Bytes::from("v"))
        );
    }

    #[tokio::test]
    async fn should_fail_operations_on_unknown_partition() {
        // given
        let engine = InMemoryEngine::new();
        let handle = PartitionHandle::new("missing");

        // when
        let result = engine.get(&handle, Bytes::from("k")).await;

        // then
        assert!(matches!(result, Err(EngineError::Storage(_))));
    }

    #[tokio::test]
    async fn should_delete_nonexistent_key_without_error() {
        // given
        let (engine, handle) = engine_with_partition("p0");

        // when
        let result = engine.delete(&handle, Bytes::from("missing")).await;

        // then
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn should_iterate_in_ascending_key_order() {
        // given
        let (engine, handle) = engine_with_partition("p0");
        for key in ["b", "a", "c"] {
            engine
                .put(&handle, Bytes::from(key), Bytes::from("v"))
                .await
                .unwrap();
        }

        // when
        let mut iter = engine.iterator(&handle, IteratorOptions::default()).unwrap();
        iter.seek_to_first().unwrap();
        let mut keys = vec![];
        while iter.valid() {
            keys.push(iter.key().unwrap());
            iter.next().unwrap();
        }

        // then
        assert_eq!(keys, vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")]);
    }

    #[tokio::test]
    async fn should_seek_to_first_key_at_or_after_target() {
        // given
        let (engine, handle) = engine_with_partition("p0");
        for key in ["a", "c"] {
            engine
                .put(&handle, Bytes::from(key), Bytes::from("v"))
                .await
                .unwrap();
        }

        // when
        let mut iter = engine.iterator(&handle, IteratorOptions::default()).unwrap();
        iter.seek(b"b").unwrap();

        // then
        assert!(iter.valid());
        assert_eq!(iter.key(), Some(Bytes::from("c")));
    }

    #[tokio::test]
    async fn should_report_invalid_after_seeking_past_last_key() {
        // given
        let (engine, handle) = engine_with_partition("p0");
        engine
            .put(&handle, Bytes::from("a"), Bytes::from("v"))
            .await
            .unwrap();

        // when
        let mut iter = engine.iterator(&handle, IteratorOptions::default()).unwrap();
        iter.seek(b"z").unwrap();

        // then
        assert!(!iter.valid());
        assert_eq!(iter.key(), None);
        assert_eq!(iter.value(), None);
    }

    #[tokio::test]
    async fn should_seek_to_last_entry() {
        // given
        let (engine, handle) = engine_with_partition("p0");
        for key in ["a", "b", "c"] {
            engine
                .put(&handle, Bytes::from(key), Bytes::from("v"))
                .await
                .unwrap();
        }

        // when
        let mut iter = engine.iterator(&handle, IteratorOptions::default()).unwrap();
        iter.seek_to_last().unwrap();

        // then
        assert_eq!(iter.key(), Some(Bytes::from("c")));
    }

    #[tokio::test]
    async fn should_observe_concurrent_write_with_tailing_iterator() {
        // given
        let (engine, handle) = engine_with_partition("p0");
        for key in ["a", "c"] {
            engine
                .put(&handle, Bytes::from(key), Bytes::from("v"))
                .await
                .unwrap();
        }
        let mut iter = engine
            .iterator(&handle, IteratorOptions { tailing: true })
            .unwrap();
        iter.seek_to_first().unwrap();

        // when - a write lands ahead of the cursor mid-scan
        engine
            .put(&handle, Bytes::from("b"), Bytes::from("v"))
            .await
            .unwrap();
        let mut keys = vec![];
        while iter.valid() {
            keys.push(iter.key().unwrap());
            iter.next().unwrap();
        }

        // then
        assert_eq!(keys, vec![Bytes::from("a"), Bytes::from("b"), Bytes::from("c")]);
    }

    #[tokio::test]
    async fn should_not_observe_concurrent_write_with_snapshot_iterator() {
        // given
        let (engine, handle) = engine_with_partition("p0");
        for key in ["a", "c"] {
            engine
                .put(&handle, Bytes::from(key), Bytes::from("v"))
                .await
                .unwrap();
        }
        let mut iter = engine.iterator(&handle, IteratorOptions::default()).unwrap();
        iter.seek_to_first().unwrap();

        // when
        engine
            .put(&handle, Bytes::from("b"), Bytes::from("v"))
            .await
            .unwrap();
        let mut keys = vec![];
        while iter.valid() {
            keys.push(iter.key().unwrap());
            iter.next().unwrap();
        }

        // then
        assert_eq!(keys, vec![Bytes::from("a"), Bytes::from("c")]);
    }

    #[tokio::test]
    async fn should_return_invalid_iterator_on_empty_partition() {
        // given
        let (engine, handle) = engine_with_partition("p0");

        // when
        let mut iter = engine.iterator(&handle, IteratorOptions::default()).unwrap();
        iter.seek_to_first().unwrap();

        // then
        assert!(!iter.valid());
    }
}
