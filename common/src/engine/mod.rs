pub mod config;
pub mod factory;
pub mod in_memory;

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;

/// An opaque reference to a namespaced keyspace inside a shared engine
/// instance.
///
/// Handles are obtained from the engine and passed to the consumers that
/// need a partition-scoped view. A handle is a non-owning reference: the
/// engine controls the partition's lifecycle, and dropping a handle (or any
/// view built on it) never closes or invalidates the partition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionHandle {
    name: Arc<str>,
}

impl PartitionHandle {
    pub(crate) fn new(name: &str) -> Self {
        Self { name: name.into() }
    }

    /// Returns the partition name this handle refers to.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Options controlling iterator creation.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct IteratorOptions {
    /// When true, the iterator does not pin a point-in-time snapshot and can
    /// observe writes that land in its still-unvisited key range after the
    /// scan begins. Cheaper than a snapshotted scan; callers must tolerate
    /// seeing concurrent writes.
    pub tailing: bool,
}

/// Error type for engine operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Storage-related errors (I/O, corruption, invalid handle)
    Storage(String),
    /// Internal errors
    Internal(String),
}

impl std::error::Error for EngineError {}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            EngineError::Storage(msg) => write!(f, "Storage error: {}", msg),
            EngineError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

/// Result type alias for engine operations
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// A cursor over a partition's ordered key space.
///
/// Keys are ordered lexicographically by byte value. An iterator is
/// positioned on an entry only after a successful seek; `key` and `value`
/// return `None` whenever the iterator is not positioned (`valid` is false).
/// Iterators are short-lived: created for a single scan and dropped when the
/// scan completes.
pub trait EngineIterator: Send {
    /// Positions the iterator on the smallest key in the partition.
    fn seek_to_first(&mut self) -> EngineResult<()>;

    /// Positions the iterator on the largest key in the partition.
    fn seek_to_last(&mut self) -> EngineResult<()>;

    /// Positions the iterator on the first key >= the given key.
    fn seek(&mut self, key: &[u8]) -> EngineResult<()>;

    /// Returns true if the iterator is positioned on an entry.
    fn valid(&self) -> bool;

    /// Returns the key at the current position, or None if not positioned.
    fn key(&self) -> Option<Bytes>;

    /// Returns the value at the current position, or None if not positioned.
    fn value(&self) -> Option<Bytes>;

    /// Advances to the next entry in ascending key order.
    ///
    /// A no-op if the iterator is not positioned.
    fn next(&mut self) -> EngineResult<()>;
}

/// The ordered byte-key storage primitive that partition views are built on.
///
/// Implementations are expected to be durable and internally thread-safe for
/// point operations; all methods take `&self` and may be called from
/// arbitrary concurrent callers. Point operations address a partition
/// through its [`PartitionHandle`].
#[async_trait]
pub trait Engine: Send + Sync {
    /// Retrieves the value stored under `key`, or None if absent.
    async fn get(&self, partition: &PartitionHandle, key: Bytes) -> EngineResult<Option<Bytes>>;

    /// Stores `value` under `key`, overwriting any existing value.
    async fn put(&self, partition: &PartitionHandle, key: Bytes, value: Bytes)
        -> EngineResult<()>;

    /// Deletes `key`. A no-op if the key does not exist.
    async fn delete(&self, partition: &PartitionHandle, key: Bytes) -> EngineResult<()>;

    /// Creates a fresh iterator over the partition's key space.
    ///
    /// The returned iterator is unpositioned; callers must seek before
    /// reading. Each iterator is owned exclusively by its caller.
    fn iterator(
        &self,
        partition: &PartitionHandle,
        options: IteratorOptions,
    ) -> EngineResult<Box<dyn EngineIterator>>;

    /// Opens the named partition, creating it if it does not exist.
    ///
    /// Idempotent: opening the same name twice yields handles addressing the
    /// same keyspace.
    fn open_partition(&self, name: &str) -> EngineResult<PartitionHandle>;
}
