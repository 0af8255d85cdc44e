//! Data types for partition store operations.

use bytes::Bytes;

/// A key-value entry returned by single-entry queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionEntry {
    /// The key.
    pub key: Bytes,
    /// The value.
    pub value: Bytes,
}
