//! Configuration options for opening a partition store.

use common::EngineConfig;

/// Configuration for opening a [`PartitionStore`](crate::PartitionStore)
/// together with its backing engine.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Engine backend configuration.
    pub engine: EngineConfig,
    /// Name of the partition to open within the engine.
    pub partition: String,
}
