//! Partition Store - a partition-scoped key-value view over a shared
//! ordered engine.
//!
//! This crate provides a thin, partition-scoped abstraction over an
//! embedded, ordered storage engine (see [`common::Engine`]). Each
//! [`PartitionStore`] addresses one logical keyspace inside a shared engine
//! instance through an opaque handle, and adds four things over plain
//! delegation:
//!
//! - a cached, approximate live-key count maintained without per-query
//!   scans,
//! - caller-supplied cancellation on every operation, honored as a
//!   pre-dispatch gate,
//! - ordered, batched iteration that tolerates concurrent writers instead
//!   of pinning a snapshot,
//! - first/last-entry and offset-based counting queries for cleanup and
//!   compaction policies built on top.
//!
//! # Key Concepts
//!
//! - **PartitionStore**: the main entry point; one instance per partition
//!   view.
//! - **CountTracker**: the lock-free cached counter; approximate by
//!   contract.
//! - **PartitionEntry**: a key-value pair returned by single-entry queries.
//!
//! # Example
//!
//! ```ignore
//! use bytes::Bytes;
//! use partition::{Config, PartitionStore};
//! use tokio_util::sync::CancellationToken;
//!
//! let store = PartitionStore::open(Config {
//!     partition: "messages".to_string(),
//!     ..Config::default()
//! })?;
//! let token = CancellationToken::new();
//!
//! // Write and read data
//! store.put(Bytes::from("a"), Bytes::from("1"), &token).await?;
//! assert!(store.contains(Bytes::from("a"), &token).await?);
//!
//! // Batched, ordered iteration
//! store
//!     .iterate_batch(None, 100, &token, |key, value| async move {
//!         println!("{:?}: {:?}", key, value);
//!         Ok(())
//!     })
//!     .await?;
//! ```

mod config;
mod count;
mod error;
mod exec;
mod model;
mod partition;

pub use config::Config;
pub use count::CountTracker;
pub use error::{Error, Result};
pub use model::PartitionEntry;
pub use partition::PartitionStore;
