pub mod bytes;
pub mod engine;

pub use crate::bytes::next_key;
pub use engine::config::EngineConfig;
pub use engine::factory::create_engine;
pub use engine::in_memory::InMemoryEngine;
pub use engine::{
    Engine, EngineError, EngineIterator, EngineResult, IteratorOptions, PartitionHandle,
};
