//! Engine factory for creating engine instances from configuration.

use std::sync::Arc;

use super::config::EngineConfig;
use super::in_memory::InMemoryEngine;
use super::{Engine, EngineResult};

/// Creates an engine instance based on the provided configuration.
///
/// # Arguments
///
/// * `config` - The engine configuration specifying the backend type.
///
/// # Returns
///
/// Returns an `Arc<dyn Engine>` on success, or an `EngineError` on failure.
pub fn create_engine(config: &EngineConfig) -> EngineResult<Arc<dyn Engine>> {
    match config {
        EngineConfig::InMemory => Ok(Arc::new(InMemoryEngine::new())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_create_in_memory_engine_from_default_config() {
        // given
        let config = EngineConfig::default();

        // when
        let engine = create_engine(&config).unwrap();

        // then
        assert!(engine.open_partition("p0").is_ok());
    }
}
