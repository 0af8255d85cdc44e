//! Engine configuration.

/// Configuration selecting the engine backend.
///
/// The in-memory backend is the reference engine used by tests and local
/// runs; embedded persistent engines plug in as additional variants.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EngineConfig {
    /// In-memory engine, non-durable.
    #[default]
    InMemory,
}
