pub mod cache;
pub mod engine;
pub mod meter;
pub mod render;

// Re-export key types for easier usage
pub use cache::{CacheManager, CacheStats, CacheStrategy, StrategyKind, UnknownStrategy};
pub use engine::{Engine, EngineError, Parsed};
pub use meter::{CacheEfficiencyMeter, EfficiencyReport};
pub use render::{RenderMode, StructureError, UnknownRenderMode};
