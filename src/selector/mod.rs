// Gateway module for model and key pool selection - follows the Train Station Pattern

mod pool;
mod selector;

pub use pool::{KeyPoolEntry, KeyPoolInfo, RotationStrategy};
pub use selector::{ModelSelection, ModelSelector, PoolSummary};
