use crate::utils::kv::RenderConfig;

pub mod csum;
pub mod extract;
pub mod map;

/// Settings shared by every command.
#[derive(Debug, Clone, Default)]
pub struct ProgramContext {
    pub render: RenderConfig,
}
