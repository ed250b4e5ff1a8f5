// Shared server state module
// Immutable per-request view of the startup configuration

use super::types::Config;

/// State shared across all connections. Configuration is fixed at
/// process start, so no interior mutability is needed.
pub struct ServerState {
    pub config: Config,
}

impl ServerState {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}
