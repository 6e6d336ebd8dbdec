//! Feature flags.

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureFlags {
    /// Emit a `tracing::debug_span!` per orchestrator iteration (C11). Kept
    /// togglable since verbose per-iteration spans are noisy outside
    /// development.
    #[serde(default = "default_enable_tracing")]
    pub enable_iteration_tracing: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_iteration_tracing: default_enable_tracing(),
        }
    }
}

fn default_enable_tracing() -> bool {
    true
}
