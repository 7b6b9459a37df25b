//! Engine configuration.

use serde::{Deserialize, Serialize};

use crate::engine::aws_lc::ENGINE_NAME;

/// Environment variable naming the default crypto engine.
pub const ENGINE_ENV_VAR: &str = "JWT_CRYPTO_ENGINE";

/// Selects which registered engine serves calls that name none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the default engine.
    pub default_engine: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_engine: ENGINE_NAME.to_string(),
        }
    }
}

impl EngineConfig {
    /// Loads configuration from the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through `lookup`, falling back to defaults for
    /// unset or blank values.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let default_engine = lookup(ENGINE_ENV_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| ENGINE_NAME.to_string());

        Self { default_engine }
    }
}
