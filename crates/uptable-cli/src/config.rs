//! Engine configuration loading.

use std::path::Path;

use uptable_core::EngineConfig;

use crate::replay::ReplayError;

/// Load engine configuration from a JSON file, or use defaults.
pub fn load(path: Option<&Path>) -> Result<EngineConfig, ReplayError> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)?;
    serde_json::from_str(&text).map_err(ReplayError::Config)
}
