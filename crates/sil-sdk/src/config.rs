use std::path::Path;

use serde::{Deserialize, Serialize};
use sil_intro::ProgramConfig;
use sil_runtime::RuntimeConfig;

use crate::error::SdkResult;

/// Configuration of a local cluster.
///
/// ```toml
/// [runtime.rent]
/// lamports_per_byte = 6960
///
/// [program]
/// intro_reward = 10000000
/// ```
///
/// Missing sections and fields take their defaults.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    pub runtime: RuntimeConfig,
    pub program: ProgramConfig,
}

impl ClusterConfig {
    pub fn from_toml_str(input: &str) -> SdkResult<Self> {
        Ok(toml::from_str(input)?)
    }

    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
