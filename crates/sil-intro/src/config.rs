use serde::{Deserialize, Serialize};

/// Protocol constants, configurable per deployment.
///
/// Missing fields in a TOML document fall back to the defaults below.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    /// Decimals of the reward mint.
    pub mint_decimals: u8,
    /// Base units minted to an author for a new introduction.
    pub intro_reward: u64,
    /// Base units minted to a replier for each reply.
    pub reply_reward: u64,
    /// Longest accepted name, in bytes.
    pub max_name_len: usize,
    /// Longest accepted introduction message, in bytes.
    pub max_message_len: usize,
    /// Longest accepted reply, in bytes.
    pub max_reply_len: usize,
}

impl Default for ProgramConfig {
    fn default() -> Self {
        Self {
            mint_decimals: 6,
            intro_reward: 10_000_000,
            reply_reward: 5_000_000,
            max_name_len: 64,
            max_message_len: 1024,
            max_reply_len: 1024,
        }
    }
}

impl ProgramConfig {
    /// Parse a configuration from TOML.
    pub fn from_toml_str(input: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(input)
    }
}
