use serde::{Deserialize, Serialize};

use crate::rent::RentSchedule;

/// Largest data region a single account may hold.
pub const MAX_ACCOUNT_DATA_LEN: usize = 10 * 1024;

/// Configuration for the execution substrate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Storage deposit schedule.
    pub rent: RentSchedule,
    /// Upper bound for any account's data length.
    pub max_account_data_len: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            rent: RentSchedule::default(),
            max_account_data_len: MAX_ACCOUNT_DATA_LEN,
        }
    }
}
