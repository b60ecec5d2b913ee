use serde::{Deserialize, Serialize};

/// Storage deposit schedule.
///
/// Every account must hold at least [`minimum_balance`](Self::minimum_balance)
/// lamports for its data length. The deposit is taken from the payer when
/// storage is allocated or grown and given back when it shrinks or is freed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RentSchedule {
    /// Deposit charged per byte of storage.
    pub lamports_per_byte: u64,
    /// Bytes of bookkeeping charged on top of every account's data.
    pub account_overhead: u64,
}

impl RentSchedule {
    /// Deposit required to keep `data_len` bytes allocated.
    pub fn minimum_balance(&self, data_len: usize) -> u64 {
        (self.account_overhead.saturating_add(data_len as u64))
            .saturating_mul(self.lamports_per_byte)
    }
}

impl Default for RentSchedule {
    fn default() -> Self {
        Self {
            lamports_per_byte: 6_960,
            account_overhead: 128,
        }
    }
}
