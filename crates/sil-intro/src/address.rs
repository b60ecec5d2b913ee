//! Derived addresses of every protocol record.
//!
//! Relationships between records are pure functions of their seeds:
//!
//! | Record | Seeds |
//! |---|---|
//! | reward mint | `"mint"` |
//! | introduction | author address |
//! | reply counter | `"counter"`, introduction address |
//! | reply | introduction address, counter value as 8 little-endian bytes |
//!
//! Callers hand addresses in; the processor re-derives each one from its
//! seeds and rejects the instruction on any difference.

use sil_crypto::{derive_address, DeriveError};
use sil_types::Address;

/// Address the student intro program is registered at.
pub const PROGRAM_ID: Address = Address::from_tag(b"sil-student-intro");

pub const MINT_SEED: &[u8] = b"mint";
pub const COUNTER_SEED: &[u8] = b"counter";

/// The single reward mint.
pub fn reward_mint_address() -> Result<(Address, u8), DeriveError> {
    derive_address(&[MINT_SEED], &PROGRAM_ID)
}

/// The introduction written by `author`.
pub fn intro_address(author: &Address) -> Result<(Address, u8), DeriveError> {
    derive_address(&[author.as_bytes()], &PROGRAM_ID)
}

/// The reply counter paired with `intro`.
pub fn counter_address(intro: &Address) -> Result<(Address, u8), DeriveError> {
    derive_address(&[COUNTER_SEED, intro.as_bytes()], &PROGRAM_ID)
}

/// The reply to `intro` created while the counter read `counter`.
pub fn reply_address(intro: &Address, counter: u64) -> Result<(Address, u8), DeriveError> {
    derive_address(&[intro.as_bytes(), &counter.to_le_bytes()], &PROGRAM_ID)
}
